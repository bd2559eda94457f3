use clap::Parser;
use emerald_console::core::routes::navigate;
use emerald_console::utils::error::{ErrorSeverity, SessionError};
use emerald_console::utils::logger::{self, LogFormat};
use emerald_console::utils::validation::Validate;
use emerald_console::{connect, CliConfig, Command, ConsoleSession, Credentials};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(format, cli.verbose);

    tracing::debug!("Emerald console starting");

    if let Err(e) = run(cli).await {
        tracing::error!(
            "Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::debug!("Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("{}", e.user_friendly_message());
        eprintln!("Hint: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: CliConfig) -> Result<(), SessionError> {
    let config = cli.resolve()?;
    config.validate()?;
    tracing::debug!("Resolved configuration: {:?}", config);

    let session = connect(&config)?;
    tracing::debug!(
        "Session storage at {}",
        session.storage().base_path().display()
    );
    session.bootstrap(config.validate_on_start).await?;

    match cli.command {
        Command::Login { email, password } => {
            let credentials = Credentials::new(email, password);
            session.login(&credentials).await?;
            print_status(&session);
        }
        Command::Logout => {
            session.logout().await;
            println!("Signed out.");
        }
        Command::Status { .. } => print_status(&session),
        Command::Open { path } => {
            let nav = navigate(&path, session.is_authenticated());
            for redirect in &nav.redirects {
                println!("-> redirect to {}", redirect.to);
            }
            println!("{} ({})", nav.view, nav.path);
        }
    }

    Ok(())
}

fn print_status(session: &ConsoleSession) {
    match session.user() {
        Some(user) => println!("Signed in as {} (role: {})", user.email, user.role),
        None => println!("Not signed in."),
    }
}
