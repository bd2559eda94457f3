use super::toml_config::TomlConfig;
use super::{AppConfig, API_URL_ENV};
use crate::utils::error::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "emerald")]
#[command(about = "Sign in to the Emerald ERP API and inspect the console session")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Base URL of the Emerald API [env: EMERALD_API_URL]
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Directory holding the persisted session [env: EMERALD_STORAGE_DIR]
    #[arg(long, global = true)]
    pub storage_dir: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Exchange credentials for an access token and persist it
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "EMERALD_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the persisted session
    Logout,
    /// Show the current session
    Status {
        /// Ask the server whether the persisted token is still accepted
        #[arg(long)]
        validate: bool,
    },
    /// Resolve a console path against the current session
    Open { path: String },
}

impl CliConfig {
    /// Defaults, then the TOML file, then the environment, then flags.
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = AppConfig::default();

        if let Some(path) = &self.config {
            tracing::debug!("Loading configuration from {}", path);
            let toml = TomlConfig::from_file(path)?;
            config.apply_toml(&toml);
        }
        config.apply_env();

        if let Some(url) = &self.api_url {
            config.api_base_url = url.clone();
        }
        if let Some(dir) = &self.storage_dir {
            config.storage_path = dir.clone();
        }
        if let Command::Status { validate: true } = self.command {
            config.validate_on_start = true;
        }

        Ok(config)
    }
}
