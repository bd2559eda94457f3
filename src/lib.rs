pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, Command};

pub use adapters::{FileStorage, HttpAuthApi};
pub use config::AppConfig;
pub use crate::core::{
    guard::{guard, Guarded, Redirect},
    routes::{navigate, resolve, View},
    session::SessionStore,
};
pub use domain::model::{AuthSnapshot, Credentials, Session, SessionState, User};
pub use utils::error::{Result, SessionError};

/// Session store wired to the on-disk storage and the HTTP API.
pub type ConsoleSession = SessionStore<FileStorage, HttpAuthApi>;

/// Builds a [`ConsoleSession`] from resolved configuration.
pub fn connect(config: &AppConfig) -> Result<ConsoleSession> {
    let storage = FileStorage::new(&config.storage_path);
    let api = HttpAuthApi::from_config(config)?;
    Ok(SessionStore::new(storage, api))
}
