use crate::domain::model::{Credentials, RemoteUser, TokenResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Durable string key-value storage scoped to this client. Last write wins.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
    fn set(&self, key: &str, value: &str)
        -> impl std::future::Future<Output = Result<()>> + Send;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn storage_path(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn validate_on_start(&self) -> bool;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchanges credentials for a token. Non-2xx responses are errors.
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse>;
    /// Fetches the profile behind a bearer token.
    async fn current_user(&self, token: &str) -> Result<RemoteUser>;
}
