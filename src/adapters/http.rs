use crate::domain::model::{Credentials, RemoteUser, TokenResponse};
use crate::domain::ports::{AuthApi, ConfigProvider};
use crate::utils::error::{Result, SessionError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

pub const LOGIN_PATH: &str = "/v1/auth/login";
pub const CURRENT_USER_PATH: &str = "/v1/auth/me";

/// Talks to the Emerald REST API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: Client,
    base_url: String,
}

impl HttpAuthApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url().to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse> {
        let url = self.endpoint(LOGIN_PATH);
        tracing::debug!("POST {} for {}", url, credentials.email);

        let response = self.client.post(&url).form(credentials).send().await?;
        let status = response.status();
        tracing::debug!("Login response status: {}", status);

        if !status.is_success() {
            return Err(SessionError::LoginRejected {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let token: TokenResponse = serde_json::from_slice(&body)?;
        Ok(token)
    }

    async fn current_user(&self, token: &str) -> Result<RemoteUser> {
        let url = self.endpoint(CURRENT_USER_PATH);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).bearer_auth(token).send().await?;
        let status = response.status();

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(SessionError::SessionRejected {
                    status: status.as_u16(),
                })
            }
            s if !s.is_success() => Err(SessionError::UnexpectedStatus { status: s.as_u16() }),
            _ => Ok(response.json::<RemoteUser>().await?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_login_posts_form_body() {
        let server = MockServer::start();
        let login_mock = server.mock(|when, then| {
            when.method(POST)
                .path(LOGIN_PATH)
                .header("content-type", "application/x-www-form-urlencoded")
                .body("username=admin%40emerald.com&password=Admin%40123");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"access_token": "abc123", "token_type": "bearer"}));
        });

        let api = HttpAuthApi::new(server.base_url());
        let token = api
            .login(&Credentials::new("admin@emerald.com", "Admin@123"))
            .await
            .unwrap();

        login_mock.assert();
        assert_eq!(token.access_token.as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_login_non_success_is_rejection() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(LOGIN_PATH);
            then.status(401)
                .json_body(serde_json::json!({"detail": "Email o password incorrectos"}));
        });

        let api = HttpAuthApi::new(format!("{}/", server.base_url()));
        let err = api
            .login(&Credentials::new("admin@emerald.com", "wrong"))
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::LoginRejected { status: 401 }));
    }

    #[tokio::test]
    async fn test_current_user_sends_bearer_token() {
        let server = MockServer::start();
        let me_mock = server.mock(|when, then| {
            when.method(GET)
                .path(CURRENT_USER_PATH)
                .header("authorization", "Bearer abc123");
            then.status(200).json_body(serde_json::json!({
                "id": 1,
                "email": "admin@emerald.com",
                "username": "admin",
                "is_active": true
            }));
        });

        let api = HttpAuthApi::new(server.base_url());
        let user = api.current_user("abc123").await.unwrap();

        me_mock.assert();
        assert_eq!(user.email, "admin@emerald.com");
        assert_eq!(user.is_active, Some(true));
    }

    #[tokio::test]
    async fn test_current_user_unauthorized() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path(CURRENT_USER_PATH);
            then.status(401);
        });

        let api = HttpAuthApi::new(server.base_url());
        let err = api.current_user("expired").await.unwrap_err();
        assert!(matches!(err, SessionError::SessionRejected { status: 401 }));
    }
}
