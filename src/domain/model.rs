use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage key holding the raw access token.
pub const TOKEN_KEY: &str = "emerald_token";
/// Storage key holding the email of the last successful sign-in.
pub const EMAIL_KEY: &str = "emerald_email";
/// Email used when a token is persisted without its email.
pub const PLACEHOLDER_EMAIL: &str = "admin@emerald.com";
/// Every signed-in user is an administrator of the console.
pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub role: String,
}

impl User {
    pub fn admin(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: ADMIN_ROLE.to_string(),
        }
    }
}

/// Token and user always travel together, so a user cannot exist without a token.
#[derive(Clone, PartialEq, Eq)]
pub struct Authenticated {
    pub token: String,
    pub user: User,
}

impl fmt::Debug for Authenticated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticated")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    auth: Option<Authenticated>,
}

impl Session {
    pub fn unauthenticated() -> Self {
        Self { auth: None }
    }

    pub fn authenticated(token: impl Into<String>, user: User) -> Self {
        Self {
            auth: Some(Authenticated {
                token: token.into(),
                user,
            }),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.auth.as_ref().map(|a| a.token.as_str())
    }

    pub fn user(&self) -> Option<&User> {
        self.auth.as_ref().map(|a| &a.user)
    }

    pub fn state(&self) -> SessionState {
        if self.is_authenticated() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

/// Login form input. Never persisted.
#[derive(Clone, Serialize)]
pub struct Credentials {
    #[serde(rename = "username")]
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body returned by the login endpoint.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Profile returned by the current-user endpoint. Only the fields the console reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteUser {
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// What readers of the session store observe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub session: Session,
    pub loading: bool,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_present_only_with_token() {
        let session = Session::unauthenticated();
        assert!(session.token().is_none());
        assert!(session.user().is_none());
        assert_eq!(session.state(), SessionState::Unauthenticated);

        let session = Session::authenticated("abc123", User::admin("ops@emerald.com"));
        assert_eq!(session.token(), Some("abc123"));
        assert_eq!(session.user().map(|u| u.role.as_str()), Some(ADMIN_ROLE));
        assert_eq!(session.state(), SessionState::Authenticated);
    }

    #[test]
    fn test_secrets_are_not_debug_printed() {
        let creds = Credentials::new("admin@emerald.com", "Admin@123");
        assert!(!format!("{:?}", creds).contains("Admin@123"));

        let session = Session::authenticated("abc123", User::admin("admin@emerald.com"));
        assert!(!format!("{:?}", session).contains("abc123"));
    }

    #[test]
    fn test_token_response_tolerates_missing_fields() {
        let parsed: TokenResponse = serde_json::from_str(r#"{"detail": "ok"}"#).unwrap();
        assert!(parsed.access_token.is_none());

        let parsed: TokenResponse =
            serde_json::from_str(r#"{"access_token": "abc123", "token_type": "bearer"}"#).unwrap();
        assert_eq!(parsed.access_token.as_deref(), Some("abc123"));
    }
}
