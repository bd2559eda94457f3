use thiserror::Error;

/// Message shown to the user whenever a sign-in attempt fails.
pub const LOGIN_FAILED_MESSAGE: &str = "Could not sign in, check your credentials.";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Login rejected by server (HTTP {status})")]
    LoginRejected { status: u16 },

    #[error("Login response did not contain an access token")]
    MissingAccessToken,

    #[error("Session no longer accepted by server (HTTP {status})")]
    SessionRejected { status: u16 },

    #[error("Unexpected response from server (HTTP {status})")]
    UnexpectedStatus { status: u16 },

    #[error("Storage error: {0}")]
    StorageError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Authentication,
    Storage,
    Configuration,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SessionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SessionError::ApiError(_) | SessionError::UnexpectedStatus { .. } => {
                ErrorCategory::Network
            }
            SessionError::LoginRejected { .. }
            | SessionError::MissingAccessToken
            | SessionError::SessionRejected { .. } => ErrorCategory::Authentication,
            SessionError::StorageError(_) => ErrorCategory::Storage,
            SessionError::SerializationError(_) => ErrorCategory::Data,
            SessionError::ConfigError { .. }
            | SessionError::ConfigValidationError { .. }
            | SessionError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // a new user action can fix these
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Authentication | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// True for failures of a sign-in attempt, which share one user-facing message.
    pub fn is_login_failure(&self) -> bool {
        matches!(
            self,
            SessionError::ApiError(_)
                | SessionError::LoginRejected { .. }
                | SessionError::MissingAccessToken
                | SessionError::SerializationError(_)
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SessionError::ApiError(_) | SessionError::UnexpectedStatus { .. } => {
                "Check that the API is reachable and EMERALD_API_URL points to it"
            }
            SessionError::LoginRejected { .. } | SessionError::MissingAccessToken => {
                "Verify the email and password and try again"
            }
            SessionError::SessionRejected { .. } => "Sign in again with `emerald login`",
            SessionError::StorageError(_) => {
                "Check that the storage directory exists and is writable"
            }
            SessionError::SerializationError(_) => "The API returned an unexpected response body",
            SessionError::ConfigError { .. }
            | SessionError::ConfigValidationError { .. }
            | SessionError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command line flags"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        if self.is_login_failure() {
            return LOGIN_FAILED_MESSAGE.to_string();
        }
        match self {
            SessionError::SessionRejected { .. } => {
                "Your session has expired, please sign in again.".to_string()
            }
            SessionError::StorageError(e) => format!("Could not access session storage: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_failures_share_message() {
        let rejected = SessionError::LoginRejected { status: 401 };
        let missing = SessionError::MissingAccessToken;

        assert_eq!(rejected.user_friendly_message(), LOGIN_FAILED_MESSAGE);
        assert_eq!(missing.user_friendly_message(), LOGIN_FAILED_MESSAGE);
        assert_eq!(rejected.category(), ErrorCategory::Authentication);
    }

    #[test]
    fn test_severity_mapping() {
        let io = SessionError::StorageError(std::io::Error::other("disk"));
        assert_eq!(io.severity(), ErrorSeverity::Critical);

        let config = SessionError::ConfigError {
            message: "bad".to_string(),
        };
        assert_eq!(config.severity(), ErrorSeverity::High);
        assert!(!config.is_login_failure());
    }
}
