use crate::utils::error::{Result, SessionError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(SessionError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(SessionError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(SessionError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SessionError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SessionError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(SessionError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

/// Storage keys become file names, so they must stay a single path component.
pub fn validate_storage_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        && key != "."
        && key != "..";

    if valid {
        Ok(())
    } else {
        Err(SessionError::InvalidConfigValueError {
            field: "storage.key".to_string(),
            value: key.to_string(),
            reason: "Keys may only contain ASCII letters, digits, '_', '-' and '.'".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("api.base_url", "http://localhost:4001").is_ok());
        assert!(validate_url("api.base_url", "https://emerald.example.net/api").is_ok());
        assert!(validate_url("api.base_url", "").is_err());
        assert!(validate_url("api.base_url", "ftp://example.com").is_err());
        assert!(validate_url("api.base_url", "not a url").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("storage.path", "/tmp/emerald").is_ok());
        assert!(validate_path("storage.path", "").is_err());
        assert!(validate_path("storage.path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_storage_key() {
        assert!(validate_storage_key("emerald_token").is_ok());
        assert!(validate_storage_key("../etc/passwd").is_err());
        assert!(validate_storage_key("..").is_err());
        assert!(validate_storage_key("").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("api.timeout_seconds", 10, 1).is_ok());
        assert!(validate_positive_number("api.timeout_seconds", 0, 1).is_err());
    }
}
