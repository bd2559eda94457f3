use crate::utils::error::{Result, SessionError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub api: Option<ApiConfig>,
    pub storage: Option<StorageConfig>,
    pub session: Option<SessionConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub validate_on_start: Option<bool>,
}

impl TomlConfig {
    /// Reads and parses a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| SessionError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SessionError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Expands `${VAR}` from the environment. Undefined variables are left in place.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SessionError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn base_url(&self) -> Option<&str> {
        resolved(self.api.as_ref()?.base_url.as_deref())
    }

    pub fn timeout_seconds(&self) -> Option<u64> {
        self.api.as_ref()?.timeout_seconds
    }

    pub fn storage_path(&self) -> Option<&str> {
        resolved(self.storage.as_ref()?.path.as_deref())
    }

    pub fn validate_on_start(&self) -> Option<bool> {
        self.session.as_ref()?.validate_on_start
    }
}

/// A value still carrying a `${VAR}` placeholder counts as unset.
fn resolved(value: Option<&str>) -> Option<&str> {
    match value {
        Some(v) if v.contains("${") => {
            tracing::debug!("Ignoring unresolved config value '{}'", v);
            None
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[api]
base_url = "https://emerald.example.net/api"
timeout_seconds = 5

[storage]
path = "/var/lib/emerald"

[session]
validate_on_start = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.base_url(), Some("https://emerald.example.net/api"));
        assert_eq!(config.timeout_seconds(), Some(5));
        assert_eq!(config.storage_path(), Some("/var/lib/emerald"));
        assert_eq!(config.validate_on_start(), Some(true));
    }

    #[test]
    fn test_sections_are_optional() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.base_url().is_none());
        assert!(config.storage_path().is_none());
        assert!(config.validate_on_start().is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("EMERALD_TEST_TOML_URL", "http://10.0.0.5:4001");

        let toml_content = r#"
[api]
base_url = "${EMERALD_TEST_TOML_URL}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.base_url(), Some("http://10.0.0.5:4001"));

        std::env::remove_var("EMERALD_TEST_TOML_URL");
    }

    #[test]
    fn test_unresolved_variable_is_unset() {
        let toml_content = r#"
[storage]
path = "${EMERALD_TEST_UNDEFINED_VARIABLE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.storage_path().is_none());
    }

    #[test]
    fn test_invalid_toml() {
        let result = TomlConfig::from_toml_str("[api\nbase_url = 1");
        assert!(matches!(
            result,
            Err(SessionError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[session]\nvalidate_on_start = false\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.validate_on_start(), Some(false));
    }
}
