use crate::domain::ports::KeyValueStore;
use crate::utils::error::Result;
use crate::utils::validation::validate_storage_key;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Directory-backed key-value store: one file per key, file content is the raw value.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        validate_storage_key(key)?;
        Ok(self.base_path.join(key))
    }
}

impl KeyValueStore for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let full_path = self.key_path(key)?;
        match tokio::fs::read_to_string(&full_path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let full_path = self.key_path(key)?;

        tokio::fs::create_dir_all(&self.base_path).await?;

        // write-then-rename so readers never see a half-written value
        let tmp_path = self.base_path.join(format!(".{}.tmp", key));
        tokio::fs::write(&tmp_path, value.as_bytes()).await?;
        tokio::fs::rename(&tmp_path, &full_path).await?;

        tracing::debug!("Stored key '{}' in {}", key, self.base_path.display());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let full_path = self.key_path(key)?;
        match tokio::fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_set_get_remove() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("nested"));
        assert_eq!(storage.base_path(), temp_dir.path().join("nested"));

        assert_eq!(storage.get("emerald_token").await.unwrap(), None);

        storage.set("emerald_token", "abc123").await.unwrap();
        assert_eq!(
            storage.get("emerald_token").await.unwrap().as_deref(),
            Some("abc123")
        );

        storage.set("emerald_token", "def456").await.unwrap();
        assert_eq!(
            storage.get("emerald_token").await.unwrap().as_deref(),
            Some("def456")
        );

        storage.remove("emerald_token").await.unwrap();
        assert_eq!(storage.get("emerald_token").await.unwrap(), None);

        // removing twice is fine
        storage.remove("emerald_token").await.unwrap();
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        let result = tokio_test::block_on(storage.set("../escape", "x"));
        assert!(result.is_err());
        assert!(!temp_dir.path().parent().unwrap().join("escape").exists());
    }
}
