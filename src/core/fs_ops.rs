// src/core/fs_ops.rs
//! Async file system helpers shared by configuration loading and the CLI.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

use crate::app_log;

pub struct FsOps;

impl FsOps {
    /// Create `path` and its parents if missing
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            app_log!(info, "Created directory: {}", path.display());
        }
        Ok(())
    }

    pub async fn read_file_safe(path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    /// Read a whole document for upload; empty files are rejected
    pub async fn read_bytes(path: &Path) -> Result<Vec<u8>> {
        let bytes = fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        if bytes.is_empty() {
            anyhow::bail!("File is empty: {}", path.display());
        }
        Ok(bytes)
    }

    pub async fn write_file_safe(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            Self::ensure_dir_exists(parent).await?;
        }

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        app_log!(info, "Written file: {}", path.display());
        Ok(())
    }

    /// Final path component as UTF-8
    pub fn file_name(path: &Path) -> Result<String> {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .with_context(|| format!("Path has no usable file name: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("career-match-fs-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_write_then_read_creates_parents() {
        let dir = scratch_dir();
        let path = dir.join("nested").join("matcher.toml");
        FsOps::write_file_safe(&path, "decision_threshold = 0.6\n")
            .await
            .unwrap();
        let content = FsOps::read_file_safe(&path).await.unwrap();
        assert_eq!(content, "decision_threshold = 0.6\n");
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_read_bytes_rejects_empty_file() {
        let dir = scratch_dir();
        let path = dir.join("empty.pdf");
        FsOps::write_file_safe(&path, "").await.unwrap();
        assert!(FsOps::read_bytes(&path).await.is_err());
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_error_names_path() {
        let err = FsOps::read_file_safe(Path::new("/nonexistent/lexicon.toml"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/lexicon.toml"));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(FsOps::file_name(Path::new("/tmp/vacancy.pdf")).unwrap(), "vacancy.pdf");
        assert!(FsOps::file_name(Path::new("/")).is_err());
    }
}
