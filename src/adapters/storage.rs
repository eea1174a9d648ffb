use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions of the files a dry run writes; `clear` touches nothing else.
pub const ARTIFACT_EXTENSIONS: &[&str] = &["txt", "png"];

/// Dry-run artifact directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&full_path, data)?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(full_path.display().to_string())
    }

    async fn clear(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;

        let mut removed = 0;
        for entry in fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            if path.is_file() && is_artifact(&path) {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }

        tracing::debug!(
            "Cleared {} previous artifact(s) from {}",
            removed,
            self.base_path.display()
        );
        Ok(())
    }
}

fn is_artifact(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ARTIFACT_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_clear() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("run"));

        let written = storage.write_file("alice.txt", b"hello").await.unwrap();
        assert!(written.ends_with("alice.txt"));
        assert_eq!(fs::read(&written).unwrap(), b"hello");

        storage.clear().await.unwrap();
        assert!(storage.base_path().exists());
        assert_eq!(fs::read_dir(storage.base_path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_clear_leaves_unrelated_files_alone() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());
        fs::write(temp_dir.path().join("santa.toml"), "[[participants]]").unwrap();
        fs::write(temp_dir.path().join(".env"), "OPENAI_API_KEY=sk").unwrap();
        fs::create_dir(temp_dir.path().join("src")).unwrap();
        fs::write(temp_dir.path().join("src").join("notes.txt"), "keep").unwrap();
        fs::write(temp_dir.path().join("bob.txt"), "last year").unwrap();
        fs::write(temp_dir.path().join("bob.png"), b"png").unwrap();

        storage.clear().await.unwrap();

        assert!(temp_dir.path().join("santa.toml").exists());
        assert!(temp_dir.path().join(".env").exists());
        assert!(temp_dir.path().join("src").join("notes.txt").exists());
        assert!(!temp_dir.path().join("bob.txt").exists());
        assert!(!temp_dir.path().join("bob.png").exists());
    }

    #[tokio::test]
    async fn test_clear_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("fresh"));
        storage.clear().await.unwrap();
        assert!(storage.base_path().is_dir());
    }
}
