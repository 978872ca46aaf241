#![deny(missing_docs)]
//! Filesystem-backed implementation of unai's [`StateStore`] trait.
//!
//! Each key is percent-encoded and stored as a `.json` file directly under
//! the root directory, so a conversation survives process restarts.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use unai_types::{StateStore, StorageError};

/// Filesystem-backed state store.
///
/// Directory layout:
/// ```text
/// root/
///   chatHistory.json
///   selectedModel.json
/// ```
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Create a new filesystem store rooted at the given directory.
    ///
    /// The directory is created lazily on first write.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The directory values are stored in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key_to_filename(key))
    }
}

/// Encode a key into a safe filename.
fn key_to_filename(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len() + 5);
    for ch in key.chars() {
        match ch {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => encoded.push(ch),
            _ => {
                let mut buf = [0u8; 4];
                for byte in ch.encode_utf8(&mut buf).as_bytes() {
                    encoded.push_str(&format!("%{byte:02X}"));
                }
            }
        }
    }
    format!("{encoded}.json")
}

#[async_trait]
impl StateStore for FsStore {
    async fn read(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, value: serde_json::Value) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let contents = serde_json::to_string_pretty(&value)?;
        tokio::fs::write(self.path_for(key), contents).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
