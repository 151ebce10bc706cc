//! Manifest and diagnostic log storage

use async_trait::async_trait;
use std::path::Path;
use tokio::fs;

/// Durable storage for generated files
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Write the full content to `path`, overwriting any existing file
    async fn store_file(&self, path: &Path, content: &str) -> std::io::Result<()>;
}

/// Local filesystem storage
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileStore;

#[async_trait]
impl FileStore for LocalFileStore {
    async fn store_file(&self, path: &Path, content: &str) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await?;
                tracing::debug!("Created storage directory: {}", parent.display());
            }
        }

        fs::write(path, content).await
    }
}
