// File-backed feed cache
// Writes go to a sibling temp file which is then renamed over the cache,
// so readers never observe a half-written document.
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use milkwatch_core::error::{AppError, Result};
use milkwatch_core::port::FeedCache;

/// Feed cache stored verbatim in a single file (e.g. `feed.xml`)
pub struct FileFeedCache {
    path: PathBuf,
}

impl FileFeedCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "feed".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl FeedCache for FileFeedCache {
    async fn read(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path).await {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Cache(format!(
                "reading {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn write(&self, body: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Cache(format!("creating {}: {}", parent.display(), e))
            })?;
        }

        let temp = self.temp_path();
        fs::write(&temp, body)
            .await
            .map_err(|e| AppError::Cache(format!("writing {}: {}", temp.display(), e)))?;
        fs::rename(&temp, &self.path).await.map_err(|e| {
            AppError::Cache(format!("replacing {}: {}", self.path.display(), e))
        })?;

        debug!(path = %self.path.display(), bytes = body.len(), "Feed cache replaced");
        Ok(())
    }
}
