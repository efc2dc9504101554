use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{DownloaderError, Result};

pub const DEFAULT_MANIFEST_PATH: &str = "temp.m3u8";

/// the single transient file handed to the external downloader.
///
/// it is overwritten for every episode and removed once the downloader
/// returns, so at most one manifest reference exists at any time. episodes
/// must therefore be processed one after another.
#[derive(Debug, Clone)]
pub struct ManifestFile {
    path: PathBuf,
}

impl ManifestFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// replaces the file contents with `reference`.
    pub async fn write(&self, reference: &str) -> Result<()> {
        tokio::fs::write(&self.path, reference)
            .await
            .map_err(|source| DownloaderError::Io {
                context: format!("writing manifest {}", self.path.display()),
                source,
            })?;

        debug!(path = %self.path.display(), "saved manifest reference");
        Ok(())
    }

    pub async fn read(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| DownloaderError::Io {
                context: format!("reading manifest {}", self.path.display()),
                source,
            })
    }

    /// deletes the file. a file that is already gone is not an error.
    pub async fn remove(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "removed manifest");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(DownloaderError::Io {
                context: format!("removing manifest {}", self.path.display()),
                source,
            }),
        }
    }
}

impl Default for ManifestFile {
    fn default() -> Self {
        Self::new(DEFAULT_MANIFEST_PATH)
    }
}
