mod errors;
pub mod external;
pub mod manifest;

use std::path::{Path, PathBuf};

pub use errors::{DownloaderError, Result};
pub use external::ExternalDownloader;
pub use manifest::ManifestFile;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// a plain file fetched in one request, used for small side files such as
/// subtitles.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: String,
    pub output: PathBuf,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            output: output.into(),
        }
    }
}

/// fetches `request.url` and writes the whole body to `request.output`,
/// returning the number of bytes written.
pub async fn download_with_client(client: &Client, request: &DownloadRequest) -> Result<u64> {
    let response = client
        .get(&request.url)
        .send()
        .await
        .map_err(|source| DownloaderError::Request {
            context: format!("requesting {}", request.url),
            source,
        })?;

    if !response.status().is_success() {
        return Err(DownloaderError::HttpStatus {
            context: format!("downloading {}", request.url),
            status: response.status(),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|source| DownloaderError::Request {
            context: "reading response body".to_string(),
            source,
        })?;

    ensure_parent_dir(&request.output).await?;
    let mut file = File::create(&request.output)
        .await
        .map_err(|source| DownloaderError::Io {
            context: format!("creating output file {}", request.output.display()),
            source,
        })?;

    file.write_all(&bytes)
        .await
        .map_err(|source| DownloaderError::Io {
            context: format!("writing output file {}", request.output.display()),
            source,
        })?;

    debug!(bytes = bytes.len(), output = %request.output.display(), "wrote file");
    Ok(bytes.len() as u64)
}

async fn ensure_parent_dir(output: &Path) -> Result<()> {
    let Some(parent) = output.parent() else {
        return Ok(());
    };

    if parent.as_os_str().is_empty() {
        return Ok(());
    }

    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|source| DownloaderError::Io {
            context: format!("creating output directory {}", parent.display()),
            source,
        })
}
