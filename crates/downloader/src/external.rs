use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::process::Command;
use tracing::{info, warn};

use crate::errors::{DownloaderError, Result};
use crate::manifest::ManifestFile;

#[cfg(windows)]
pub const DEFAULT_PROGRAM: &str = "N_m3u8DL-RE.exe";
#[cfg(not(windows))]
pub const DEFAULT_PROGRAM: &str = "N_m3u8DL-RE";

pub const DEFAULT_TMP_DIR: &str = "Temp";
pub const DEFAULT_MUX_FORMAT: &str = "mp4";

/// invocation settings for the offline m3u8 downloader binary.
#[derive(Debug, Clone)]
pub struct ExternalDownloader {
    pub program: String,
    pub tmp_dir: PathBuf,
    pub format: String,
}

impl Default for ExternalDownloader {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl ExternalDownloader {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            tmp_dir: PathBuf::from(DEFAULT_TMP_DIR),
            format: DEFAULT_MUX_FORMAT.to_string(),
        }
    }

    pub fn tmp_dir(mut self, tmp_dir: impl Into<PathBuf>) -> Self {
        self.tmp_dir = tmp_dir.into();
        self
    }

    /// argument vector passed to the program, in order.
    pub fn args(&self, manifest: &Path, save_dir: &Path, save_name: &str) -> Vec<String> {
        vec![
            "--save-dir".to_string(),
            save_dir.display().to_string(),
            "--tmp-dir".to_string(),
            self.tmp_dir.display().to_string(),
            "--save-name".to_string(),
            save_name.to_string(),
            manifest.display().to_string(),
            "-M".to_string(),
            self.format.clone(),
        ]
    }

    /// runs the downloader against `manifest` and waits for it to exit.
    ///
    /// `save_dir` is created first. the manifest is removed once the process
    /// is done, and also when it could not be launched at all. a non-zero
    /// exit status is reported back but not treated as an error.
    pub async fn run(
        &self,
        manifest: &ManifestFile,
        save_dir: &Path,
        save_name: &str,
    ) -> Result<ExitStatus> {
        let outcome = self.spawn_and_wait(manifest, save_dir, save_name).await;
        let cleanup = manifest.remove().await;

        let status = outcome?;
        cleanup?;

        if !status.success() {
            warn!(program = %self.program, %status, "downloader exited unsuccessfully");
        }

        Ok(status)
    }

    async fn spawn_and_wait(
        &self,
        manifest: &ManifestFile,
        save_dir: &Path,
        save_name: &str,
    ) -> Result<ExitStatus> {
        tokio::fs::create_dir_all(save_dir)
            .await
            .map_err(|source| DownloaderError::Io {
                context: format!("creating output directory {}", save_dir.display()),
                source,
            })?;

        info!(name = save_name, dir = %save_dir.display(), "downloading");

        Command::new(&self.program)
            .args(self.args(manifest.path(), save_dir, save_name))
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|source| DownloaderError::Spawn {
                program: self.program.clone(),
                source,
            })
    }
}
