use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use iq_core::slugify;
use iq_downloader::{DownloadRequest, ExternalDownloader, ManifestFile, download_with_client};
use tracing::{info, warn};

use crate::client::IqClient;
use crate::errors::{IqError, Result};
use crate::page::PageDocument;

pub const DEFAULT_OUTPUT_DIR: &str = "Downloads";

const UNTITLED: &str = "untitled";

/// sanitized `<folder>/<file>` pair used for every output of one episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    pub folder: String,
    pub file: String,
}

impl OutputNames {
    pub fn new(folder: &str, file: &str) -> Self {
        Self {
            folder: safe_name(folder),
            file: safe_name(file),
        }
    }

    pub fn dir(&self, root: &Path) -> PathBuf {
        root.join(&self.folder)
    }

    pub fn subtitle_path(&self, root: &Path, lang: &str) -> PathBuf {
        self.dir(root).join(format!("{}.{}.srt", self.file, safe_name(lang)))
    }
}

fn safe_name(raw: &str) -> String {
    let name = slugify(raw);
    if name.is_empty() {
        UNTITLED.to_string()
    } else {
        name
    }
}

/// extracts the page's manifest reference and stores it in `manifest`.
///
/// returns the stored reference, or `None` (and leaves the file untouched)
/// when the page has no playable stream.
pub async fn get_video_m3u8(
    page: &PageDocument,
    manifest: &ManifestFile,
) -> Result<Option<String>> {
    let Some(m3u8) = page.video_m3u8() else {
        return Ok(None);
    };

    manifest.write(&m3u8).await?;
    info!(path = %manifest.path().display(), "saved m3u8 file");
    Ok(Some(m3u8))
}

/// hands the staged manifest to the external downloader.
pub async fn download_media(
    downloader: &ExternalDownloader,
    manifest: &ManifestFile,
    output_root: &Path,
    names: &OutputNames,
) -> Result<ExitStatus> {
    info!(file = %names.file, "downloading media");
    Ok(downloader
        .run(manifest, &names.dir(output_root), &names.file)
        .await?)
}

/// fetches every subtitle track of the page next to the media file.
pub async fn download_subtitles(
    client: &IqClient,
    page: &PageDocument,
    output_root: &Path,
    names: &OutputNames,
) -> Result<Vec<PathBuf>> {
    let tracks = page.subtitles();
    if tracks.is_empty() {
        warn!("no subtitles found.");
        return Ok(Vec::new());
    }

    let mut written = Vec::with_capacity(tracks.len());
    for track in tracks {
        let request = DownloadRequest::new(
            client.subtitle_url(&track),
            names.subtitle_path(output_root, &track.lang),
        );
        download_with_client(client.http(), &request)
            .await
            .map_err(|source| IqError::Subtitle {
                lang: track.lang.clone(),
                source,
            })?;
        info!(path = %request.output.display(), "downloaded subtitle");
        written.push(request.output);
    }

    Ok(written)
}

/// what happened to one episode.
#[derive(Debug, Clone)]
pub struct EpisodeOutcome {
    pub names: OutputNames,
    pub m3u8: Option<String>,
    pub status: Option<ExitStatus>,
    pub subtitles: Vec<PathBuf>,
}

/// per-episode download settings shared across a run.
#[derive(Debug, Clone)]
pub struct MediaPipeline {
    pub downloader: ExternalDownloader,
    pub manifest: ManifestFile,
    pub output_root: PathBuf,
    pub subtitles: bool,
}

impl Default for MediaPipeline {
    fn default() -> Self {
        Self {
            downloader: ExternalDownloader::default(),
            manifest: ManifestFile::default(),
            output_root: PathBuf::from(DEFAULT_OUTPUT_DIR),
            subtitles: true,
        }
    }
}

impl MediaPipeline {
    /// stages the manifest, runs the downloader and fetches subtitles.
    ///
    /// episodes share one manifest file, so calls must not overlap.
    pub async fn run(
        &self,
        client: &IqClient,
        page: &PageDocument,
        folder: &str,
        title: &str,
    ) -> Result<EpisodeOutcome> {
        let names = OutputNames::new(folder, title);

        let m3u8 = get_video_m3u8(page, &self.manifest).await?;
        let status = match m3u8 {
            Some(_) => Some(
                download_media(&self.downloader, &self.manifest, &self.output_root, &names)
                    .await?,
            ),
            None => {
                info!(title, "skipping media download");
                None
            }
        };

        let subtitles = if self.subtitles {
            download_subtitles(client, page, &self.output_root, &names).await?
        } else {
            Vec::new()
        };

        Ok(EpisodeOutcome {
            names,
            m3u8,
            status,
            subtitles,
        })
    }
}
