use std::path::PathBuf;

use clap::Args;
use iq::prelude::*;

use crate::constants::*;

#[derive(Debug, Clone, Args)]
pub struct AppArgs {
    /// Logging verbosity (error, warn, info, debug)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// File that receives a plain-text copy of the log
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Use interactive prompts to edit arguments before execution
    #[arg(short, long)]
    pub interactive: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ResolveArgs {
    /// iQ play or album url
    #[arg(short, long)]
    pub url: Option<String>,

    /// Netscape cookies.txt exported from a logged-in browser session
    #[arg(short, long, env = "IQ_COOKIES", default_value = iq::DEFAULT_COOKIES_PATH)]
    pub cookies: PathBuf,

    /// Site language code (e.g. en_us, zh_cn, ja)
    #[arg(short, long, env = "IQ_LANG")]
    pub lang: Option<Language>,

    /// Resolution to request (1080p, 720p, 480p, 360p)
    #[arg(short, long, env = "IQ_RESOLUTION")]
    pub resolution: Option<Resolution>,

    /// Process every episode of the series without asking
    #[arg(long, conflicts_with = "single")]
    pub all: bool,

    /// Only process the given url even if it belongs to a series
    #[arg(long)]
    pub single: bool,

    #[command(flatten)]
    pub app_args: AppArgs,
}

#[derive(Debug, Clone, Args)]
pub struct DownloadArgs {
    /// Root directory for downloaded series
    #[arg(short, long, default_value = iq::DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Scratch directory handed to the downloader
    #[arg(long, default_value = DEFAULT_TMP_DIR)]
    pub tmp_dir: PathBuf,

    /// Transient manifest file handed to the downloader
    #[arg(long, default_value = DEFAULT_MANIFEST_PATH)]
    pub manifest: PathBuf,

    /// External m3u8 downloader binary
    #[arg(long, env = "IQ_DOWNLOADER", default_value = DEFAULT_DOWNLOADER)]
    pub downloader: String,

    /// Skip subtitle downloads
    #[arg(long)]
    pub no_subtitles: bool,

    #[command(flatten)]
    pub resolve: ResolveArgs,
}

/// which part of a series to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesChoice {
    Ask,
    All,
    Single,
}

impl ResolveArgs {
    pub fn series_choice(&self) -> SeriesChoice {
        match (self.all, self.single) {
            (true, _) => SeriesChoice::All,
            (_, true) => SeriesChoice::Single,
            _ => SeriesChoice::Ask,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeArgs {
    pub url: String,
    pub lang: Language,
    pub resolution: Resolution,
}

impl RuntimeArgs {
    pub fn new(url: String, lang: Language, resolution: Resolution) -> Self {
        Self {
            url,
            lang,
            resolution,
        }
    }
}
