use thiserror::Error;

use iq_downloader::DownloaderError;

pub type Result<T> = std::result::Result<T, IqError>;

/// coarse classification used by front-ends to pick a user facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Parse,
    NotFound,
    ExternalTool,
    Io,
    Input,
}

#[derive(Debug, Error)]
pub enum IqError {
    #[error("failed building reqwest client: {0}")]
    BuildClient(#[source] reqwest::Error),

    #[error("HTTP request failed while {context}: {source}")]
    Request {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read response body while {context}: {source}")]
    ResponseBody {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{context} returned {status}")]
    HttpStatus {
        context: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to decode JSON while {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to get title from {url} (wrong URL?)")]
    MissingTitle { url: String },

    #[error("no m3u8 link found in page")]
    MissingManifest,

    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("downloader error: {0}")]
    Downloader(#[from] DownloaderError),

    #[error("failed to download {lang} subtitle: {source}")]
    Subtitle {
        lang: String,
        #[source]
        source: DownloaderError,
    },

    #[error("{0}")]
    Message(String),
}

impl IqError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BuildClient(_)
            | Self::Request { .. }
            | Self::ResponseBody { .. }
            | Self::HttpStatus { .. } => ErrorKind::Network,
            Self::Json { .. } => ErrorKind::Parse,
            Self::MissingTitle { .. } | Self::MissingManifest => ErrorKind::NotFound,
            Self::InvalidUrl { .. } | Self::Message(_) => ErrorKind::Input,
            Self::Downloader(err) | Self::Subtitle { source: err, .. } => downloader_kind(err),
        }
    }

    /// whether the failure aborts the run: the page itself could not be
    /// fetched or lacks the title needed to name its outputs. everything else
    /// (downloader, subtitles, filesystem) is reported and the run ends
    /// normally.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Request { .. }
                | Self::ResponseBody { .. }
                | Self::HttpStatus { .. }
                | Self::MissingTitle { .. }
                | Self::InvalidUrl { .. }
        )
    }
}

fn downloader_kind(err: &DownloaderError) -> ErrorKind {
    match err {
        DownloaderError::Spawn { .. } => ErrorKind::ExternalTool,
        DownloaderError::Request { .. } | DownloaderError::HttpStatus { .. } => ErrorKind::Network,
        DownloaderError::Io { .. } => ErrorKind::Io,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_errors_by_kind() {
        assert_eq!(
            IqError::MissingTitle { url: "https://www.iq.com/play/x".into() }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            IqError::InvalidUrl { url: "ftp://x".into() }.kind(),
            ErrorKind::Input
        );

        let spawn = DownloaderError::Spawn {
            program: "N_m3u8DL-RE".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(IqError::from(spawn).kind(), ErrorKind::ExternalTool);
    }

    #[test]
    fn only_page_failures_are_fatal() {
        let page_status = IqError::HttpStatus {
            context: "fetching https://www.iq.com/play/x".into(),
            status: reqwest::StatusCode::NOT_FOUND,
        };
        assert!(page_status.is_fatal());
        assert!(IqError::MissingTitle { url: "https://www.iq.com/play/x".into() }.is_fatal());

        let subtitle = IqError::Subtitle {
            lang: "en".into(),
            source: DownloaderError::HttpStatus {
                context: "downloading https://meta.video.iqiyi.com/x.srt".into(),
                status: reqwest::StatusCode::NOT_FOUND,
            },
        };
        assert_eq!(subtitle.kind(), ErrorKind::Network);
        assert!(!subtitle.is_fatal());

        let spawn = IqError::from(DownloaderError::Spawn {
            program: "N_m3u8DL-RE".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
        assert!(!spawn.is_fatal());
    }
}
