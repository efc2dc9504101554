pub mod builder;
pub mod client;
pub mod errors;
pub mod media;
pub mod options;
pub mod page;

#[cfg(test)]
mod test_support;

pub use builder::*;
pub use client::*;
pub use errors::*;
pub use media::*;
pub use options::*;
pub use page::*;

pub use iq_core::{CookieJar, load_cookies, slugify};
pub use iq_downloader::external::{DEFAULT_PROGRAM, DEFAULT_TMP_DIR};
pub use iq_downloader::manifest::DEFAULT_MANIFEST_PATH;
pub use iq_downloader::{DownloaderError, ExternalDownloader, ManifestFile};

pub mod prelude {
    pub use crate::builder::IqBuilder;
    pub use crate::client::IqClient;
    pub use crate::errors::{ErrorKind, IqError, Result};
    pub use crate::media::{MediaPipeline, OutputNames};
    pub use crate::options::{Language, Resolution};
    pub use crate::page::PageDocument;
    pub use iq_downloader::{ExternalDownloader, ManifestFile};
}
