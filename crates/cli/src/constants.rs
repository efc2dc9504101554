use std::sync::LazyLock;

use regex::Regex;

pub const IQ_DOMAIN: &str = "iq.com";

pub const DEFAULT_LOG_FILE: &str = "logs/logs.log";
pub const DEFAULT_TMP_DIR: &str = iq::DEFAULT_TMP_DIR;
pub const DEFAULT_MANIFEST_PATH: &str = iq::DEFAULT_MANIFEST_PATH;
pub const DEFAULT_DOWNLOADER: &str = iq::DEFAULT_PROGRAM;

pub const EXAMPLE_URL: &str = "https://www.iq.com/play/...";

pub static PAGE_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        format!(
            r"^https?://(?:[a-z0-9-]+\.)*{}/(?:play|album)/[^\s]+$",
            regex::escape(IQ_DOMAIN)
        )
        .as_str(),
    )
    .expect("page link regex must compile")
});
