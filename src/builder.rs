use std::path::PathBuf;

use iq_core::{CookieJar, load_cookies};

use crate::client::{EPISODE_LIST_API, IqClient};
use crate::errors::Result;

pub const DEFAULT_COOKIES_PATH: &str = "cookies/cookies.txt";

pub struct IqBuilder {
    cookies_file: Option<PathBuf>,
    cookies: Option<CookieJar>,
    episode_api: String,
}

impl Default for IqBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IqBuilder {
    /// creates a new builder with no cookies configured.
    pub fn new() -> Self {
        Self {
            cookies_file: None,
            cookies: None,
            episode_api: EPISODE_LIST_API.to_string(),
        }
    }

    /// reads session cookies from a Netscape `cookies.txt` export at build time.
    pub fn cookies_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookies_file = Some(path.into());
        self
    }

    /// uses an already loaded jar. takes precedence over [`Self::cookies_file`].
    pub fn cookies(mut self, jar: CookieJar) -> Self {
        self.cookies = Some(jar);
        self
    }

    /// overrides the episode listing endpoint.
    pub fn episode_api(mut self, url: &str) -> Self {
        self.episode_api = url.trim_end_matches('/').to_string();
        self
    }

    /// builds an [`IqClient`] using the configured options.
    pub fn build(&self) -> Result<IqClient> {
        let jar = match (&self.cookies, &self.cookies_file) {
            (Some(jar), _) => jar.clone(),
            (None, Some(path)) => load_cookies(path),
            (None, None) => CookieJar::new(),
        };

        Ok(IqClient::new(jar)?.with_episode_api(&self.episode_api))
    }
}
