use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, COOKIE, HeaderMap, HeaderName, HeaderValue, REFERER, USER_AGENT,
};
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use tracing::{debug, info, warn};

use iq_core::CookieJar;

use crate::errors::{IqError, Result};
use crate::options::{Language, Resolution};
use crate::page::{PageDocument, SubtitleTrack};

pub const PLAY_URL_BASE: &str = "https://www.iq.com/play";
pub const EPISODE_LIST_API: &str = "https://pcw-api.iq.com/api/v2/episodeListSource";
pub const SUBTITLE_HOST: &str = "https://meta.video.iqiyi.com";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";
const API_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
const REGION_OVERRIDE_ADDR: &str = "82.102.19.66";

const LANG_COOKIE: &str = "lang";
const BITRATE_COOKIE: &str = "QiyiPlayerBID";

#[derive(Debug, Default, Deserialize)]
pub struct EpisodeListing {
    #[serde(default)]
    data: Option<EpisodeListingData>,
}

#[derive(Debug, Default, Deserialize)]
struct EpisodeListingData {
    #[serde(default)]
    epg: Vec<EpisodeEntry>,
}

#[derive(Debug, Deserialize)]
struct EpisodeEntry {
    #[serde(rename = "playLocSuffix", default)]
    play_loc_suffix: Option<String>,
}

impl EpisodeListing {
    /// play urls for every listed episode that carries a `playLocSuffix`.
    pub fn play_urls(&self) -> Vec<String> {
        self.data
            .iter()
            .flat_map(|data| data.epg.iter())
            .filter_map(|entry| entry.play_loc_suffix.as_deref())
            .map(|slug| format!("{PLAY_URL_BASE}/{slug}"))
            .collect()
    }
}

pub struct IqClient {
    client: ReqwestClient,
    cookies: CookieJar,
    episode_api: String,
    subtitle_host: String,
}

impl IqClient {
    /// creates a client that sends `cookies` with every page request.
    pub fn new(cookies: CookieJar) -> Result<Self> {
        let client = ReqwestClient::builder()
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .map_err(IqError::BuildClient)?;

        Ok(Self {
            client,
            cookies,
            episode_api: EPISODE_LIST_API.to_string(),
            subtitle_host: SUBTITLE_HOST.to_string(),
        })
    }

    pub(crate) fn with_episode_api(mut self, episode_api: impl Into<String>) -> Self {
        self.episode_api = episode_api.into();
        self
    }

    pub(crate) fn with_subtitle_host(mut self, subtitle_host: impl Into<String>) -> Self {
        self.subtitle_host = subtitle_host.into();
        self
    }

    pub fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    pub fn http(&self) -> &ReqwestClient {
        &self.client
    }

    /// session cookies plus the two fixed playback parameters.
    pub fn page_cookies(&self, resolution: Resolution, lang: Language) -> CookieJar {
        self.cookies
            .with(LANG_COOKIE, lang.code())
            .with(BITRATE_COOKIE, resolution.bitrate_id().to_string())
    }

    fn page_headers(&self, url: &str, cookies: &CookieJar) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(
            HeaderName::from_static("upgrade-insecure-requests"),
            HeaderValue::from_static("1"),
        );

        if let Ok(v) = HeaderValue::from_str(url) {
            headers.insert(REFERER, v);
        }

        if !cookies.is_empty()
            && let Ok(v) = HeaderValue::from_str(&cookies.header_value())
        {
            headers.insert(COOKIE, v);
        }

        headers
    }

    fn api_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(API_USER_AGENT));
        headers.insert(
            HeaderName::from_static("x-forwarded-for"),
            HeaderValue::from_static(REGION_OVERRIDE_ADDR),
        );
        headers
    }

    fn ensure_success(response: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        Err(IqError::HttpStatus {
            context: context.to_string(),
            status: response.status(),
        })
    }

    /// fetches the raw html of a page with the session cookies attached.
    pub async fn fetch_html(
        &self,
        url: &str,
        resolution: Resolution,
        lang: Language,
    ) -> Result<Vec<u8>> {
        let cookies = self.page_cookies(resolution, lang);
        let context = format!("fetching {url}");

        let resp = self
            .client
            .get(url)
            .headers(self.page_headers(url, &cookies))
            .send()
            .await
            .map_err(|source| IqError::Request {
                context: context.clone(),
                source,
            })?;

        let resp = Self::ensure_success(resp, &context)?;

        let body = resp
            .bytes()
            .await
            .map_err(|source| IqError::ResponseBody {
                context: context.clone(),
                source,
            })?;

        debug!(url, bytes = body.len(), "fetched page");
        Ok(body.to_vec())
    }

    pub async fn fetch_page(
        &self,
        url: &str,
        resolution: Resolution,
        lang: Language,
    ) -> Result<PageDocument> {
        let html = self.fetch_html(url, resolution, lang).await?;
        Ok(PageDocument::from_bytes(url, &html))
    }

    /// lists the play urls of every episode in the page's album.
    ///
    /// a page without an album id is a single video and yields an empty list.
    /// api failures also degrade to an empty list.
    pub async fn get_episodes(&self, page: &PageDocument, lang: Language) -> Vec<String> {
        let Some(album_id) = page.album_id() else {
            return Vec::new();
        };

        match self.fetch_episode_listing(&album_id, lang).await {
            Ok(listing) => {
                let urls = listing.play_urls();
                info!(album_id = %album_id, count = urls.len(), "resolved episodes");
                urls
            }
            Err(err) => {
                warn!("failed to retrieve episodes: {err}");
                Vec::new()
            }
        }
    }

    async fn fetch_episode_listing(
        &self,
        album_id: &str,
        lang: Language,
    ) -> Result<EpisodeListing> {
        let url = format!("{}/{album_id}", self.episode_api);
        let context = format!("requesting episode list for album {album_id}");

        let resp = self
            .client
            .get(&url)
            .headers(Self::api_headers())
            .query(&[
                ("platformId", "3"),
                ("modeCode", "my"),
                ("langCode", lang.code()),
                ("startOrder", "0"),
                ("endOrder", "10000"),
            ])
            .send()
            .await
            .map_err(|source| IqError::Request {
                context: context.clone(),
                source,
            })?;

        let resp = Self::ensure_success(resp, &context)?;

        let text = resp
            .text()
            .await
            .map_err(|source| IqError::ResponseBody {
                context: context.clone(),
                source,
            })?;

        serde_json::from_str(&text).map_err(|source| IqError::Json {
            context: "parsing episode list json".to_string(),
            source,
        })
    }

    pub fn subtitle_url(&self, track: &SubtitleTrack) -> String {
        format!("{}{}", self.subtitle_host, track.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;

    #[test]
    fn listing_maps_slugs_to_play_urls() {
        let listing: EpisodeListing = serde_json::from_str(
            r#"{"code":"0","data":{"epg":[
                {"order":1,"playLocSuffix":"ep1-abc"},
                {"order":2},
                {"order":3,"playLocSuffix":"ep3-def"}
            ]}}"#,
        )
        .expect("listing should decode");

        assert_eq!(
            listing.play_urls(),
            [
                "https://www.iq.com/play/ep1-abc",
                "https://www.iq.com/play/ep3-def",
            ]
        );
    }

    #[test]
    fn listing_without_data_is_empty() {
        let listing: EpisodeListing = serde_json::from_str(r#"{"code":"A00001","data":null}"#)
            .expect("listing should decode");
        assert!(listing.play_urls().is_empty());
    }

    #[test]
    fn page_cookies_merge_fixed_parameters() {
        let mut jar = CookieJar::new();
        jar.insert("P00001", "token");
        let client = IqClient::new(jar).expect("client");

        let cookies = client.page_cookies(Resolution::P720, Language::Thai);
        assert_eq!(cookies.get("P00001"), Some("token"));
        assert_eq!(cookies.get("lang"), Some("th_th"));
        assert_eq!(cookies.get("QiyiPlayerBID"), Some("400"));
        assert!(client.cookies().get("lang").is_none());
    }

    #[test]
    fn subtitle_url_prefixes_host() {
        let track = SubtitleTrack {
            lang: "en".into(),
            path: "/dc/dt/abc.srt".into(),
        };
        let client = IqClient::new(CookieJar::new()).expect("client");
        assert_eq!(
            client.subtitle_url(&track),
            "https://meta.video.iqiyi.com/dc/dt/abc.srt"
        );
    }

    #[tokio::test]
    async fn fetch_html_rejects_error_status() {
        let base = serve_once("404 Not Found", "<html>gone</html>").await;
        let client = IqClient::new(CookieJar::new()).expect("client");

        let err = client
            .fetch_html(&format!("{base}/play/missing"), Resolution::P1080, Language::English)
            .await
            .expect_err("404 should fail the fetch");

        assert!(matches!(
            err,
            IqError::HttpStatus { status, .. } if status == reqwest::StatusCode::NOT_FOUND
        ));
        assert_eq!(err.kind(), crate::errors::ErrorKind::Network);
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn fetch_page_parses_served_html() {
        let base = serve_once(
            "200 OK",
            r#"<p class="intl-play-title">Pilot</p><script id="__NEXT_DATA__">{"props":{}}</script>"#,
        )
        .await;
        let client = IqClient::new(CookieJar::new()).expect("client");

        let page = client
            .fetch_page(&format!("{base}/play/pilot"), Resolution::P720, Language::English)
            .await
            .expect("page should load");

        assert_eq!(page.title().expect("title"), "Pilot");
        assert!(page.data().is_some());
    }

    #[tokio::test]
    async fn single_video_page_has_no_episodes() {
        let client = IqClient::new(CookieJar::new())
            .expect("client")
            .with_episode_api("http://127.0.0.1:9/unreachable");
        let page = PageDocument::from_html(
            "https://www.iq.com/play/movie",
            r#"<script id="__NEXT_DATA__">{"props":{"initialState":{"album":{}}}}</script>"#,
        );

        assert!(client.get_episodes(&page, Language::English).await.is_empty());
    }

    #[tokio::test]
    async fn unreachable_episode_api_degrades_to_empty() {
        let client = IqClient::new(CookieJar::new())
            .expect("client")
            .with_episode_api("http://127.0.0.1:9/unreachable");
        let page = PageDocument::from_html(
            "https://www.iq.com/play/series-ep1",
            r#"<script id="__NEXT_DATA__">{"props":{"initialState":{"album":{"videoAlbumInfo":{"albumId":42}}}}}</script>"#,
        );

        assert!(client.get_episodes(&page, Language::English).await.is_empty());
    }
}
