use scraper::{Html, Selector};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{IqError, Result};

/// id of the script element holding the server-rendered page state.
pub const DATA_ISLAND_ID: &str = "__NEXT_DATA__";

pub const VIDEO_PATH: &[&str] = &[
    "props", "initialProps", "pageProps", "prePlayerData", "dash", "data", "program", "video",
];

pub const SUBTITLE_PATH: &[&str] = &[
    "props", "initialProps", "pageProps", "prePlayerData", "dash", "data", "program", "stl",
];

pub const ALBUM_ID_PATH: &[&str] = &["props", "initialState", "album", "videoAlbumInfo", "albumId"];

const TITLE_SELECTOR: &str = "p.intl-play-title";
const SERIES_TITLE_SELECTOR: &str = "span.intl-album-title-word-wrap span";

/// subtitle descriptor found in the page state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleTrack {
    /// language tag as reported by the site (used in the output file name).
    pub lang: String,
    /// path relative to the subtitle host.
    pub path: String,
}

/// a fetched play page: the raw html plus its parsed data island.
///
/// only owned data is kept so the document can cross `.await` points; the
/// html tree is re-parsed for the few selector lookups that need it.
#[derive(Debug, Clone)]
pub struct PageDocument {
    url: String,
    html: String,
    data: Option<Value>,
}

impl PageDocument {
    pub fn from_bytes(url: impl Into<String>, bytes: &[u8]) -> Self {
        Self::from_html(url, String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn from_html(url: impl Into<String>, html: impl Into<String>) -> Self {
        let url = url.into();
        let html = html.into();
        let data = parse_json_from_html(&html, DATA_ISLAND_ID);
        Self { url, html, data }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// the whole data island, if the page carried one.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// walks `key_path` through the data island.
    ///
    /// object members are addressed by name and array elements by decimal
    /// index. any segment that does not match the json shape yields `None`;
    /// callers treat that as "feature not present".
    pub fn extract_data(&self, key_path: &[&str]) -> Option<&Value> {
        let Some(mut current) = self.data.as_ref() else {
            warn!(url = %self.url, "page has no {DATA_ISLAND_ID} data, skipping...");
            return None;
        };

        for key in key_path {
            let next = match current {
                Value::Object(map) => map.get(*key),
                Value::Array(items) => key.parse::<usize>().ok().and_then(|idx| items.get(idx)),
                _ => None,
            };

            match next {
                Some(value) => current = value,
                None => {
                    warn!("key not found in JSON: {key:?} skipping...");
                    return None;
                }
            }
        }

        Some(current)
    }

    /// first `m3u8` manifest reference among the program's video entries.
    pub fn video_m3u8(&self) -> Option<String> {
        let m3u8 = self
            .extract_data(VIDEO_PATH)
            .and_then(Value::as_array)
            .and_then(|videos| {
                videos
                    .iter()
                    .find_map(|video| video.get("m3u8").and_then(Value::as_str))
            })
            .map(str::to_string);

        if m3u8.is_none() {
            warn!("no m3u8 link found.");
        }

        m3u8
    }

    /// album id of the series this page belongs to; `None` on single videos.
    pub fn album_id(&self) -> Option<String> {
        match self.extract_data(ALBUM_ID_PATH)? {
            Value::String(id) if !id.trim().is_empty() => Some(id.trim().to_string()),
            Value::Number(id) => Some(id.to_string()),
            other => {
                debug!(value = %other, "album id is not usable");
                None
            }
        }
    }

    /// subtitle tracks listed for the current program.
    pub fn subtitles(&self) -> Vec<SubtitleTrack> {
        let Some(entries) = self.extract_data(SUBTITLE_PATH).and_then(Value::as_array) else {
            return Vec::new();
        };

        entries
            .iter()
            .filter_map(|entry| {
                let lang = entry.get("_name").and_then(Value::as_str)?;
                let path = entry.get("srt").and_then(Value::as_str)?;
                Some(SubtitleTrack {
                    lang: lang.to_string(),
                    path: path.to_string(),
                })
            })
            .collect()
    }

    /// episode title; required to name output files.
    pub fn title(&self) -> Result<String> {
        select_text(&self.html, TITLE_SELECTOR).ok_or_else(|| IqError::MissingTitle {
            url: self.url.clone(),
        })
    }

    /// series title, absent on some pages.
    pub fn series_title(&self) -> Option<String> {
        let title = select_text(&self.html, SERIES_TITLE_SELECTOR);
        if title.is_none() {
            warn!(url = %self.url, "failed to get series title");
        }
        title
    }
}

/// parses the json text of the `script#<element_id>` element.
pub fn parse_json_from_html(html: &str, element_id: &str) -> Option<Value> {
    let doc = Html::parse_document(html);
    let selector = match Selector::parse(&format!("script#{element_id}")) {
        Ok(selector) => selector,
        Err(err) => {
            warn!("invalid element id {element_id:?}: {err}");
            return None;
        }
    };

    let Some(script) = doc.select(&selector).next() else {
        warn!("error parsing JSON from HTML: no script#{element_id} element");
        return None;
    };

    let text = script.text().collect::<String>();
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("error parsing JSON from HTML: {err}");
            None
        }
    }
}

fn select_text(html: &str, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let doc = Html::parse_document(html);
    let text = doc
        .select(&selector)
        .next()?
        .text()
        .collect::<String>()
        .trim()
        .to_string();

    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://www.iq.com/play/test-episode";

    fn page_with_data(data: &str, body: &str) -> PageDocument {
        PageDocument::from_html(
            URL,
            format!(
                r#"<html><head><script id="__NEXT_DATA__" type="application/json">{data}</script></head><body>{body}</body></html>"#
            ),
        )
    }

    fn program(program: &str) -> String {
        format!(
            r#"{{"props":{{"initialProps":{{"pageProps":{{"prePlayerData":{{"dash":{{"data":{{"program":{program}}}}}}}}}}}}}}}"#
        )
    }

    #[test]
    fn extract_data_walks_objects_and_arrays() {
        let page = page_with_data(r#"{"a":{"b":[{"c":1},{"c":2}]}}"#, "");
        assert_eq!(page.extract_data(&["a", "b", "1", "c"]), Some(&Value::from(2)));
    }

    #[test]
    fn extract_data_returns_none_on_divergent_path() {
        let page = page_with_data(r#"{"a":{"b":1}}"#, "");
        assert_eq!(page.extract_data(&["a", "missing"]), None);
        assert_eq!(page.extract_data(&["a", "b", "c"]), None);
        assert_eq!(page.extract_data(&["a", "0"]), None);
    }

    #[test]
    fn extract_data_without_data_island_is_none() {
        let page = PageDocument::from_html(URL, "<html><body>no data</body></html>");
        assert!(page.data().is_none());
        assert_eq!(page.extract_data(&["props"]), None);
    }

    #[test]
    fn malformed_data_island_is_ignored() {
        let page = page_with_data("{not json", "");
        assert!(page.data().is_none());
    }

    #[test]
    fn picks_first_video_with_m3u8() {
        let data = program(
            r#"{"video":[{"bid":600},{"bid":400,"m3u8":"http://x/a.m3u8"},{"m3u8":"http://x/b.m3u8"}]}"#,
        );
        let page = page_with_data(&data, "");
        assert_eq!(page.video_m3u8().as_deref(), Some("http://x/a.m3u8"));
    }

    #[test]
    fn no_video_list_means_no_m3u8() {
        let page = page_with_data(&program("{}"), "");
        assert_eq!(page.video_m3u8(), None);
    }

    #[test]
    fn album_id_accepts_numbers_and_strings() {
        let numeric = page_with_data(
            r#"{"props":{"initialState":{"album":{"videoAlbumInfo":{"albumId":5213786427541901}}}}}"#,
            "",
        );
        assert_eq!(numeric.album_id().as_deref(), Some("5213786427541901"));

        let text = page_with_data(
            r#"{"props":{"initialState":{"album":{"videoAlbumInfo":{"albumId":"abc"}}}}}"#,
            "",
        );
        assert_eq!(text.album_id().as_deref(), Some("abc"));
    }

    #[test]
    fn album_id_absent_or_null() {
        let missing = page_with_data(r#"{"props":{"initialState":{}}}"#, "");
        assert_eq!(missing.album_id(), None);

        let null = page_with_data(
            r#"{"props":{"initialState":{"album":{"videoAlbumInfo":{"albumId":null}}}}}"#,
            "",
        );
        assert_eq!(null.album_id(), None);
    }

    #[test]
    fn collects_subtitle_tracks() {
        let data = program(
            r#"{"stl":[{"_name":"en","srt":"/sub/en.srt"},{"_name":"th"},{"_name":"ms","srt":"/sub/ms.srt"}]}"#,
        );
        let page = page_with_data(&data, "");
        assert_eq!(
            page.subtitles(),
            vec![
                SubtitleTrack { lang: "en".into(), path: "/sub/en.srt".into() },
                SubtitleTrack { lang: "ms".into(), path: "/sub/ms.srt".into() },
            ]
        );
    }

    #[test]
    fn reads_titles_from_markup() {
        let page = page_with_data(
            "{}",
            r#"<span class="intl-album-title-word-wrap"><span> My Show </span></span><p class="intl-play-title">My Show Episode 1</p>"#,
        );
        assert_eq!(page.title().expect("title"), "My Show Episode 1");
        assert_eq!(page.series_title().as_deref(), Some("My Show"));
    }

    #[test]
    fn missing_title_is_an_error_but_series_title_is_not() {
        let page = page_with_data("{}", "<p>nothing here</p>");
        assert!(matches!(page.title(), Err(IqError::MissingTitle { .. })));
        assert_eq!(page.series_title(), None);
    }
}
