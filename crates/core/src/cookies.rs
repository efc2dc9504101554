use std::collections::BTreeMap;
use std::path::Path;

use tracing::{info, warn};

use crate::errors::{CookieError, Result};

const MAGIC_LINES: [&str; 2] = ["# Netscape HTTP Cookie File", "# HTTP Cookie File"];
const HTTP_ONLY_PREFIX: &str = "#HttpOnly_";

/// cookie name to value mapping loaded from a browser export.
///
/// the jar is read once per run and treated as read-only afterwards; fixed
/// request parameters are layered on top with [`CookieJar::with`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: BTreeMap<String, String>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    /// returns a copy of the jar with `name` set to `value`.
    pub fn with(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut jar = self.clone();
        jar.insert(name, value);
        jar
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cookies.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// renders the jar as a `Cookie` request header value.
    pub fn header_value(&self) -> String {
        self.iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// parses the contents of a Netscape/Mozilla `cookies.txt` export.
///
/// every data line carries seven tab separated fields:
/// `domain, include_subdomains, path, secure, expires, name, value`.
/// expiry is ignored so session and expired cookies are kept alike.
pub fn parse_cookie_jar(content: &str) -> Result<CookieJar> {
    let mut lines = content.lines().enumerate();

    let has_magic = lines.next().is_some_and(|(_, first)| {
        MAGIC_LINES
            .iter()
            .any(|magic| first.trim_start().starts_with(magic))
    });
    if !has_magic {
        return Err(CookieError::MissingHeader);
    }

    let mut jar = CookieJar::new();

    for (idx, raw) in lines {
        let line = raw.trim_end_matches('\r');
        let line = line.strip_prefix(HTTP_ONLY_PREFIX).unwrap_or(line);

        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 7 {
            return Err(CookieError::MalformedLine {
                line: idx + 1,
                fields: fields.len(),
            });
        }

        jar.insert(fields[5], fields[6]);
    }

    Ok(jar)
}

/// loads a cookie file, degrading to an empty jar on any failure.
///
/// callers get unauthenticated responses instead of an error when the file
/// is missing or unreadable.
pub fn load_cookies(path: impl AsRef<Path>) -> CookieJar {
    let path = path.as_ref();

    let result = std::fs::read_to_string(path)
        .map_err(|source| CookieError::Io {
            path: path.to_path_buf(),
            source,
        })
        .and_then(|content| parse_cookie_jar(&content));

    match result {
        Ok(jar) => {
            info!(count = jar.len(), path = %path.display(), "loaded cookies");
            jar
        }
        Err(CookieError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "cookie file not found");
            CookieJar::new()
        }
        Err(err) => {
            warn!(path = %path.display(), "error loading cookies: {err}");
            CookieJar::new()
        }
    }
}
