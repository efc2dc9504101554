use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CookieError>;

#[derive(Debug, Error)]
pub enum CookieError {
    #[error("failed to read cookie file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("does not look like a Netscape format cookies file")]
    MissingHeader,

    #[error("invalid Netscape format cookies file: line {line} has {fields} field(s), expected 7")]
    MalformedLine { line: usize, fields: usize },
}
