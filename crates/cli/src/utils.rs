use iq::errors::*;

use crate::constants::*;

/// trims the input and rewrites album links into play links, which is the
/// page form that carries the player data.
pub fn normalize_page_url(raw: &str) -> Result<String> {
    let input = raw.trim();

    if !PAGE_LINK_RE.is_match(input) {
        return Err(IqError::InvalidUrl {
            url: input.to_string(),
        });
    }

    Ok(input.replacen("/album/", "/play/", 1))
}
