use inquire::*;
use iq::errors::*;
use iq::options::{Language, Resolution};

use crate::args::*;
use crate::constants::*;

pub fn prompt_for_args(args: &ResolveArgs) -> Result<RuntimeArgs> {
    let lang = match args.lang {
        Some(lang) if !args.app_args.interactive => lang,
        current => choose_lang(current)?,
    };

    let resolution = match args.resolution {
        Some(resolution) if !args.app_args.interactive => resolution,
        current => choose_resolution(current)?,
    };

    let url = match &args.url {
        Some(url) if !args.app_args.interactive => url.clone(),
        current => Text::new("media url:")
            .with_placeholder(EXAMPLE_URL)
            .with_help_message("a play or album url")
            .with_initial_value(current.as_deref().unwrap_or_default())
            .prompt()
            .map_err(|err| IqError::Message(format!("failed to read media URL: {err}")))?,
    };

    Ok(RuntimeArgs::new(url, lang, resolution))
}

fn choose_lang(current: Option<Language>) -> Result<Language> {
    let cursor = current
        .and_then(|lang| Language::ALL.iter().position(|l| *l == lang))
        .unwrap_or(0);

    Select::new("language:", Language::ALL.to_vec())
        .with_starting_cursor(cursor)
        .prompt()
        .map_err(|err| IqError::Message(format!("failed to read language: {err}")))
}

fn choose_resolution(current: Option<Resolution>) -> Result<Resolution> {
    let cursor = current
        .and_then(|res| Resolution::ALL.iter().position(|r| *r == res))
        .unwrap_or(0);

    Select::new("resolution:", Resolution::ALL.to_vec())
        .with_starting_cursor(cursor)
        .prompt()
        .map_err(|err| IqError::Message(format!("failed to read resolution: {err}")))
}

pub fn confirm_series(episodes: usize) -> Result<bool> {
    Confirm::new("download the entire series?")
        .with_help_message(&format!("{episodes} episode(s) found"))
        .with_default(false)
        .prompt()
        .map_err(|err| IqError::Message(format!("failed to read series choice: {err}")))
}
