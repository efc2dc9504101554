use owo_colors::OwoColorize;
use tracing::info;

use iq::errors::*;
use iq::prelude::*;

use crate::args::*;
use crate::logger::*;
use crate::prompt::*;
use crate::utils::*;

/// a page to process; the entry page is already fetched, series episodes are
/// fetched one at a time when their turn comes.
#[derive(Debug, Clone)]
pub enum EpisodeTarget {
    Fetched(PageDocument),
    Pending(String),
}

#[derive(Debug, Clone)]
pub struct DownloadPlan {
    /// title used for the output folder.
    pub folder: String,
    pub targets: Vec<EpisodeTarget>,
}

pub struct Session {
    pub client: IqClient,
    pub runtime: RuntimeArgs,
}

impl Session {
    pub async fn page(&self, target: EpisodeTarget, logger: &CliLogger) -> Result<PageDocument> {
        match target {
            EpisodeTarget::Fetched(page) => Ok(page),
            EpisodeTarget::Pending(url) => {
                logger
                    .while_loading(
                        format!("fetching {}", url.yellow()),
                        self.client
                            .fetch_page(&url, self.runtime.resolution, self.runtime.lang),
                    )
                    .await
            }
        }
    }
}

fn needs_prompt(args: &ResolveArgs) -> bool {
    args.app_args.interactive
        || args.url.is_none()
        || args.lang.is_none()
        || args.resolution.is_none()
}

pub fn runtime_args(args: &ResolveArgs) -> Result<RuntimeArgs> {
    match args {
        args if needs_prompt(args) => prompt_for_args(args),
        ResolveArgs {
            url: Some(url),
            lang: Some(lang),
            resolution: Some(resolution),
            ..
        } => Ok(RuntimeArgs::new(url.clone(), *lang, *resolution)),
        args => prompt_for_args(args),
    }
}

pub fn open_session(
    mut runtime: RuntimeArgs,
    args: &ResolveArgs,
    logger: &CliLogger,
) -> Result<Session> {
    runtime.url = normalize_page_url(&runtime.url)?;
    info!(
        lang = runtime.lang.code(),
        resolution = %runtime.resolution,
        url = %runtime.url,
        "starting"
    );

    logger.loading("loading cookies");
    let client = IqBuilder::new().cookies_file(&args.cookies).build()?;
    if !client.cookies().is_empty() {
        logger.success(format!("loaded {} cookie(s)", client.cookies().len().yellow()));
    }

    Ok(Session { client, runtime })
}

/// fetches the entry page and decides between a single video and a series.
pub async fn plan_downloads(
    session: &Session,
    choice: SeriesChoice,
    logger: &CliLogger,
) -> Result<DownloadPlan> {
    let runtime = &session.runtime;

    let base = logger
        .while_loading(
            format!("getting info from: {}", runtime.url.yellow()),
            session
                .client
                .fetch_page(&runtime.url, runtime.resolution, runtime.lang),
        )
        .await?;

    let episodes = logger
        .while_loading(
            "looking for other episodes",
            session.client.get_episodes(&base, runtime.lang),
        )
        .await;

    if episodes.is_empty() {
        let title = base.title()?;
        logger.success(format!("title: {}", title.yellow()));
        return Ok(single(base, title));
    }

    let series_title = base.series_title();
    logger.success(format!(
        "series title: {}",
        series_title.as_deref().unwrap_or("unknown").yellow()
    ));
    logger.success(format!("episodes: {}", episodes.len().yellow()));

    let whole_series = match choice {
        SeriesChoice::All => true,
        SeriesChoice::Single => false,
        SeriesChoice::Ask => confirm_series(episodes.len())?,
    };

    if !whole_series {
        info!("skipping series download");
        let title = base.title()?;
        return Ok(single(base, title));
    }

    let folder = match series_title {
        Some(title) => title,
        None => base.title()?,
    };

    Ok(DownloadPlan {
        folder,
        targets: episodes.into_iter().map(EpisodeTarget::Pending).collect(),
    })
}

fn single(page: PageDocument, title: String) -> DownloadPlan {
    DownloadPlan {
        folder: title,
        targets: vec![EpisodeTarget::Fetched(page)],
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn resolve_args(url: Option<&str>, interactive: bool) -> ResolveArgs {
        ResolveArgs {
            url: url.map(str::to_string),
            cookies: PathBuf::from(iq::DEFAULT_COOKIES_PATH),
            lang: Some(Language::English),
            resolution: Some(Resolution::P1080),
            all: false,
            single: false,
            app_args: AppArgs {
                log_level: "info".to_string(),
                log_file: PathBuf::from("logs/logs.log"),
                interactive,
            },
        }
    }

    #[test]
    fn complete_args_skip_prompts() {
        let args = resolve_args(Some("https://www.iq.com/play/abc"), false);
        assert!(!needs_prompt(&args));

        let runtime = runtime_args(&args).expect("runtime args");
        assert_eq!(runtime.url, "https://www.iq.com/play/abc");
        assert_eq!(runtime.resolution.bitrate_id(), 600);
    }

    #[test]
    fn missing_url_or_interactive_flag_prompts() {
        assert!(needs_prompt(&resolve_args(None, false)));
        assert!(needs_prompt(&resolve_args(Some("https://www.iq.com/play/abc"), true)));
    }

    #[test]
    fn series_flags_map_to_choice() {
        let mut args = resolve_args(None, false);
        assert_eq!(args.series_choice(), SeriesChoice::Ask);
        args.all = true;
        assert_eq!(args.series_choice(), SeriesChoice::All);
        args.all = false;
        args.single = true;
        assert_eq!(args.series_choice(), SeriesChoice::Single);
    }
}
