use std::sync::Arc;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use tracing::{error, info};

use iq::errors::*;
use iq::prelude::*;

use crate::args::*;
use crate::banner;
use crate::episode::*;
use crate::logger::*;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub download_args: DownloadArgs,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve a page and print its manifest and subtitle links
    Resolve(ResolveArgs),
    /// Download a video or a whole series through the external downloader
    Download(DownloadArgs),
}

#[derive(Debug)]
pub struct App {
    cli: Cli,
    logger: Arc<CliLogger>,
}

impl App {
    pub fn new() -> Self {
        let cli = Cli::parse();
        let app_args = match &cli.command {
            Some(Commands::Resolve(args)) => &args.app_args,
            Some(Commands::Download(args)) => &args.resolve.app_args,
            None => &cli.download_args.resolve.app_args,
        };
        let logger = Arc::new(CliLogger::new(&app_args.log_level));
        init_tracing(Arc::clone(&logger), &app_args.log_file);
        Self { cli, logger }
    }

    /// runs the selected command and returns the process exit code.
    pub async fn run(&self) -> i32 {
        let result = match &self.cli.command {
            Some(Commands::Resolve(args)) => self.resolve(args).await,
            Some(Commands::Download(args)) => self.download(args).await,
            None => self.download(&self.cli.download_args).await,
        };

        match result {
            Ok(()) => 0,
            Err(err) => {
                error!("an error occurred during the download: {err}");
                self.logger.failed(describe(&err));
                exit_code(&err)
            }
        }
    }

    fn start(&self, args: &ResolveArgs) -> Result<Session> {
        let prompting = args.app_args.interactive || args.url.is_none();
        if prompting {
            banner::refresh();
            println!("{}", "✨ welcome to the media downloader ✨".magenta());
        }

        let runtime = runtime_args(args)?;

        if prompting {
            banner::refresh();
        }

        self.logger.success(format!("language: {}", runtime.lang.yellow()));
        self.logger
            .success(format!("resolution: {}", runtime.resolution.yellow()));

        open_session(runtime, args, &self.logger)
    }

    pub async fn resolve(&self, args: &ResolveArgs) -> Result<()> {
        let logger = &self.logger;
        let session = self.start(args)?;
        let plan = plan_downloads(&session, args.series_choice(), logger).await?;

        for target in plan.targets {
            let page = session.page(target, logger).await?;
            let title = page.title()?;

            logger.success(format!("episode: {}", title.yellow()));
            if let Some(m3u8) = page.video_m3u8() {
                logger.success(format!("m3u8: {}", m3u8.yellow()));
            }
            for track in page.subtitles() {
                logger.success(format!(
                    "subtitle {}: {}",
                    track.lang,
                    session.client.subtitle_url(&track).yellow()
                ));
            }
        }

        Ok(())
    }

    pub async fn download(&self, args: &DownloadArgs) -> Result<()> {
        let logger = &self.logger;
        let session = self.start(&args.resolve)?;
        let plan = plan_downloads(&session, args.resolve.series_choice(), logger).await?;

        let pipeline = MediaPipeline {
            downloader: ExternalDownloader::new(&args.downloader).tmp_dir(&args.tmp_dir),
            manifest: ManifestFile::new(&args.manifest),
            output_root: args.output.clone(),
            subtitles: !args.no_subtitles,
        };

        for target in plan.targets {
            let page = session.page(target, logger).await?;
            let title = page.title()?;

            logger.success(format!("downloading media... {}", title.yellow()));
            let outcome = pipeline
                .run(&session.client, &page, &plan.folder, &title)
                .await?;

            if let Some(status) = outcome.status
                && status.success()
            {
                let file = outcome.names.dir(&pipeline.output_root).join(&outcome.names.file);
                logger.success(format!("done {}", file.display().yellow()));
            }
            if !outcome.subtitles.is_empty() {
                logger.success(format!("subtitles: {}", outcome.subtitles.len().yellow()));
            }
            info!(title = %title, "episode processed");
        }

        logger.success("download complete! check your output folder");
        Ok(())
    }
}

/// 1 when the page could not be fetched or named, 0 for every other failure.
fn exit_code(err: &IqError) -> i32 {
    if err.is_fatal() { 1 } else { 0 }
}

/// user facing summary for a failed run.
fn describe(err: &IqError) -> String {
    match err.kind() {
        ErrorKind::Network => format!("could not fetch content: {err}"),
        ErrorKind::NotFound => format!("{err}"),
        ErrorKind::ExternalTool => {
            format!("{err}. is the downloader installed and on PATH (see --downloader)?")
        }
        ErrorKind::Parse => format!("unexpected response from the site: {err}"),
        ErrorKind::Io => format!("filesystem error: {err}"),
        ErrorKind::Input => format!("{err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_to_download() {
        let cli = Cli::try_parse_from([
            "iq",
            "--url",
            "https://www.iq.com/play/abc",
            "--lang",
            "en_us",
            "--resolution",
            "720p",
        ])
        .expect("arguments should parse");

        assert!(cli.command.is_none());
        let args = &cli.download_args;
        assert_eq!(args.resolve.lang, Some(Language::English));
        assert_eq!(args.resolve.resolution, Some(Resolution::P720));
        assert_eq!(args.manifest.to_str(), Some("temp.m3u8"));
        assert_eq!(args.output.to_str(), Some("Downloads"));
    }

    #[test]
    fn all_and_single_conflict() {
        let err = Cli::try_parse_from(["iq", "download", "--all", "--single"])
            .expect_err("flags should conflict");
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn rejects_unknown_resolution() {
        assert!(Cli::try_parse_from(["iq", "resolve", "--resolution", "900p"]).is_err());
    }

    #[test]
    fn exit_code_is_one_only_for_page_failures() {
        let missing_title = IqError::MissingTitle {
            url: "https://www.iq.com/play/abc".to_string(),
        };
        assert_eq!(exit_code(&missing_title), 1);

        let subtitle = IqError::Subtitle {
            lang: "en".to_string(),
            source: iq::DownloaderError::Io {
                context: "writing output file".to_string(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            },
        };
        assert_eq!(exit_code(&subtitle), 0);
        assert_eq!(exit_code(&IqError::Downloader(iq_downloader_spawn_error())), 0);
    }

    #[test]
    fn describes_external_tool_failures() {
        let err = IqError::Downloader(iq_downloader_spawn_error());
        assert!(describe(&err).contains("--downloader"));
    }

    fn iq_downloader_spawn_error() -> iq::DownloaderError {
        iq::DownloaderError::Spawn {
            program: "N_m3u8DL-RE".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }
    }
}
