use crate::tracing::{LogLevel, TracingConfig, TracingFormat};
use clap::Parser;
use neokikoeru_formula::{
    DEFAULT_API_URL, DEFAULT_OUTPUT_PATH, DEFAULT_REPOSITORY, DEFAULT_TEMPLATE_PATH,
    DEFAULT_TIMEOUT, ReleaseClientConfig, Repository,
};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "update-formula")]
#[command(
    about = "Regenerate the neokikoeru Homebrew formula from a GitHub release",
    long_about = "Regenerate the neokikoeru Homebrew formula from a GitHub release.\n\n\
                  The release version is read from $NEOKIKOERU_VERSION and must be \
                  MAJOR.MINOR.PATCH. GITHUB_TOKEN or GH_TOKEN is sent as a bearer \
                  token when set."
)]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        value_name = "PATH",
        help = "Formula template to render",
        default_value = DEFAULT_TEMPLATE_PATH
    )]
    pub template: PathBuf,

    #[arg(
        short = 'o',
        long,
        value_name = "PATH",
        help = "Formula file to write (created or overwritten)",
        default_value = DEFAULT_OUTPUT_PATH
    )]
    pub output: PathBuf,

    #[arg(
        long,
        value_name = "URL",
        env = "GITHUB_API_URL",
        help = "GitHub API base URL",
        default_value = DEFAULT_API_URL
    )]
    pub api_url: String,

    #[arg(
        long,
        value_name = "OWNER/REPO",
        help = "Repository the release is published in",
        default_value = DEFAULT_REPOSITORY
    )]
    pub repository: Repository,

    #[arg(
        long,
        value_name = "SECS",
        help = "Total timeout for the release request",
        default_value_t = DEFAULT_TIMEOUT.as_secs()
    )]
    pub timeout: u64,

    #[arg(long, help = "Print the rendered formula instead of writing it")]
    pub dry_run: bool,

    #[arg(
        short = 'l',
        long,
        help = "Set logging level",
        default_value = "info",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(long, help = "Log output format", default_value = "compact", value_enum)]
    pub log_format: TracingFormat,

    #[arg(long, help = "Output logs in JSON format (same as --log-format json)")]
    pub json: bool,
}

impl Cli {
    pub fn tracing_config(&self) -> TracingConfig {
        TracingConfig {
            format: if self.json {
                TracingFormat::Json
            } else {
                self.log_format
            },
            level: self.level.into(),
            ..Default::default()
        }
    }

    pub fn release_client_config(&self) -> ReleaseClientConfig {
        ReleaseClientConfig::new()
            .with_api_url(self.api_url.clone())
            .with_repository(self.repository.clone())
            .with_timeout(Duration::from_secs(self.timeout))
            .with_token_from_env()
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
