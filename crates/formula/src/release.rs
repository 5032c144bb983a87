//! GitHub release lookup.
//!
//! Fetches a single tagged release from the GitHub REST API. Exactly one
//! request is made per lookup: there is no retry, pagination, or caching.

use crate::error::{Error, Result};
use crate::version::Version;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Default GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Repository the releases are published from.
pub const DEFAULT_REPOSITORY: &str = "vscodev/neokikoeru";

/// Absolute deadline for the release request, including the body.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const GITHUB_API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// GitHub release metadata from the API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Release {
    /// Release title
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Downloadable files attached to the release, in API order
    #[serde(default, deserialize_with = "null_as_default")]
    pub assets: Vec<Asset>,
}

/// GitHub release asset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Asset {
    /// File name (e.g. `neokikoeru-linux-amd64.tar.gz`)
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Content digest, `sha256:<hex>`
    #[serde(default, deserialize_with = "null_as_default")]
    pub digest: String,
    /// Public download URL
    #[serde(default, deserialize_with = "null_as_default")]
    pub browser_download_url: String,
}

/// Body of a non-success GitHub API response.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    message: String,
}

/// GitHub marks unset values as `null`; treat them like missing ones.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A GitHub repository in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl FromStr for Repository {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(format!("Invalid repository '{s}'. Expected 'owner/repo'")),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self {
            owner: "vscodev".to_string(),
            name: "neokikoeru".to_string(),
        }
    }
}

/// Configuration for [`ReleaseClient`].
#[derive(Debug, Clone)]
pub struct ReleaseClientConfig {
    /// API base URL, without a trailing path
    pub api_url: String,
    /// Repository to look releases up in
    pub repository: Repository,
    /// Total request deadline
    pub timeout: Duration,
    /// Bearer token sent as `Authorization`, if any
    pub token: Option<String>,
}

impl Default for ReleaseClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            repository: Repository::default(),
            timeout: DEFAULT_TIMEOUT,
            token: None,
        }
    }
}

impl ReleaseClientConfig {
    /// Creates a configuration for the public GitHub API.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Sets the repository.
    #[must_use]
    pub fn with_repository(mut self, repository: Repository) -> Self {
        self.repository = repository;
        self
    }

    /// Sets the request deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the API token directly.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Picks up a token from `GITHUB_TOKEN` or `GH_TOKEN`, if set.
    #[must_use]
    pub fn with_token_from_env(mut self) -> Self {
        self.token = ["GITHUB_TOKEN", "GH_TOKEN"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|token| !token.is_empty());
        self
    }
}

/// Client for the GitHub releases endpoint.
pub struct ReleaseClient {
    client: Client,
    config: ReleaseClientConfig,
}

impl ReleaseClient {
    /// Creates a new release client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be initialized.
    pub fn new(config: ReleaseClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::http(&config.api_url, e))?;
        Ok(Self { client, config })
    }

    /// The API URL of the release tagged `v<version>`.
    #[must_use]
    pub fn release_url(&self, version: &Version) -> String {
        format!(
            "{}/repos/{}/{}/releases/tags/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.repository.owner,
            self.config.repository.name,
            version.tag()
        )
    }

    /// Fetches the release tagged `v<version>`.
    ///
    /// # Errors
    ///
    /// - [`Error::Http`] on transport failure or timeout
    /// - [`Error::Api`] carrying the API's message on a non-success status
    /// - [`Error::Json`] if either the release or the error body is malformed
    pub async fn fetch_release(&self, version: &Version) -> Result<Release> {
        let url = self.release_url(version);
        debug!(%url, "Fetching GitHub release");

        let mut request = self
            .client
            .get(&url)
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .header(GITHUB_API_VERSION_HEADER, GITHUB_API_VERSION);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| Error::http(&url, e))?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| Error::http(&url, e))?;

        if !status.is_success() {
            let envelope: ApiErrorEnvelope = serde_json::from_slice(&body)?;
            let message = if envelope.message.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                envelope.message
            };
            debug!(status = status.as_u16(), %message, "GitHub API error");
            return Err(Error::api(status.as_u16(), message));
        }

        let release: Release = serde_json::from_slice(&body)?;
        info!(
            release = %release.name,
            assets = release.assets.len(),
            "Fetched GitHub release"
        );
        Ok(release)
    }
}
