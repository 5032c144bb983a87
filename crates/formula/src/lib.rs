//! Homebrew formula generation for neokikoeru releases.
//!
//! This crate looks up a tagged neokikoeru release on GitHub, picks out the
//! per-platform archives, and renders their download URLs and checksums into
//! the tap's formula template.
//!
//! # Example
//!
//! ```rust,ignore
//! use neokikoeru_formula::{ReleaseClient, ReleaseClientConfig, Version, generate};
//! use std::path::Path;
//!
//! let version = Version::from_env()?;
//! let client = ReleaseClient::new(ReleaseClientConfig::new().with_token_from_env())?;
//! generate(
//!     &client,
//!     &version,
//!     Path::new("./templates/neokikoeru.rb.tmpl"),
//!     Path::new("./Formula/neokikoeru.rb"),
//! )
//! .await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod error;
mod formula;
mod generate;
mod release;
mod template;
mod version;

pub use error::{Error, Result};
pub use formula::{BinaryInfo, Formula, Platform, SHA256_DIGEST_PREFIX, strip_digest_prefix};
pub use generate::{
    DEFAULT_OUTPUT_PATH, DEFAULT_TEMPLATE_PATH, generate, render_formula, write_formula,
};
pub use release::{
    Asset, DEFAULT_API_URL, DEFAULT_REPOSITORY, DEFAULT_TIMEOUT, Release, ReleaseClient,
    ReleaseClientConfig, Repository,
};
pub use template::Template;
pub use version::{VERSION_ENV_KEY, Version};
