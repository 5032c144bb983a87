//! Release version resolution.
//!
//! The version is supplied by the release pipeline through an environment
//! variable and must be a bare `MAJOR.MINOR.PATCH` triple. It is never parsed
//! into numeric components; the raw string is used verbatim in the release
//! tag and in the rendered formula.

use crate::error::{Error, Result};
use regex::Regex;
use std::env::VarError;
use std::fmt;
use std::sync::LazyLock;

/// Environment variable holding the version to publish.
pub const VERSION_ENV_KEY: &str = "NEOKIKOERU_VERSION";

#[allow(clippy::expect_used)]
static VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("version pattern is valid")
});

/// A validated `MAJOR.MINOR.PATCH` version string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version(String);

impl Version {
    /// Validates `value` against the strict three-part numeric pattern.
    ///
    /// `var` names the source of the value and only appears in errors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingVersion`] for an empty value and
    /// [`Error::InvalidVersion`] for anything that is not `N.N.N`.
    pub fn parse(var: &str, value: &str) -> Result<Self> {
        if value.is_empty() {
            return Err(Error::missing_version(var));
        }
        if !VERSION_REGEX.is_match(value) {
            return Err(Error::invalid_version(var, value));
        }
        Ok(Self(value.to_string()))
    }

    /// Reads and validates the version from the environment variable `var`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingVersion`] if the variable is unset or empty,
    /// and [`Error::InvalidVersion`] if it is not unicode or does not match.
    pub fn from_env_var(var: &str) -> Result<Self> {
        match std::env::var(var) {
            Ok(value) => Self::parse(var, &value),
            Err(VarError::NotPresent) => Err(Error::missing_version(var)),
            Err(VarError::NotUnicode(raw)) => {
                Err(Error::invalid_version(var, raw.to_string_lossy()))
            }
        }
    }

    /// Reads the version from [`VERSION_ENV_KEY`].
    ///
    /// # Errors
    ///
    /// See [`Version::from_env_var`].
    pub fn from_env() -> Result<Self> {
        Self::from_env_var(VERSION_ENV_KEY)
    }

    /// The release tag for this version (`v` + version).
    #[must_use]
    pub fn tag(&self) -> String {
        format!("v{}", self.0)
    }

    /// The raw version string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
