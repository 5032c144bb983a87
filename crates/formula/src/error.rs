//! Error types for formula generation.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for formula generation.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating a formula.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The version environment variable is unset or empty.
    #[error("${var} is not set. Please provide a valid semver")]
    #[diagnostic(
        code(neokikoeru::formula::missing_version),
        help("export {var}=<MAJOR.MINOR.PATCH>")
    )]
    MissingVersion {
        /// The environment variable that was read
        var: String,
    },

    /// The version string is not a plain `MAJOR.MINOR.PATCH`.
    #[error("${var} is not a valid version: '{value}'. Please provide a valid semver")]
    #[diagnostic(
        code(neokikoeru::formula::invalid_version),
        help("Version must be three dot-separated numbers (e.g., 1.3.6), without a 'v' prefix or suffixes")
    )]
    InvalidVersion {
        /// The environment variable that was read
        var: String,
        /// The rejected value
        value: String,
    },

    /// The HTTP request could not be built, sent, or read.
    #[error("Request to {url} failed: {}", source_chain(.source))]
    #[diagnostic(
        code(neokikoeru::formula::http),
        help("Check network connectivity to the GitHub API")
    )]
    Http {
        /// The requested URL
        url: String,
        /// The underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status.
    #[error("{message}")]
    #[diagnostic(code(neokikoeru::formula::api))]
    Api {
        /// HTTP status code
        status: u16,
        /// Message from the API error envelope
        message: String,
    },

    /// A response body was not the expected JSON shape.
    #[error("JSON error: {0}")]
    #[diagnostic(code(neokikoeru::formula::json))]
    Json(#[from] serde_json::Error),

    /// The template could not be parsed or rendered.
    #[error("Template error in {}: {message}", .path.display())]
    #[diagnostic(
        code(neokikoeru::formula::template),
        help("Placeholders use the form {{{{.Field}}}} and must name a formula field")
    )]
    Template {
        /// The template path
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// A file could not be read or written.
    #[error("Failed to {operation} {}: {source}", .path.display())]
    #[diagnostic(
        code(neokikoeru::formula::io),
        help("Check file permissions and ensure the parent directory exists")
    )]
    Io {
        /// What was being done
        operation: &'static str,
        /// The path involved
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a new missing version error.
    #[must_use]
    pub fn missing_version(var: impl Into<String>) -> Self {
        Self::MissingVersion { var: var.into() }
    }

    /// Create a new invalid version error.
    #[must_use]
    pub fn invalid_version(var: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidVersion {
            var: var.into(),
            value: value.into(),
        }
    }

    /// Create a new transport error.
    ///
    /// The URL is stripped from `source` since the message already carries it.
    #[must_use]
    pub fn http(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            url: url.into(),
            source: source.without_url(),
        }
    }

    /// Create a new API error.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a new template error.
    #[must_use]
    pub fn template(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Template {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error.
    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

/// Joins an error with its causes, skipping causes already in the message.
fn source_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut cause = error.source();
    while let Some(source) = cause {
        let text = source.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        cause = source.source();
    }
    message
}
