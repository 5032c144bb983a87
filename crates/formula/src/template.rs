//! Field-substitution templates.
//!
//! A template is plain text with `{{.Field}}` placeholders (whitespace inside
//! the braces is allowed). Rendering replaces each placeholder with the
//! matching field of a serializable value. There are no conditionals, loops,
//! or pipelines; any other `{{` action is rejected when the template is
//! parsed.

use crate::error::{Error, Result};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*\.([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(String),
}

/// A parsed template.
#[derive(Debug, Clone)]
pub struct Template {
    path: PathBuf,
    segments: Vec<Segment>,
}

impl Template {
    /// Reads and parses the template at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::Template`] if it contains an unsupported action.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source =
            std::fs::read_to_string(path).map_err(|e| Error::io("read template", path, e))?;
        Self::parse(path, &source)
    }

    /// Parses template `source`; `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] if a `{{` does not open a `{{.Field}}`
    /// placeholder.
    pub fn parse(path: impl Into<PathBuf>, source: &str) -> Result<Self> {
        let path = path.into();
        let mut segments = Vec::new();
        let mut last = 0;

        for captures in PLACEHOLDER_REGEX.captures_iter(source) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            push_text(&path, source, last, whole.start(), &mut segments)?;
            segments.push(Segment::Field(name.as_str().to_string()));
            last = whole.end();
        }
        push_text(&path, source, last, source.len(), &mut segments)?;

        Ok(Self { path, segments })
    }

    /// Field names referenced by the template, in order of appearance.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Field(name) => Some(name.as_str()),
            Segment::Text(_) => None,
        })
    }

    /// Path the template was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Renders the template against `data`, which must serialize to a map.
    ///
    /// String fields are inserted verbatim, numbers and booleans in their
    /// JSON form, and `null` as an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] if `data` is not a map, a placeholder names
    /// a field `data` does not have, or the field is not a scalar.
    pub fn render<T: Serialize>(&self, data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let Value::Object(fields) = value else {
            return Err(Error::template(
                &self.path,
                "template data must serialize to a map",
            ));
        };

        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(name) => match fields.get(name) {
                    Some(Value::String(s)) => out.push_str(s),
                    Some(Value::Null) => {}
                    Some(v @ (Value::Number(_) | Value::Bool(_))) => out.push_str(&v.to_string()),
                    Some(Value::Array(_) | Value::Object(_)) => {
                        return Err(Error::template(
                            &self.path,
                            format!("field '{name}' is not a scalar value"),
                        ));
                    }
                    None => {
                        return Err(Error::template(
                            &self.path,
                            format!("unknown field '{name}'"),
                        ));
                    }
                },
            }
        }
        Ok(out)
    }
}

fn push_text(
    path: &Path,
    source: &str,
    start: usize,
    end: usize,
    segments: &mut Vec<Segment>,
) -> Result<()> {
    let text = &source[start..end];
    if let Some(offset) = text.find("{{") {
        let line = source[..start + offset].matches('\n').count() + 1;
        return Err(Error::template(
            path,
            format!("line {line}: unsupported or unterminated action, expected {{{{.Field}}}}"),
        ));
    }
    if !text.is_empty() {
        segments.push(Segment::Text(text.to_string()));
    }
    Ok(())
}
