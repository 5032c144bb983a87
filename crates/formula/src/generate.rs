//! End-to-end formula generation.

use crate::error::{Error, Result};
use crate::formula::Formula;
use crate::release::ReleaseClient;
use crate::template::Template;
use crate::version::Version;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Template rendered into the formula, relative to the tap checkout.
pub const DEFAULT_TEMPLATE_PATH: &str = "./templates/neokikoeru.rb.tmpl";

/// Formula file written by [`generate`], relative to the tap checkout.
pub const DEFAULT_OUTPUT_PATH: &str = "./Formula/neokikoeru.rb";

/// Fetches the release for `version` and renders it through the template at
/// `template_path`, without writing anything.
///
/// # Errors
///
/// Propagates fetch errors from [`ReleaseClient::fetch_release`] and
/// template errors from [`Template::load`] and [`Template::render`].
pub async fn render_formula(
    client: &ReleaseClient,
    version: &Version,
    template_path: &Path,
) -> Result<String> {
    let release = client.fetch_release(version).await?;
    let formula = Formula::from_release(version, &release);

    let template = Template::load(template_path)?;
    debug!(
        template = %template_path.display(),
        fields = template.fields().count(),
        "Loaded formula template"
    );
    template.render(&formula)
}

/// Writes `contents` to `path`, creating the file or truncating an existing one.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or written.
pub fn write_formula(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| Error::io("write formula", path, e))?;
    info!(path = %path.display(), bytes = contents.len(), "Wrote formula");
    Ok(())
}

/// Renders the formula for `version` and writes it to `output_path`.
///
/// The template is fully rendered before the output file is touched, so a
/// fetch or template failure leaves any existing formula unchanged.
///
/// # Errors
///
/// See [`render_formula`] and [`write_formula`].
pub async fn generate(
    client: &ReleaseClient,
    version: &Version,
    template_path: &Path,
    output_path: &Path,
) -> Result<PathBuf> {
    let rendered = render_formula(client, version, template_path).await?;
    write_formula(output_path, &rendered)?;
    Ok(output_path.to_path_buf())
}
