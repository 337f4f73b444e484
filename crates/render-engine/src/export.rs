//! Writing finished cards to disk.

use std::path::{Path, PathBuf};

use exifcard_common::error::{CardError, CardResult};

use crate::compositor::{ComposeRequest, Compositor};
use crate::encode::OutputFormat;

pub use exifcard_common::config::DEFAULT_FILE_NAME;

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub bytes_written: usize,
    pub width: u32,
    pub height: u32,
    pub content_type: &'static str,
}

/// Compose a card and write it to `output_path`.
///
/// Parent directories are created as needed. The composite is computed fresh
/// on every call.
pub async fn export_card(
    compositor: &Compositor,
    request: &ComposeRequest<'_>,
    output_path: &Path,
) -> CardResult<ExportOutcome> {
    tracing::info!(
        output = %output_path.display(),
        format = ?compositor.output().format,
        "Starting export"
    );

    if output_path.as_os_str().is_empty() {
        return Err(CardError::render("Output path is empty"));
    }

    let encoded = compositor.compose(request)?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(output_path, &encoded.bytes).await?;

    tracing::info!(
        output = %output_path.display(),
        bytes = encoded.bytes.len(),
        "Export complete"
    );

    Ok(ExportOutcome {
        path: output_path.to_path_buf(),
        bytes_written: encoded.bytes.len(),
        width: encoded.width,
        height: encoded.height,
        content_type: encoded.content_type(),
    })
}

/// Output path for a card written into `dir`.
///
/// `file_name` keeps its stem; its extension is replaced to match `format`.
pub fn output_path_in(dir: &Path, file_name: &str, format: OutputFormat) -> PathBuf {
    let name = if file_name.trim().is_empty() {
        DEFAULT_FILE_NAME
    } else {
        file_name
    };
    dir.join(name).with_extension(format.extension())
}
