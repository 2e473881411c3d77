// SPDX-License-Identifier: MPL-2.0
//! Export of a file list with the editor's current watermark.

use crate::batch::{self, BatchResult, FileReport, ImageTask, Outcome, Stage};
use crate::config::ExportConfig;
use crate::domain::watermark::{PlacementSpec, WatermarkStyle};
use crate::error::{Error, Result};
use crate::media::{NamingRule, OutputFormat};
use crate::watermark::FontLibrary;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Where and how to write exported files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub naming: NamingRule,
    /// Allows writing next to the originals.
    pub allow_source_directory: bool,
}

impl ExportRequest {
    /// A request with default format and naming.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            format: OutputFormat::default(),
            naming: NamingRule::default(),
            allow_source_directory: false,
        }
    }

    /// A request using the format and naming rule of an `[export]` section.
    #[must_use]
    pub fn from_config(output_dir: impl Into<PathBuf>, export: &ExportConfig) -> Self {
        Self {
            format: export.format,
            naming: export.naming_rule(),
            ..Self::new(output_dir)
        }
    }
}

/// Watermarks `files` with `style` and writes them to the requested directory.
///
/// # Errors
///
/// Returns [`Error::OutputConflict`] (writing nothing) when the output
/// directory contains one of the inputs and the request does not allow it,
/// or an I/O error if the output directory cannot be created. Per-file
/// problems end up in the returned reports, which are also handed to
/// `on_file` in input order as each file finishes.
///
/// Two inputs mapping to the same output name (`a.jpg` and `a.png` with JPEG
/// output) do not overwrite each other: the later one fails at the save stage.
pub fn export_images(
    files: &[PathBuf],
    style: &WatermarkStyle,
    placement: PlacementSpec,
    request: &ExportRequest,
    fonts: &FontLibrary,
    mut on_file: impl FnMut(&FileReport),
) -> Result<BatchResult> {
    if !request.allow_source_directory {
        if let Some(conflict) = files.iter().find(|f| is_inside(f, &request.output_dir)) {
            tracing::warn!(file = %conflict.display(), "export would overwrite source directory");
            return Err(Error::OutputConflict(request.output_dir.clone()));
        }
    }

    fs::create_dir_all(&request.output_dir)?;

    let font = batch::resolve_font(fonts, style, &style.text);
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
    let mut reports = Vec::with_capacity(files.len());
    for input in files {
        let output_path = request
            .output_dir
            .join(request.naming.file_name(input, request.format));
        let outcome = match claimed.get(&output_path) {
            Some(first) => {
                tracing::error!(
                    file = %input.display(),
                    output = %output_path.display(),
                    "output name already used by {}",
                    first.display()
                );
                Outcome::Failed {
                    stage: Stage::Save,
                    reason: format!(
                        "{} is already written from {}",
                        output_path.display(),
                        first.display()
                    ),
                }
            }
            None => {
                let task = ImageTask {
                    input_path: input.clone(),
                    output_path,
                    style: style.clone(),
                    placement,
                    format: Some(request.format),
                };
                let outcome = batch::process_task(&task, &font);
                if outcome.is_success() {
                    claimed.insert(task.output_path, input);
                }
                outcome
            }
        };
        let report = FileReport {
            input: input.clone(),
            text: Some(style.text.clone()),
            outcome,
        };
        on_file(&report);
        reports.push(report);
    }

    let result = BatchResult {
        output_dir: Some(request.output_dir.clone()),
        reports,
    };
    tracing::info!(
        processed = result.processed_count(),
        total = result.total_count(),
        dir = %request.output_dir.display(),
        "export finished"
    );
    Ok(result)
}

/// Returns whether `file` sits directly in `dir`.
fn is_inside(file: &Path, dir: &Path) -> bool {
    let Some(parent) = file.parent() else {
        return false;
    };
    match (fs::canonicalize(parent), fs::canonicalize(dir)) {
        (Ok(parent), Ok(dir)) => parent == dir,
        // A missing output directory cannot hold any input.
        _ => false,
    }
}
