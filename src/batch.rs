// SPDX-License-Identifier: MPL-2.0
//! Batch watermarking of a directory.
//!
//! Each file moves through `Pending → DateResolved → Watermarked → Saved`.
//! A file without any date is skipped; a file that fails to decode or save is
//! recorded as failed. Neither stops the batch.

use crate::directory_scanner;
use crate::domain::watermark::{PlacementSpec, WatermarkStyle};
use crate::error::{Error, Result};
use crate::media::{self, OutputFormat};
use crate::watermark::{self, FontLibrary, WatermarkFont, DATE_SAMPLE_TEXT};
use std::fmt;
use std::path::{Path, PathBuf};

// =============================================================================
// Options
// =============================================================================

/// Where the watermark text of each file comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TextSource {
    /// The capture date (EXIF, then modification time), as `YYYY-MM-DD`.
    #[default]
    CaptureDate,
    /// The same text on every file.
    Fixed(String),
}

impl TextSource {
    /// Text used to pick a font that covers every character.
    #[must_use]
    pub fn sample(&self) -> &str {
        match self {
            TextSource::CaptureDate => DATE_SAMPLE_TEXT,
            TextSource::Fixed(text) => text,
        }
    }
}

/// Settings shared by every file of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Appearance; its `text` is replaced per file according to `text`.
    pub style: WatermarkStyle,
    pub placement: PlacementSpec,
    pub text: TextSource,
}

/// One unit of work. Tasks share no mutable state.
#[derive(Debug, Clone)]
pub struct ImageTask {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub style: WatermarkStyle,
    pub placement: PlacementSpec,
    /// Encoder override; `None` picks it from the output extension.
    pub format: Option<OutputFormat>,
}

// =============================================================================
// Outcomes
// =============================================================================

/// The step a file failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Decode,
    Save,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Decode => "decode",
            Stage::Save => "save",
        })
    }
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(PathBuf),
    Skipped(String),
    Failed { stage: Stage, reason: String },
}

impl Outcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

/// Outcome of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub input: PathBuf,
    /// The watermark text, when one was determined.
    pub text: Option<String>,
    pub outcome: Outcome,
}

impl FileReport {
    /// File name for user-facing messages.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.input.file_name().map_or_else(
            || self.input.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        )
    }
}

/// Aggregate result of a batch or export run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    /// `None` when there was nothing to process and no directory was created.
    pub output_dir: Option<PathBuf>,
    pub reports: Vec<FileReport>,
}

impl BatchResult {
    /// Number of files written successfully.
    #[must_use]
    pub fn processed_count(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_success()).count()
    }

    /// Number of files considered, including skipped and failed ones.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.reports.len()
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::Skipped(_)))
            .count()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::Failed { .. }))
            .count()
    }
}

// =============================================================================
// Driver
// =============================================================================

/// Watermarks every supported image in `input_dir`.
///
/// Output goes to a fresh sibling `<name>_watermark` directory and keeps each
/// input file name. When the directory holds no supported image, nothing is
/// created and the result is empty.
///
/// # Errors
///
/// Fails only if `input_dir` is invalid or the output directory cannot be
/// prepared; per-file problems end up in the returned reports.
pub fn run_batch(
    input_dir: &Path,
    options: &BatchOptions,
    fonts: &FontLibrary,
    mut on_file: impl FnMut(&FileReport),
) -> Result<BatchResult> {
    directory_scanner::validate_input_directory(input_dir)?;

    let images = directory_scanner::get_supported_images(input_dir)?;
    if images.is_empty() {
        tracing::warn!(dir = %input_dir.display(), "no supported images found");
        return Ok(BatchResult::default());
    }
    tracing::info!(count = images.len(), "found images");

    let output_dir = directory_scanner::create_output_directory(input_dir)?;
    tracing::info!(dir = %output_dir.display(), "created output directory");

    let font = resolve_font(fonts, &options.style, options.text.sample());

    let mut reports = Vec::with_capacity(images.len());
    for input in images {
        let report = process_file(&input, &output_dir, options, &font);
        on_file(&report);
        reports.push(report);
    }

    let result = BatchResult {
        output_dir: Some(output_dir),
        reports,
    };
    tracing::info!(
        processed = result.processed_count(),
        total = result.total_count(),
        "batch finished"
    );
    Ok(result)
}

/// Resolves the font once for a run.
pub(crate) fn resolve_font(
    fonts: &FontLibrary,
    style: &WatermarkStyle,
    sample: &str,
) -> WatermarkFont {
    fonts.resolve(style.font_file.as_deref(), &style.font_families, sample)
}

fn process_file(
    input: &Path,
    output_dir: &Path,
    options: &BatchOptions,
    font: &WatermarkFont,
) -> FileReport {
    let text = match &options.text {
        TextSource::Fixed(text) => text.clone(),
        TextSource::CaptureDate => match media::capture_date(input) {
            Ok(capture) => {
                tracing::info!(
                    file = %input.display(),
                    date = %capture.label(),
                    source = %capture.source,
                    "resolved capture date"
                );
                capture.label()
            }
            Err(err) => {
                tracing::error!(file = %input.display(), "{err}");
                return FileReport {
                    input: input.to_path_buf(),
                    text: None,
                    outcome: Outcome::Skipped(err.to_string()),
                };
            }
        },
    };

    let file_name = input.file_name().map_or_else(|| "image".into(), ToOwned::to_owned);
    let task = ImageTask {
        input_path: input.to_path_buf(),
        output_path: output_dir.join(file_name),
        style: options.style.with_text(text.clone()),
        placement: options.placement,
        format: None,
    };

    FileReport {
        input: input.to_path_buf(),
        text: Some(text),
        outcome: process_task(&task, font),
    }
}

/// Runs one task to completion, converting any error into an [`Outcome`].
#[must_use]
pub fn process_task(task: &ImageTask, font: &WatermarkFont) -> Outcome {
    let image = match media::load_image(&task.input_path) {
        Ok(image) => image,
        Err(err) => return failed(Stage::Decode, &task.input_path, &err),
    };

    let watermarked = watermark::apply(&image, &task.style, task.placement, font);

    match media::save_image(watermarked, &task.output_path, task.format) {
        Ok(()) => {
            tracing::info!(
                file = %task.input_path.display(),
                output = %task.output_path.display(),
                "watermarked"
            );
            Outcome::Success(task.output_path.clone())
        }
        Err(err) => failed(Stage::Save, &task.input_path, &err),
    }
}

fn failed(stage: Stage, input: &Path, err: &Error) -> Outcome {
    tracing::error!(file = %input.display(), %stage, "{err}");
    Outcome::Failed {
        stage,
        reason: err.to_string(),
    }
}
