// SPDX-License-Identifier: MPL-2.0
//! Application layer of the batch tool.
//!
//! Settings come from `settings.toml`, are overridden by an optional saved
//! template and finally by explicit command-line flags.

pub mod cli;
pub mod paths;
pub mod templates;

pub use cli::{Args, Command};

use crate::batch::{self, BatchOptions, BatchResult, FileReport, Outcome, TextSource};
use crate::config::{self, Config};
use crate::domain::watermark::{parse_color, FontSize, Opacity, PlacementSpec, RotationDegrees};
use crate::error::{Error, Result};
use crate::watermark::FontLibrary;
use std::io::Write;
use templates::{TemplateSettings, TemplateStore};

/// Runs a batch from parsed arguments, writing progress lines to `out`.
///
/// # Errors
///
/// Returns [`Error::InvalidInputDirectory`] for a missing or non-directory
/// input, [`Error::Usage`] for an invalid flag value and [`Error::Template`]
/// when the requested template does not exist.
pub fn run(args: &Args, out: &mut impl Write) -> Result<BatchResult> {
    paths::init_cli_override(args.config_dir.clone());

    let config = config::load()?;
    let template = match &args.template {
        Some(name) => Some(load_template(name)?),
        None => None,
    };
    let options = build_options(args, &config, template.as_ref())?;

    let fonts = FontLibrary::system();
    tracing::debug!(faces = fonts.face_count(), "loaded system fonts");

    let result = batch::run_batch(&args.input_directory, &options, &fonts, |report| {
        // Progress output is best effort.
        let _ = writeln!(out, "{}", progress_line(report));
    })?;

    match &result.output_dir {
        Some(dir) => writeln!(
            out,
            "Processed {}/{} images. Output: {}",
            result.processed_count(),
            result.total_count(),
            dir.display()
        )?,
        None => writeln!(
            out,
            "No supported images found in {}",
            args.input_directory.display()
        )?,
    }
    Ok(result)
}

fn load_template(name: &str) -> Result<TemplateSettings> {
    let mut store = TemplateStore::open_default()?;
    store
        .load_template(name)?
        .ok_or_else(|| Error::Template(format!("no template named {name:?}")))
}

/// Layers config, template and flags into batch options.
///
/// # Errors
///
/// Returns [`Error::InvalidColorFormat`] for a malformed configured or
/// template color, [`Error::Usage`] for a malformed `--font-color`.
pub fn build_options(
    args: &Args,
    config: &Config,
    template: Option<&TemplateSettings>,
) -> Result<BatchOptions> {
    let mut style = config.watermark.to_style()?;
    let mut placement = config.watermark.placement();
    let mut text = TextSource::CaptureDate;

    if let Some(settings) = template {
        let (templated, templated_placement) = settings.apply_to(&style)?;
        if !templated.text.is_empty() {
            text = TextSource::Fixed(templated.text.clone());
        }
        style = templated;
        placement = templated_placement;
    }

    if let Some(size) = args.font_size {
        style.font_size = FontSize::new(size);
    }
    if let Some(color) = &args.font_color {
        style.color = parse_color(color).map_err(|err| Error::Usage(err.to_string()))?;
    }
    if let Some(anchor) = args.position {
        placement = PlacementSpec::Anchor(anchor);
    }
    if let Some(opacity) = args.opacity {
        style.opacity = Opacity::new(opacity);
    }
    if let Some(rotation) = args.rotation {
        style.rotation = RotationDegrees::new(rotation);
    }
    if let Some(family) = &args.font {
        style.font_file = None;
        style.font_families.retain(|f| f != family);
        style.font_families.insert(0, family.clone());
    }
    if let Some(fixed) = &args.text {
        text = TextSource::Fixed(fixed.clone());
    }

    Ok(BatchOptions {
        style,
        placement,
        text,
    })
}

fn progress_line(report: &FileReport) -> String {
    let name = report.file_name();
    match &report.outcome {
        Outcome::Success(_) => {
            format!("[ok]   {name}: {}", report.text.as_deref().unwrap_or_default())
        }
        Outcome::Skipped(reason) => format!("[skip] {name}: {reason}"),
        Outcome::Failed { stage, reason } => format!("[fail] {name} ({stage}): {reason}"),
    }
}
