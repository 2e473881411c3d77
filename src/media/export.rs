// SPDX-License-Identifier: MPL-2.0
//! Output formats and file naming rules for watermark export.

use image_rs::ImageFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default suffix appended by [`NamingRule::Suffix`].
pub const DEFAULT_SUFFIX: &str = "_watermarked";

/// Default prefix used by [`NamingRule::Prefix`].
pub const DEFAULT_PREFIX: &str = "wm_";

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JPEG format (lossy, smaller file size).
    #[default]
    Jpeg,
    /// PNG format (lossless).
    Png,
}

impl OutputFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }

    /// Returns the image format for the `image` crate.
    #[must_use]
    pub fn image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
        }
    }
}

/// How exported files are named, relative to the source file stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingRule {
    KeepOriginal,
    Prefix(String),
    Suffix(String),
}

impl Default for NamingRule {
    fn default() -> Self {
        NamingRule::Suffix(DEFAULT_SUFFIX.to_string())
    }
}

impl NamingRule {
    /// Builds the output file name for `source` in `format`.
    ///
    /// `photo.jpeg` with the default rule and PNG output becomes
    /// `photo_watermarked.png`.
    #[must_use]
    pub fn file_name(&self, source: &Path, format: OutputFormat) -> String {
        let stem = source
            .file_stem()
            .map_or_else(|| "image".into(), |s| s.to_string_lossy());
        let base = match self {
            NamingRule::KeepOriginal => stem.into_owned(),
            NamingRule::Prefix(prefix) => format!("{prefix}{stem}"),
            NamingRule::Suffix(suffix) => format!("{stem}{suffix}"),
        };
        format!("{base}.{}", format.extension())
    }
}
