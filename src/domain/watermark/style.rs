// SPDX-License-Identifier: MPL-2.0
//! The per-render watermark style value.

use std::path::PathBuf;

use super::color::Rgb;
use super::newtypes::{FontSize, Opacity, RotationDegrees};

/// Font families tried in order before the system sans-serif family.
///
/// Covers common Latin faces first, then CJK faces.
pub const DEFAULT_FONT_FAMILIES: [&str; 8] = [
    "Arial",
    "DejaVu Sans",
    "Liberation Sans",
    "Microsoft YaHei",
    "SimHei",
    "PingFang SC",
    "Noto Sans CJK SC",
    "WenQuanYi Micro Hei",
];

/// Everything needed to draw one watermark, independent of where it goes.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkStyle {
    pub text: String,
    /// Explicit font file tried before any family lookup.
    pub font_file: Option<PathBuf>,
    pub font_families: Vec<String>,
    pub font_size: FontSize,
    pub color: Rgb,
    pub opacity: Opacity,
    pub rotation: RotationDegrees,
}

impl WatermarkStyle {
    /// Creates a style with default appearance for the given text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns a copy of this style carrying different text.
    #[must_use]
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }

    /// Straight RGBA fill for glyph pixels.
    #[must_use]
    pub fn fill(&self) -> [u8; 4] {
        self.color.with_opacity(self.opacity)
    }

    /// Returns whether rendering this style would leave the image unchanged.
    #[must_use]
    pub fn is_invisible(&self) -> bool {
        self.text.trim().is_empty() || self.opacity.is_transparent()
    }
}

impl Default for WatermarkStyle {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_file: None,
            font_families: DEFAULT_FONT_FAMILIES.iter().map(|f| (*f).to_string()).collect(),
            font_size: FontSize::default(),
            color: Rgb::BLACK,
            opacity: Opacity::default(),
            rotation: RotationDegrees::default(),
        }
    }
}
