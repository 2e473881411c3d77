// SPDX-License-Identifier: MPL-2.0
//! Color and alpha resolution for watermark text.

use super::newtypes::Opacity;
use crate::error::{Error, Result};

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Rgb = Rgb([0, 0, 0]);
    pub const WHITE: Rgb = Rgb([255, 255, 255]);
    pub const RED: Rgb = Rgb([255, 0, 0]);
    pub const GREEN: Rgb = Rgb([0, 255, 0]);
    pub const BLUE: Rgb = Rgb([0, 0, 255]);

    /// Attaches an alpha channel derived from `opacity`.
    #[must_use]
    pub fn with_opacity(self, opacity: Opacity) -> [u8; 4] {
        let [r, g, b] = self.0;
        [r, g, b, opacity.to_alpha()]
    }

    /// Formats the color as `#RRGGBB`.
    #[must_use]
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0;
        format!("#{r:02X}{g:02X}{b:02X}")
    }
}

/// Parses a color name or `#RRGGBB` hex string.
///
/// Names are matched case-insensitively; unknown names fall back to black.
///
/// # Errors
///
/// Returns [`Error::InvalidColorFormat`] when the spec starts with `#` but is
/// not exactly six hex digits.
pub fn parse_color(spec: &str) -> Result<Rgb> {
    let spec = spec.trim();
    if let Some(hex) = spec.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| Error::InvalidColorFormat(spec.to_string()));
    }

    let rgb = match spec.to_ascii_lowercase().as_str() {
        "black" => Rgb::BLACK,
        "white" => Rgb::WHITE,
        "red" => Rgb::RED,
        "green" => Rgb::GREEN,
        "blue" => Rgb::BLUE,
        _ => Rgb::BLACK,
    };
    Ok(rgb)
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Rgb([byte(0)?, byte(2)?, byte(4)?]))
}

/// Resolves a color spec and an opacity percentage to straight RGBA.
///
/// # Errors
///
/// Propagates [`Error::InvalidColorFormat`] from [`parse_color`].
pub fn resolve(spec: &str, opacity_percent: i32) -> Result<[u8; 4]> {
    Ok(parse_color(spec)?.with_opacity(Opacity::new(opacity_percent)))
}
