// SPDX-License-Identifier: MPL-2.0
//! Font resolution with a guaranteed fallback.
//!
//! Candidates are tried in order: an explicit font file, each configured
//! family, the system sans-serif family, and finally the built-in 8×8 bitmap
//! font. Measuring and drawing always go through the same [`WatermarkFont`],
//! so the measured box is exactly the box that gets painted.

use std::fmt;
use std::path::{Path, PathBuf};

use ab_glyph::{point, Font, FontVec, OutlinedGlyph, PxScale, ScaleFont};
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image_rs::RgbaImage;

use crate::domain::watermark::FontSize;
use crate::error::{Error, Result};

/// Characters every date watermark is made of.
pub const DATE_SAMPLE_TEXT: &str = "0123456789-";

/// Edge length of one bitmap glyph cell before scaling.
const BITMAP_CELL: u32 = 8;

// =============================================================================
// Text Metrics
// =============================================================================

/// Ink bounding box of a piece of text.
///
/// `offset_x`/`offset_y` locate the box's top-left corner relative to the pen
/// origin (left edge of the first glyph, top of the line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextMetrics {
    pub width: u32,
    pub height: u32,
    pub offset_x: i32,
    pub offset_y: i32,
}

impl TextMetrics {
    /// Width and height as a tuple for the position resolver.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

// =============================================================================
// Font Library
// =============================================================================

/// Where a font candidate comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FontSource {
    File(PathBuf),
    Family(String),
    SansSerif,
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSource::File(path) => write!(f, "file {}", path.display()),
            FontSource::Family(name) => write!(f, "family {name:?}"),
            FontSource::SansSerif => f.write_str("system sans-serif"),
        }
    }
}

/// Index of installed font faces.
pub struct FontLibrary {
    db: fontdb::Database,
}

impl fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontLibrary")
            .field("faces", &self.db.len())
            .finish()
    }
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::system()
    }
}

impl FontLibrary {
    /// Indexes the fonts installed on this machine.
    #[must_use]
    pub fn system() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "indexed system fonts");
        Self { db }
    }

    /// A library with no installed faces.
    ///
    /// Only explicit font files can resolve; everything else ends up on the
    /// bitmap font, which makes output independent of the host machine.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            db: fontdb::Database::new(),
        }
    }

    /// Number of indexed faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Picks the first candidate that loads and has glyphs for every visible
    /// character of `sample_text`.
    ///
    /// If fonts load but none covers the sample, the first loaded one is
    /// used. If nothing loads, the bitmap font is returned. This never fails.
    pub fn resolve(
        &self,
        font_file: Option<&Path>,
        families: &[String],
        sample_text: &str,
    ) -> WatermarkFont {
        let sources = font_file
            .map(|path| FontSource::File(path.to_path_buf()))
            .into_iter()
            .chain(families.iter().cloned().map(FontSource::Family))
            .chain(std::iter::once(FontSource::SansSerif));

        let mut first_loaded: Option<WatermarkFont> = None;
        for source in sources {
            let font = match self.load(&source) {
                Ok(font) => font,
                Err(err) => {
                    tracing::debug!(%source, error = %err, "font candidate skipped");
                    continue;
                }
            };
            if font.covers(sample_text) {
                tracing::debug!(font = font.name(), "resolved watermark font");
                return font;
            }
            tracing::debug!(%source, "font lacks glyphs for watermark text");
            if first_loaded.is_none() {
                first_loaded = Some(font);
            }
        }

        if let Some(font) = first_loaded {
            tracing::warn!(
                font = font.name(),
                "no font covers every character, some glyphs may be missing"
            );
            return font;
        }

        tracing::warn!("no usable font found, falling back to built-in bitmap font");
        WatermarkFont::Bitmap
    }

    fn load(&self, source: &FontSource) -> Result<WatermarkFont> {
        match source {
            FontSource::File(path) => {
                let data = std::fs::read(path)
                    .map_err(|e| Error::FontUnavailable(format!("{}: {e}", path.display())))?;
                let font = FontVec::try_from_vec(data)
                    .map_err(|e| Error::FontUnavailable(format!("{}: {e}", path.display())))?;
                let name = path
                    .file_stem()
                    .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
                Ok(WatermarkFont::Outline {
                    name,
                    font: Box::new(font),
                })
            }
            FontSource::Family(name) => self.load_family(fontdb::Family::Name(name.as_str()), source),
            FontSource::SansSerif => self.load_family(fontdb::Family::SansSerif, source),
        }
    }

    fn load_family(&self, family: fontdb::Family<'_>, source: &FontSource) -> Result<WatermarkFont> {
        let query = fontdb::Query {
            families: &[family],
            ..fontdb::Query::default()
        };
        let id = self
            .db
            .query(&query)
            .ok_or_else(|| Error::FontUnavailable(format!("{source} is not installed")))?;

        let name = self
            .db
            .face(id)
            .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_else(|| source.to_string());

        let font = self
            .db
            .with_face_data(id, |data, index| FontVec::try_from_vec_and_index(data.to_vec(), index))
            .ok_or_else(|| Error::FontUnavailable(format!("{source} has no readable data")))?
            .map_err(|e| Error::FontUnavailable(format!("{source}: {e}")))?;

        Ok(WatermarkFont::Outline {
            name,
            font: Box::new(font),
        })
    }
}

// =============================================================================
// Watermark Font
// =============================================================================

/// A resolved font, either a scalable outline font or the bitmap fallback.
pub enum WatermarkFont {
    Outline { name: String, font: Box<FontVec> },
    Bitmap,
}

impl fmt::Debug for WatermarkFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WatermarkFont").field(&self.name()).finish()
    }
}

impl WatermarkFont {
    /// Human-readable font name for logs.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            WatermarkFont::Outline { name, .. } => name,
            WatermarkFont::Bitmap => "built-in bitmap",
        }
    }

    #[must_use]
    pub fn is_bitmap(&self) -> bool {
        matches!(self, WatermarkFont::Bitmap)
    }

    /// Returns whether every non-whitespace character has a real glyph.
    #[must_use]
    pub fn covers(&self, text: &str) -> bool {
        let mut visible = text.chars().filter(|c| !c.is_whitespace());
        match self {
            WatermarkFont::Outline { font, .. } => visible.all(|c| font.glyph_id(c).0 != 0),
            WatermarkFont::Bitmap => visible.all(|c| bitmap_glyph(c).is_some()),
        }
    }

    /// Measures the ink bounding box of `text` at `size`.
    #[must_use]
    pub fn measure(&self, text: &str, size: FontSize) -> TextMetrics {
        match self {
            WatermarkFont::Outline { font, .. } => outline_metrics(&layout(font, text, size)),
            WatermarkFont::Bitmap => {
                let cell = bitmap_cell(size);
                let count = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
                let width = count.saturating_mul(cell);
                TextMetrics {
                    width,
                    height: if width == 0 { 0 } else { cell },
                    offset_x: 0,
                    offset_y: 0,
                }
            }
        }
    }

    /// Paints `text` so that its ink box's top-left lands on `top_left`.
    ///
    /// Only the alpha channel of `layer` is written: each touched pixel takes
    /// `max(existing, coverage * alpha)`. Pixels outside the layer are clipped.
    pub fn draw(
        &self,
        layer: &mut RgbaImage,
        text: &str,
        size: FontSize,
        top_left: (i32, i32),
        alpha: u8,
    ) {
        match self {
            WatermarkFont::Outline { font, .. } => {
                let glyphs = layout(font, text, size);
                let metrics = outline_metrics(&glyphs);
                let shift_x = top_left.0 - metrics.offset_x;
                let shift_y = top_left.1 - metrics.offset_y;
                for glyph in &glyphs {
                    let bounds = glyph.px_bounds();
                    #[allow(clippy::cast_possible_truncation)]
                    let (min_x, min_y) = (bounds.min.x as i32, bounds.min.y as i32);
                    glyph.draw(|gx, gy, coverage| {
                        #[allow(clippy::cast_possible_wrap)]
                        let (x, y) = (shift_x + min_x + gx as i32, shift_y + min_y + gy as i32);
                        stamp(layer, x, y, coverage_alpha(coverage, alpha));
                    });
                }
            }
            WatermarkFont::Bitmap => draw_bitmap(layer, text, size, top_left, alpha),
        }
    }
}

fn layout(font: &FontVec, text: &str, size: FontSize) -> Vec<OutlinedGlyph> {
    let scale = PxScale::from(size.as_px());
    let scaled = font.as_scaled(scale);
    let ascent = scaled.ascent();

    let mut cursor = 0.0f32;
    let mut previous = None;
    let mut glyphs = Vec::new();
    for c in text.chars().filter(|c| !c.is_control()) {
        let id = scaled.glyph_id(c);
        if let Some(previous) = previous {
            cursor += scaled.kern(previous, id);
        }
        let glyph = id.with_scale_and_position(scale, point(cursor, ascent));
        cursor += scaled.h_advance(id);
        previous = Some(id);
        if let Some(outlined) = font.outline_glyph(glyph) {
            glyphs.push(outlined);
        }
    }
    glyphs
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn outline_metrics(glyphs: &[OutlinedGlyph]) -> TextMetrics {
    let mut iter = glyphs.iter().map(OutlinedGlyph::px_bounds);
    let Some(first) = iter.next() else {
        return TextMetrics::default();
    };
    let (mut min_x, mut min_y, mut max_x, mut max_y) =
        (first.min.x, first.min.y, first.max.x, first.max.y);
    for bounds in iter {
        min_x = min_x.min(bounds.min.x);
        min_y = min_y.min(bounds.min.y);
        max_x = max_x.max(bounds.max.x);
        max_y = max_y.max(bounds.max.y);
    }
    let (min_x, min_y) = (min_x.floor() as i32, min_y.floor() as i32);
    let (max_x, max_y) = (max_x.ceil() as i32, max_y.ceil() as i32);
    TextMetrics {
        width: (max_x - min_x).max(0) as u32,
        height: (max_y - min_y).max(0) as u32,
        offset_x: min_x,
        offset_y: min_y,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coverage_alpha(coverage: f32, alpha: u8) -> u8 {
    (coverage.clamp(0.0, 1.0) * f32::from(alpha)).round() as u8
}

#[allow(clippy::cast_sign_loss)]
fn stamp(layer: &mut RgbaImage, x: i32, y: i32, alpha: u8) {
    if alpha == 0 || x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x >= layer.width() || y >= layer.height() {
        return;
    }
    let pixel = layer.get_pixel_mut(x, y);
    pixel.0[3] = pixel.0[3].max(alpha);
}

// =============================================================================
// Bitmap Fallback
// =============================================================================

fn bitmap_glyph(c: char) -> Option<[u8; 8]> {
    BASIC_FONTS.get(c).or_else(|| LATIN_FONTS.get(c))
}

/// Scale factor that brings an 8px cell closest to the requested size.
fn bitmap_scale(size: FontSize) -> u32 {
    ((size.value() + BITMAP_CELL / 2) / BITMAP_CELL).max(1)
}

fn bitmap_cell(size: FontSize) -> u32 {
    BITMAP_CELL * bitmap_scale(size)
}

#[allow(clippy::cast_possible_wrap)]
fn draw_bitmap(layer: &mut RgbaImage, text: &str, size: FontSize, top_left: (i32, i32), alpha: u8) {
    let scale = bitmap_scale(size) as i32;
    let cell = bitmap_cell(size) as i32;

    for (index, c) in text.chars().enumerate() {
        let Some(rows) = bitmap_glyph(c).or_else(|| BASIC_FONTS.get('?')) else {
            continue;
        };
        let origin_x = top_left.0 + cell * index as i32;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..8 {
                if (bits >> col) & 1 == 0 {
                    continue;
                }
                let base_x = origin_x + col * scale;
                let base_y = top_left.1 + row as i32 * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        stamp(layer, base_x + dx, base_y + dy, alpha);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn painted(layer: &RgbaImage) -> Vec<(u32, u32)> {
        layer
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[3] > 0)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn empty_library_falls_back_to_bitmap() {
        let library = FontLibrary::empty();
        let font = library.resolve(None, &["Definitely Not Installed".into()], "abc");
        assert!(font.is_bitmap());
    }

    #[test]
    fn unreadable_font_file_falls_back_to_bitmap() {
        let dir = tempfile::tempdir().expect("tempdir");
        let bogus = dir.path().join("broken.ttf");
        std::fs::write(&bogus, b"not a font").expect("write");
        let font = FontLibrary::empty().resolve(Some(&bogus), &[], "abc");
        assert!(font.is_bitmap());
    }

    #[test]
    fn bitmap_metrics_are_whole_cells() {
        let metrics = WatermarkFont::Bitmap.measure("2024-05-01", FontSize::new(24));
        // 24px rounds to a 3x scale, so 24px cells.
        assert_eq!(metrics.size(), (240, 24));
        assert_eq!((metrics.offset_x, metrics.offset_y), (0, 0));
    }

    #[test]
    fn bitmap_scale_never_drops_below_one() {
        let metrics = WatermarkFont::Bitmap.measure("ab", FontSize::new(1));
        assert_eq!(metrics.size(), (16, 8));
    }

    #[test]
    fn empty_text_measures_zero() {
        assert_eq!(
            WatermarkFont::Bitmap.measure("", FontSize::default()),
            TextMetrics::default()
        );
    }

    #[test]
    fn bitmap_draw_stays_inside_measured_box() {
        let size = FontSize::new(16);
        let metrics = WatermarkFont::Bitmap.measure("Hi", size);
        let mut layer = RgbaImage::new(100, 50);
        WatermarkFont::Bitmap.draw(&mut layer, "Hi", size, (20, 10), 200);

        let pixels = painted(&layer);
        assert!(!pixels.is_empty());
        for (x, y) in pixels {
            assert!((20..20 + metrics.width).contains(&x), "x={x}");
            assert!((10..10 + metrics.height).contains(&y), "y={y}");
        }
    }

    #[test]
    fn draw_only_touches_alpha_and_keeps_maximum() {
        let mut layer = RgbaImage::from_pixel(40, 20, image_rs::Rgba([10, 20, 30, 0]));
        WatermarkFont::Bitmap.draw(&mut layer, "H", FontSize::new(8), (0, 0), 90);
        WatermarkFont::Bitmap.draw(&mut layer, "H", FontSize::new(8), (0, 0), 40);
        let alphas: Vec<u8> = layer.pixels().map(|p| p.0[3]).filter(|a| *a > 0).collect();
        assert!(alphas.iter().all(|a| *a == 90));
        assert!(layer.pixels().all(|p| p.0[..3] == [10, 20, 30]));
    }

    #[test]
    fn drawing_is_clipped_to_layer() {
        let mut layer = RgbaImage::new(10, 10);
        WatermarkFont::Bitmap.draw(&mut layer, "WWWW", FontSize::new(16), (-5, -5), 255);
        assert!(!painted(&layer).is_empty());
    }

    #[test]
    fn bitmap_covers_ascii_but_not_cjk() {
        assert!(WatermarkFont::Bitmap.covers("2024-05-01 Photo"));
        assert!(!WatermarkFont::Bitmap.covers("水印"));
    }

    #[test]
    fn system_fonts_measure_and_draw_consistently() {
        let library = FontLibrary::system();
        let font = library.resolve(None, &[], DATE_SAMPLE_TEXT);
        let size = FontSize::new(32);
        let metrics = font.measure("2024-05-01", size);
        assert!(metrics.width > 0 && metrics.height > 0);

        let mut layer = RgbaImage::new(metrics.width + 40, metrics.height + 40);
        font.draw(&mut layer, "2024-05-01", size, (20, 20), 255);
        for (x, y) in painted(&layer) {
            assert!((20..20 + metrics.width).contains(&x), "x={x} font={}", font.name());
            assert!((20..20 + metrics.height).contains(&y), "y={y} font={}", font.name());
        }
    }
}
