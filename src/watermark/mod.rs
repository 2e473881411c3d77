// SPDX-License-Identifier: MPL-2.0
//! Watermark engine: font resolution, text layer rendering and compositing.
//!
//! [`apply`] is the single entry point used by the batch driver, the export
//! driver and editor previews, so every path produces identical pixels.

pub mod composite;
pub mod font;
pub mod render;

pub use composite::{composite, flatten};
pub use font::{FontLibrary, TextMetrics, WatermarkFont, DATE_SAMPLE_TEXT};

use image_rs::{DynamicImage, RgbaImage};

use crate::domain::watermark::{placement, PlacementSpec, WatermarkStyle, DEFAULT_MARGIN};

/// Resolved placement of the text ink box on a given image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Measures the text and resolves where its box goes on an image of `image_size`.
#[must_use]
pub fn locate(
    image_size: (u32, u32),
    style: &WatermarkStyle,
    placement: PlacementSpec,
    font: &WatermarkFont,
) -> TextBox {
    let metrics = render::measure(style, font);
    let (x, y) = placement::resolve(image_size, metrics.size(), placement, DEFAULT_MARGIN);
    TextBox {
        x,
        y,
        width: metrics.width,
        height: metrics.height,
    }
}

/// Draws the watermark described by `style` and `placement` onto `image`.
///
/// Returns an RGBA8 image of the same size; callers flatten it when the
/// output format has no alpha.
#[must_use]
pub fn apply(
    image: &DynamicImage,
    style: &WatermarkStyle,
    placement: PlacementSpec,
    font: &WatermarkFont,
) -> RgbaImage {
    if style.is_invisible() {
        tracing::debug!("watermark is invisible, copying image unchanged");
        return image.to_rgba8();
    }

    let size = (image.width(), image.height());
    let text_box = locate(size, style, placement, font);
    tracing::trace!(?text_box, font = font.name(), "placing watermark");
    let layer = render::render_layer(size, style, font, (text_box.x, text_box.y));
    composite(image, &layer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::watermark::{Anchor, FontSize, Opacity, Rgb};
    use image_rs::RgbImage;

    fn gray(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image_rs::Rgb([128, 128, 128])))
    }

    #[test]
    fn locate_uses_measured_text_size() {
        let style = WatermarkStyle {
            font_size: FontSize::new(16),
            ..WatermarkStyle::new("ABCDE")
        };
        let text_box = locate((800, 600), &style, Anchor::BottomRight.into(), &WatermarkFont::Bitmap);
        assert_eq!(
            text_box,
            TextBox {
                x: 800 - 80 - 10,
                y: 600 - 16 - 10,
                width: 80,
                height: 16
            }
        );
    }

    #[test]
    fn apply_paints_only_inside_the_text_box() {
        let style = WatermarkStyle {
            font_size: FontSize::new(16),
            color: Rgb::WHITE,
            ..WatermarkStyle::new("2024-05-01")
        };
        let image = gray(400, 300);
        let font = WatermarkFont::Bitmap;
        let text_box = locate((400, 300), &style, Anchor::TopLeft.into(), &font);
        let out = apply(&image, &style, Anchor::TopLeft.into(), &font);

        assert_eq!(out.dimensions(), (400, 300));
        let mut changed = 0;
        for (x, y, p) in out.enumerate_pixels() {
            if p.0 != [128, 128, 128, 255] {
                changed += 1;
                assert!(x >= text_box.x as u32 && x < text_box.x as u32 + text_box.width);
                assert!(y >= text_box.y as u32 && y < text_box.y as u32 + text_box.height);
                assert_eq!(p.0, [255, 255, 255, 255]);
            }
        }
        assert!(changed > 0);
    }

    #[test]
    fn transparent_watermark_leaves_image_unchanged() {
        let style = WatermarkStyle {
            opacity: Opacity::new(0),
            ..WatermarkStyle::new("hidden")
        };
        let image = gray(50, 50);
        let out = apply(&image, &style, PlacementSpec::default(), &WatermarkFont::Bitmap);
        assert_eq!(out, image.to_rgba8());
    }
}
