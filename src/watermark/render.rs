// SPDX-License-Identifier: MPL-2.0
//! Text layer rendering.

use image_rs::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{rotate, Interpolation};

use super::font::{TextMetrics, WatermarkFont};
use crate::domain::watermark::WatermarkStyle;

/// Measures the style's text with the font that will draw it.
#[must_use]
pub fn measure(style: &WatermarkStyle, font: &WatermarkFont) -> TextMetrics {
    font.measure(&style.text, style.font_size)
}

/// Renders the style's text onto a transparent layer of `canvas` size.
///
/// The text's ink box starts at `position`. A non-zero rotation turns the
/// whole layer around the ink box center (positive is counter-clockwise),
/// keeping the canvas size.
#[must_use]
pub fn render_layer(
    canvas: (u32, u32),
    style: &WatermarkStyle,
    font: &WatermarkFont,
    position: (i32, i32),
) -> RgbaImage {
    let [r, g, b, alpha] = style.fill();
    // Transparent pixels carry the fill color so interpolation only moves alpha.
    let clear = Rgba([r, g, b, 0]);
    let mut layer = RgbaImage::from_pixel(canvas.0, canvas.1, clear);
    font.draw(&mut layer, &style.text, style.font_size, position, alpha);

    if style.rotation.is_zero() {
        return layer;
    }

    let metrics = font.measure(&style.text, style.font_size);
    let center = text_center(position, metrics);
    tracing::trace!(degrees = style.rotation.value(), ?center, "rotating text layer");
    // imageproc turns clockwise for positive angles.
    rotate(
        &layer,
        center,
        -style.rotation.to_radians(),
        Interpolation::Bilinear,
        clear,
    )
}

#[allow(clippy::cast_precision_loss)]
fn text_center(position: (i32, i32), metrics: TextMetrics) -> (f32, f32) {
    (
        position.0 as f32 + metrics.width as f32 / 2.0,
        position.1 as f32 + metrics.height as f32 / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::watermark::{FontSize, Opacity, Rgb, RotationDegrees};

    fn style(text: &str) -> WatermarkStyle {
        WatermarkStyle {
            font_size: FontSize::new(16),
            color: Rgb::RED,
            ..WatermarkStyle::new(text)
        }
    }

    fn ink_bounds(layer: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (x, y, p) in layer.enumerate_pixels() {
            if p.0[3] == 0 {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
        bounds
    }

    #[test]
    fn layer_has_canvas_size_and_fill_color() {
        let layer = render_layer((120, 40), &style("AB"), &WatermarkFont::Bitmap, (5, 5));
        assert_eq!(layer.dimensions(), (120, 40));
        let painted = layer.pixels().find(|p| p.0[3] > 0).expect("ink");
        assert_eq!(painted.0, [255, 0, 0, 255]);
    }

    #[test]
    fn opacity_limits_layer_alpha() {
        let half = WatermarkStyle {
            opacity: Opacity::new(50),
            ..style("AB")
        };
        let layer = render_layer((120, 40), &half, &WatermarkFont::Bitmap, (0, 0));
        assert_eq!(layer.pixels().map(|p| p.0[3]).max(), Some(128));
    }

    #[test]
    fn unrotated_ink_sits_inside_measured_box() {
        let s = style("HH");
        let metrics = measure(&s, &WatermarkFont::Bitmap);
        let layer = render_layer((100, 60), &s, &WatermarkFont::Bitmap, (30, 20));
        let (x0, y0, x1, y1) = ink_bounds(&layer).expect("ink");
        assert!(x0 >= 30 && y0 >= 20);
        assert!(x1 < 30 + metrics.width && y1 < 20 + metrics.height);
    }

    #[test]
    fn quarter_turn_swaps_ink_extent_around_center() {
        let flat = style("HHHH");
        let turned = WatermarkStyle {
            rotation: RotationDegrees::new(90),
            ..flat.clone()
        };
        let metrics = measure(&flat, &WatermarkFont::Bitmap);
        assert_eq!(metrics.size(), (64, 16));

        let layer = render_layer((200, 200), &turned, &WatermarkFont::Bitmap, (68, 92));
        let (x0, y0, x1, y1) = ink_bounds(&layer).expect("ink");
        // Box center is (100, 100); a quarter turn makes the text tall.
        assert!(y1 - y0 > x1 - x0);
        assert!((90..=110).contains(&((x0 + x1) / 2)));
        assert!((90..=110).contains(&((y0 + y1) / 2)));
    }

    fn ink_mean(layer: &RgbaImage) -> (f64, f64) {
        let (mut sx, mut sy, mut n) = (0.0, 0.0, 0.0);
        for (x, y, p) in layer.enumerate_pixels() {
            if p.0[3] > 0 {
                sx += f64::from(x);
                sy += f64::from(y);
                n += 1.0;
            }
        }
        assert!(n > 0.0, "layer has no ink");
        (sx / n, sy / n)
    }

    #[test]
    fn positive_rotation_is_counter_clockwise() {
        // Ink only in the left cell; the box center is (100, 100).
        let flat = style("A ");
        let metrics = measure(&flat, &WatermarkFont::Bitmap);
        assert_eq!(metrics.size(), (32, 16));
        let position = (84, 92);

        let (flat_x, _) = ink_mean(&render_layer((200, 200), &flat, &WatermarkFont::Bitmap, position));
        assert!(flat_x < 100.0);

        let ccw = WatermarkStyle {
            rotation: RotationDegrees::new(90),
            ..flat.clone()
        };
        let (_, ccw_y) = ink_mean(&render_layer((200, 200), &ccw, &WatermarkFont::Bitmap, position));
        assert!(ccw_y > 100.0, "left half should turn downwards, mean y {ccw_y}");

        let cw = WatermarkStyle {
            rotation: RotationDegrees::new(-90),
            ..flat
        };
        let (_, cw_y) = ink_mean(&render_layer((200, 200), &cw, &WatermarkFont::Bitmap, position));
        assert!(cw_y < 100.0, "left half should turn upwards, mean y {cw_y}");
    }

    #[test]
    fn empty_text_leaves_layer_transparent() {
        let layer = render_layer((10, 10), &style(""), &WatermarkFont::Bitmap, (0, 0));
        assert!(layer.pixels().all(|p| p.0[3] == 0));
    }
}
