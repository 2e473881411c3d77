// SPDX-License-Identifier: MPL-2.0
//! Straight-alpha compositing of a text layer over a photo.

use image_rs::{DynamicImage, RgbImage, RgbaImage};

/// Non-premultiplied RGBA8 pixel.
pub type StraightRgba8 = [u8; 4];

/// Porter-Duff "over" for straight (non-premultiplied) alpha.
///
/// With an opaque destination this is `src * a + dst * (1 - a)` per channel.
/// An opaque source replaces the destination exactly.
#[must_use]
pub fn over(dst: StraightRgba8, src: StraightRgba8) -> StraightRgba8 {
    let sa = u32::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    // Destination weight after the source covers `sa` of it.
    let dw = div255(u32::from(dst[3]) * (255 - sa));
    let out_a = sa + dw;

    let mut out = [0u8; 4];
    for i in 0..3 {
        let sum = u32::from(src[i]) * sa + u32::from(dst[i]) * dw;
        out[i] = to_u8((sum + out_a / 2) / out_a);
    }
    out[3] = to_u8(out_a);
    out
}

/// Composites `layer` over `base`, returning an RGBA8 image of the base's size.
///
/// The layer must have the same dimensions as the base; pixels outside the
/// overlap are left untouched.
#[must_use]
pub fn composite(base: &DynamicImage, layer: &RgbaImage) -> RgbaImage {
    let mut out = base.to_rgba8();
    composite_in_place(&mut out, layer);
    out
}

/// In-place variant of [`composite`].
pub fn composite_in_place(base: &mut RgbaImage, layer: &RgbaImage) {
    if base.dimensions() != layer.dimensions() {
        tracing::warn!(
            base = ?base.dimensions(),
            layer = ?layer.dimensions(),
            "layer size differs from base, compositing the overlap only"
        );
    }
    let width = base.width().min(layer.width());
    let height = base.height().min(layer.height());
    for y in 0..height {
        for x in 0..width {
            let src = layer.get_pixel(x, y).0;
            if src[3] == 0 {
                continue;
            }
            let dst = base.get_pixel_mut(x, y);
            dst.0 = over(dst.0, src);
        }
    }
}

/// Drops the alpha channel for formats without one.
#[must_use]
pub fn flatten(image: RgbaImage) -> RgbImage {
    DynamicImage::ImageRgba8(image).into_rgb8()
}

fn div255(x: u32) -> u32 {
    (x + 127) / 255
}

#[allow(clippy::cast_possible_truncation)]
fn to_u8(x: u32) -> u8 {
    x.min(255) as u8
}
