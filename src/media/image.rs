// SPDX-License-Identifier: MPL-2.0
//! Image decoding and encoding.

use crate::error::{Error, Result};
use crate::media::export::OutputFormat;
use crate::watermark::flatten;
use image_rs::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use std::path::Path;

/// Decodes the image at `path`, sniffing the format from its content.
///
/// # Errors
///
/// Returns [`Error::UnreadableImage`] if the file cannot be opened or decoded.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();
    let unreadable = |reason: String| Error::UnreadableImage {
        path: path.to_path_buf(),
        reason,
    };

    ImageReader::open(path)
        .map_err(|e| unreadable(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| unreadable(e.to_string()))?
        .decode()
        .map_err(|e| unreadable(e.to_string()))
}

/// Writes a watermarked image, flattening it to RGB first.
///
/// With `format` unset, the encoder is chosen from the file extension.
///
/// # Errors
///
/// Returns [`Error::WriteFailure`] if the format is unknown or encoding fails.
pub fn save_image<P: AsRef<Path>>(
    image: RgbaImage,
    path: P,
    format: Option<OutputFormat>,
) -> Result<()> {
    let path = path.as_ref();
    let write_failure = |reason: String| Error::WriteFailure {
        path: path.to_path_buf(),
        reason,
    };

    let image_format = match format {
        Some(format) => format.image_format(),
        None => ImageFormat::from_path(path).map_err(|e| write_failure(e.to_string()))?,
    };

    flatten(image)
        .save_with_format(path, image_format)
        .map_err(|e| write_failure(e.to_string()))
}
