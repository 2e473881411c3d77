// SPDX-License-Identifier: MPL-2.0
//! Image file handling: decoding, encoding, capture dates and export naming.

pub mod export;
pub mod image;
pub mod metadata;

pub use export::{NamingRule, OutputFormat};
pub use extensions::IMAGE_EXTENSIONS;
pub use image::{load_image, save_image};
pub use metadata::{capture_date, CaptureDate, DateSource};

use std::path::Path;

/// Supported file extensions.
pub mod extensions {
    /// Image file extensions accepted for watermarking (lowercase).
    pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif"];
}

/// Returns whether `path` has a supported image extension (case-insensitive).
#[must_use]
pub fn is_supported_image<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_extensions_are_case_insensitive() {
        assert!(is_supported_image("a.JPG"));
        assert!(is_supported_image("b.Tif"));
        assert!(is_supported_image("/x/y/c.bmp"));
    }

    #[test]
    fn unsupported_extensions_are_rejected() {
        assert!(!is_supported_image("notes.txt"));
        assert!(!is_supported_image("clip.gif"));
        assert!(!is_supported_image("README"));
    }
}
