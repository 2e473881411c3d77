// SPDX-License-Identifier: MPL-2.0
//! Watermark newtypes.
//!
//! This module provides type-safe wrappers for watermark settings,
//! ensuring they are always within valid ranges.

// =============================================================================
// Font Size Bounds
// =============================================================================

/// Font size bounds in pixels.
pub mod font_size_bounds {
    /// Minimum font size.
    pub const MIN: u32 = 1;
    /// Maximum font size.
    pub const MAX: u32 = 2000;
    /// Default font size.
    pub const DEFAULT: u32 = 24;
}

// =============================================================================
// FontSize
// =============================================================================

/// Font size in pixels, guaranteed to be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSize(u32);

impl FontSize {
    /// Creates a new font size, clamping the value to the valid range.
    #[must_use]
    pub fn new(px: u32) -> Self {
        Self(px.clamp(font_size_bounds::MIN, font_size_bounds::MAX))
    }

    /// Returns the raw pixel value.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Returns the size as a float for glyph scaling.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_px(self) -> f32 {
        self.0 as f32
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self(font_size_bounds::DEFAULT)
    }
}

// =============================================================================
// Opacity Bounds
// =============================================================================

/// Opacity bounds (0% to 100%).
pub mod opacity_bounds {
    /// Fully transparent.
    pub const MIN: u8 = 0;
    /// Fully opaque.
    pub const MAX: u8 = 100;
    /// Default opacity.
    pub const DEFAULT: u8 = 100;
}

// =============================================================================
// Opacity
// =============================================================================

/// Watermark opacity percentage, guaranteed to be within 0–100.
///
/// Out-of-range input is clamped rather than wrapped, so `-5` becomes `0`
/// and `250` becomes `100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opacity(u8);

impl Opacity {
    /// Creates a new opacity, clamping the value to the valid range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(percent: i32) -> Self {
        Self(percent.clamp(i32::from(opacity_bounds::MIN), i32::from(opacity_bounds::MAX)) as u8)
    }

    /// Returns the raw percentage value.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Converts the percentage to an 8-bit alpha value.
    ///
    /// Uses half-up rounding of `255 * p / 100`: 50% maps to 128.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_alpha(self) -> u8 {
        ((255 * u32::from(self.0) + 50) / 100) as u8
    }

    /// Returns whether the watermark would be invisible.
    #[must_use]
    pub fn is_transparent(self) -> bool {
        self.0 == opacity_bounds::MIN
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self(opacity_bounds::DEFAULT)
    }
}

// =============================================================================
// Rotation Bounds
// =============================================================================

/// Rotation bounds in degrees.
pub mod rotation_bounds {
    /// Minimum rotation (clockwise half turn).
    pub const MIN: i32 = -180;
    /// Maximum rotation (counter-clockwise half turn).
    pub const MAX: i32 = 180;
}

// =============================================================================
// RotationDegrees
// =============================================================================

/// Watermark rotation in whole degrees, positive is counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RotationDegrees(i32);

impl RotationDegrees {
    /// Creates a new rotation, clamping the value to [-180, 180].
    #[must_use]
    pub fn new(degrees: i32) -> Self {
        Self(degrees.clamp(rotation_bounds::MIN, rotation_bounds::MAX))
    }

    /// Returns the raw degree value.
    #[must_use]
    pub fn value(self) -> i32 {
        self.0
    }

    /// Returns whether the layer needs rotating at all.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns the angle in radians, positive counter-clockwise.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_radians(self) -> f32 {
        (self.0 as f32).to_radians()
    }
}
