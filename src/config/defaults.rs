// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for configuration.
//!
//! This module serves as the single source of truth for default values
//! used by the settings file, the CLI and the template store.

use crate::domain::watermark::newtypes::{font_size_bounds, opacity_bounds};

// ==========================================================================
// Watermark Defaults
// ==========================================================================

/// Default font size in pixels.
pub const DEFAULT_FONT_SIZE: u32 = font_size_bounds::DEFAULT;

/// Default font color (name or `#RRGGBB`).
pub const DEFAULT_FONT_COLOR: &str = "black";

/// Default opacity percentage.
pub const DEFAULT_OPACITY_PERCENT: i32 = opacity_bounds::DEFAULT as i32;

/// Default rotation in degrees.
pub const DEFAULT_ROTATION_DEGREES: i32 = 0;

/// Default anchor name.
pub const DEFAULT_POSITION: &str = "bottomRight";

// ==========================================================================
// Export Defaults
// ==========================================================================

/// Default file name prefix for the prefix naming rule.
pub const DEFAULT_EXPORT_PREFIX: &str = crate::media::export::DEFAULT_PREFIX;

/// Default file name suffix for the suffix naming rule.
pub const DEFAULT_EXPORT_SUFFIX: &str = crate::media::export::DEFAULT_SUFFIX;
