// SPDX-License-Identifier: MPL-2.0
//! Watermark value objects and the two pure resolvers.
//!
//! - [`placement`]: anchors, manual offsets and the position resolver
//! - [`color`]: color parsing and the color/alpha resolver
//! - [`newtypes`]: range-checked font size, opacity and rotation
//! - [`style`]: the per-render [`WatermarkStyle`]

pub mod color;
pub mod newtypes;
pub mod placement;
pub mod style;

pub use color::{parse_color, Rgb};
pub use newtypes::{FontSize, Opacity, RotationDegrees};
pub use placement::{Anchor, PlacementSpec, DEFAULT_MARGIN};
pub use style::{WatermarkStyle, DEFAULT_FONT_FAMILIES};
