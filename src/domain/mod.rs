// SPDX-License-Identifier: MPL-2.0
//! Domain layer - core watermark rules with no I/O.
//!
//! This module contains pure value objects and the placement and color
//! resolvers. Nothing here touches the filesystem, fonts or pixel buffers,
//! which keeps the rules testable on their own.
//!
//! # Modules
//!
//! - [`watermark`]: [`Anchor`](watermark::Anchor),
//!   [`PlacementSpec`](watermark::PlacementSpec),
//!   [`WatermarkStyle`](watermark::WatermarkStyle) and the range-checked
//!   [`FontSize`](watermark::FontSize), [`Opacity`](watermark::Opacity),
//!   [`RotationDegrees`](watermark::RotationDegrees)

pub mod watermark;
