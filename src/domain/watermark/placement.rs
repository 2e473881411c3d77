// SPDX-License-Identifier: MPL-2.0
//! Watermark placement: named anchors, manual offsets, and the position resolver.
//!
//! Every call site that needs a watermark coordinate goes through [`resolve`],
//! dispatching on [`PlacementSpec`] instead of comparing position strings.

use std::fmt;
use std::str::FromStr;

/// Distance in pixels between an anchored watermark and the image edge.
pub const DEFAULT_MARGIN: i32 = 10;

/// One of the nine named canvas positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Anchor {
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    #[default]
    BottomRight,
}

/// Placement along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Start,
    Middle,
    End,
}

impl Edge {
    fn offset(self, dim: i64, text_dim: i64, margin: i64) -> i64 {
        match self {
            Edge::Start => margin,
            Edge::Middle => (dim - text_dim).div_euclid(2),
            Edge::End => dim - text_dim - margin,
        }
    }
}

impl Anchor {
    /// All anchors in grid order (row by row, top-left first).
    pub const ALL: [Anchor; 9] = [
        Anchor::TopLeft,
        Anchor::Top,
        Anchor::TopRight,
        Anchor::Left,
        Anchor::Center,
        Anchor::Right,
        Anchor::BottomLeft,
        Anchor::Bottom,
        Anchor::BottomRight,
    ];

    /// Returns the camelCase name used by the CLI and templates.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Anchor::TopLeft => "topLeft",
            Anchor::Top => "top",
            Anchor::TopRight => "topRight",
            Anchor::Left => "left",
            Anchor::Center => "center",
            Anchor::Right => "right",
            Anchor::BottomLeft => "bottomLeft",
            Anchor::Bottom => "bottom",
            Anchor::BottomRight => "bottomRight",
        }
    }

    /// Parses an anchor name, falling back to [`Anchor::BottomRight`] for
    /// anything unrecognized.
    #[must_use]
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    fn edges(self) -> (Edge, Edge) {
        match self {
            Anchor::TopLeft => (Edge::Start, Edge::Start),
            Anchor::Top => (Edge::Middle, Edge::Start),
            Anchor::TopRight => (Edge::End, Edge::Start),
            Anchor::Left => (Edge::Start, Edge::Middle),
            Anchor::Center => (Edge::Middle, Edge::Middle),
            Anchor::Right => (Edge::End, Edge::Middle),
            Anchor::BottomLeft => (Edge::Start, Edge::End),
            Anchor::Bottom => (Edge::Middle, Edge::End),
            Anchor::BottomRight => (Edge::End, Edge::End),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string is not one of the nine anchor names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAnchor(pub String);

impl fmt::Display for UnknownAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown position {:?}", self.0)
    }
}

impl std::error::Error for UnknownAnchor {}

impl FromStr for Anchor {
    type Err = UnknownAnchor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Anchor::ALL
            .into_iter()
            .find(|anchor| anchor.name() == s)
            .ok_or_else(|| UnknownAnchor(s.to_string()))
    }
}

/// Where the watermark goes: a named anchor or a dragged manual offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementSpec {
    Anchor(Anchor),
    /// Raw top-left offset in image pixels, clamped into the image at
    /// resolution time.
    Manual { x: i32, y: i32 },
}

impl Default for PlacementSpec {
    fn default() -> Self {
        PlacementSpec::Anchor(Anchor::default())
    }
}

impl From<Anchor> for PlacementSpec {
    fn from(anchor: Anchor) -> Self {
        PlacementSpec::Anchor(anchor)
    }
}

/// Computes the top-left pixel of the text box.
///
/// Anchored positions may be negative when the text is larger than the
/// image; manual offsets are always clamped into `[0, max(0, dim - text_dim)]`.
#[must_use]
pub fn resolve(
    image_size: (u32, u32),
    text_size: (u32, u32),
    placement: PlacementSpec,
    margin: i32,
) -> (i32, i32) {
    let (width, height) = (i64::from(image_size.0), i64::from(image_size.1));
    let (text_width, text_height) = (i64::from(text_size.0), i64::from(text_size.1));

    let (x, y) = match placement {
        PlacementSpec::Anchor(anchor) => {
            let (horizontal, vertical) = anchor.edges();
            let margin = i64::from(margin);
            (
                horizontal.offset(width, text_width, margin),
                vertical.offset(height, text_height, margin),
            )
        }
        PlacementSpec::Manual { x, y } => (
            i64::from(x).clamp(0, (width - text_width).max(0)),
            i64::from(y).clamp(0, (height - text_height).max(0)),
        ),
    };

    (saturate(x), saturate(y))
}

#[allow(clippy::cast_possible_truncation)]
fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
