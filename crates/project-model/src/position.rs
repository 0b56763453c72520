//! Position descriptors and resolved canvas coordinates.
//!
//! Positions arrive in documents as a number, a numeric string, or a
//! name (`left`, `center`, `bottom`, ...). They are parsed once at load
//! time into [`AxisPosition`] so nothing downstream sniffs types again.

use serde::{Deserialize, Serialize};

/// Width/height pair in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A square of the given edge length.
    pub fn square(edge: f64) -> Self {
        Self::new(edge, edge)
    }
}

/// Named anchor along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedPosition {
    Left,
    Top,
    Center,
    Right,
    Bottom,
}

/// One axis of a position descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawAxis", into = "RawAxis")]
pub enum AxisPosition {
    /// Absolute canvas coordinate, used verbatim.
    Absolute(f64),
    /// Anchor resolved against container and content extents.
    Named(NamedPosition),
}

impl Default for AxisPosition {
    fn default() -> Self {
        Self::Named(NamedPosition::Center)
    }
}

impl AxisPosition {
    pub const CENTER: AxisPosition = AxisPosition::Named(NamedPosition::Center);

    /// Parse a textual axis value. Unknown names fall back to `center`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(value) = trimmed.parse::<f64>() {
            if value.is_finite() {
                return Self::Absolute(value);
            }
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "left" => Self::Named(NamedPosition::Left),
            "top" => Self::Named(NamedPosition::Top),
            "right" => Self::Named(NamedPosition::Right),
            "bottom" => Self::Named(NamedPosition::Bottom),
            _ => Self::CENTER,
        }
    }
}

/// Wire shape of an axis value before parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawAxis {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl From<RawAxis> for AxisPosition {
    fn from(raw: RawAxis) -> Self {
        match raw {
            RawAxis::Number(value) => AxisPosition::Absolute(value),
            RawAxis::Text(text) => AxisPosition::parse(&text),
            RawAxis::Other(_) => AxisPosition::CENTER,
        }
    }
}

impl From<AxisPosition> for RawAxis {
    fn from(axis: AxisPosition) -> Self {
        match axis {
            AxisPosition::Absolute(value) => RawAxis::Number(value),
            AxisPosition::Named(name) => RawAxis::Text(
                match name {
                    NamedPosition::Left => "left",
                    NamedPosition::Top => "top",
                    NamedPosition::Center => "center",
                    NamedPosition::Right => "right",
                    NamedPosition::Bottom => "bottom",
                }
                .to_string(),
            ),
        }
    }
}

/// Symbolic placement of a layer within its container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionDescriptor {
    pub x: AxisPosition,
    pub y: AxisPosition,
    /// Distance kept from the anchored edge for edge anchors.
    pub padding: f64,
}

impl PositionDescriptor {
    pub fn new(x: AxisPosition, y: AxisPosition, padding: f64) -> Self {
        Self { x, y, padding }
    }

    /// Centered on both axes, no padding.
    pub fn centered() -> Self {
        Self::default()
    }
}

/// A resolved coordinate on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub enum Coordinate {
    /// Absolute pixel offset of the layer's leading edge.
    At(f64),
    /// Centered along this axis; the renderer computes the offset.
    Centered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawCoordinate {
    Number(f64),
    Text(String),
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = String;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        match raw {
            RawCoordinate::Number(value) => Ok(Coordinate::At(value)),
            RawCoordinate::Text(text) if text == "center" => Ok(Coordinate::Centered),
            RawCoordinate::Text(text) => Err(format!(
                "expected a number or \"center\", got {text:?}"
            )),
        }
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(coordinate: Coordinate) -> Self {
        match coordinate {
            Coordinate::At(value) => RawCoordinate::Number(value),
            Coordinate::Centered => RawCoordinate::Text("center".to_string()),
        }
    }
}

impl Coordinate {
    /// The absolute value, if this coordinate is not the center sentinel.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::At(value) => Some(*value),
            Self::Centered => None,
        }
    }

    /// Absolute offset once the renderer knows both extents.
    pub fn to_absolute(&self, content_extent: f64, container_extent: f64) -> f64 {
        match self {
            Self::At(value) => *value,
            Self::Centered => (container_extent - content_extent) / 2.0,
        }
    }
}

/// Resolved position of a layer (top-left corner).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerPosition {
    pub x: Coordinate,
    pub y: Coordinate,
}

impl LayerPosition {
    pub const CENTERED: LayerPosition = LayerPosition {
        x: Coordinate::Centered,
        y: Coordinate::Centered,
    };

    pub const ORIGIN: LayerPosition = LayerPosition {
        x: Coordinate::At(0.0),
        y: Coordinate::At(0.0),
    };
}
