//! Planar geometry for the board.
//!
//! This module provides the foundational coordinate types for the hex board:
//! - `Point`: A continuous position (hex centers, port anchors)
//! - `VertexCoord`: Identifies a corner where settlements are placed
//! - `EdgeCoord`: Identifies a side where roads are placed
//!
//! Hexes are pointy-top and laid out in offset rows: neighbors in the same
//! row are 2 units apart, rows are 1.73 units apart. Corner positions are
//! quantized to 1/10 000 of a unit, so two corners compare equal exactly
//! when they were derived from the same slot; closeness between corners of
//! *different* hexes is always an explicit distance check.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Quantization factor for corner coordinates
const QUANTUM: f64 = 10_000.0;

/// Two settlements closer than this violate the distance rule. Corners one
/// edge apart are ~1.15 units away, the next ring starts at ~2.
pub const MIN_SETTLEMENT_DISTANCE: f64 = 1.2;

/// How close a road endpoint must be to a settlement to count as connected
pub const ROAD_ENDPOINT_TOLERANCE: f64 = 0.1;

/// Corner offsets from a hex center, clockwise from the top corner.
pub const VERTEX_OFFSETS: [(f64, f64); 6] = [
    (0.0, -1.173),
    (0.99, -0.5865),
    (0.99, 0.5865),
    (0.0, 1.173),
    (-0.99, 0.5865),
    (-0.99, -0.5865),
];

/// Error returned when a textual coordinate cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid coordinate: {0:?}")]
pub struct ParseCoordError(pub String);

/// A continuous position on the board plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

fn quantize(value: f64) -> i32 {
    (value * QUANTUM).round() as i32
}

fn format_quantized(value: i32) -> String {
    // f64's Display prints the shortest round-tripping form ("-2", "0.99")
    format!("{}", value as f64 / QUANTUM)
}

fn parse_component(raw: &str, whole: &str) -> Result<i32, ParseCoordError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ParseCoordError(whole.to_string()))?;
    if !value.is_finite() {
        return Err(ParseCoordError(whole.to_string()));
    }
    Ok(quantize(value))
}

/// Vertex coordinate - a corner of a hex where a settlement can stand.
///
/// Stored quantized, which gives structural equality and hashing without
/// going through formatted strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexCoord {
    x: i32,
    y: i32,
}

impl VertexCoord {
    /// Snap a continuous point to a vertex coordinate
    pub fn from_point(point: Point) -> Self {
        Self {
            x: quantize(point.x),
            y: quantize(point.y),
        }
    }

    /// The corner in `slot` (0..6, clockwise from the top) of the hex centered at `center`
    pub fn of_hex(center: Point, slot: usize) -> Self {
        let (dx, dy) = VERTEX_OFFSETS[slot % 6];
        Self::from_point(Point::new(center.x + dx, center.y + dy))
    }

    /// Convert back to a continuous point
    pub fn to_point(&self) -> Point {
        Point::new(self.x as f64 / QUANTUM, self.y as f64 / QUANTUM)
    }

    /// Distance to another vertex
    pub fn distance_to(&self, other: &VertexCoord) -> f64 {
        self.to_point().distance_to(&other.to_point())
    }

    /// Distance to an arbitrary point (e.g. a hex center)
    pub fn distance_to_point(&self, point: &Point) -> f64 {
        self.to_point().distance_to(point)
    }

    /// Whether another vertex lies within `tolerance` of this one
    pub fn is_near(&self, other: &VertexCoord, tolerance: f64) -> bool {
        self.distance_to(other) <= tolerance
    }
}

impl fmt::Display for VertexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", format_quantized(self.x), format_quantized(self.y))
    }
}

impl FromStr for VertexCoord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s.split_once(',').ok_or_else(|| ParseCoordError(s.to_string()))?;
        Ok(Self {
            x: parse_component(x, s)?,
            y: parse_component(y, s)?,
        })
    }
}

/// Edge coordinate - a side of a hex where a road can be built.
///
/// An edge runs from the corner in slot `i` to the corner in slot `i + 1`
/// of the hex that owns it, so the endpoint order is stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeCoord {
    start: VertexCoord,
    end: VertexCoord,
}

impl EdgeCoord {
    /// Create an edge between two corners
    pub fn new(start: VertexCoord, end: VertexCoord) -> Self {
        Self { start, end }
    }

    /// The edge in `slot` (0..6) of the hex centered at `center`
    pub fn of_hex(center: Point, slot: usize) -> Self {
        Self::new(
            VertexCoord::of_hex(center, slot),
            VertexCoord::of_hex(center, slot + 1),
        )
    }

    /// The two corners this edge joins
    pub fn endpoints(&self) -> [VertexCoord; 2] {
        [self.start, self.end]
    }

    /// Midpoint of the edge
    pub fn midpoint(&self) -> Point {
        let a = self.start.to_point();
        let b = self.end.to_point();
        Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
    }

    /// Whether either endpoint coincides with `vertex` within `tolerance`
    pub fn touches(&self, vertex: &VertexCoord, tolerance: f64) -> bool {
        self.endpoints().iter().any(|e| e.is_near(vertex, tolerance))
    }
}

impl fmt::Display for EdgeCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for EdgeCoord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Coordinates may be negative, so the separator is the first '-'
        // that follows a digit.
        let split = s
            .char_indices()
            .skip(1)
            .find(|&(i, c)| c == '-' && s[..i].ends_with(|p: char| p.is_ascii_digit()))
            .map(|(i, _)| i)
            .ok_or_else(|| ParseCoordError(s.to_string()))?;

        Ok(Self {
            start: s[..split].parse()?,
            end: s[split + 1..].parse()?,
        })
    }
}
