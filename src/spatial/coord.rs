//! Coordinates, coordinate pairs and token footprints
//!
//! Coordinates are integer pixel offsets relative to the top-left corner of a
//! fixed-size background surface. Their canonical string form (`"x,y"`, or
//! `"x1,y1,x2,y2"` for pairs) is the key used in control values.

use std::fmt;
use std::str::FromStr;

use crate::error::CoordError;

/// A point on a control surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Canonical string key
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Vector from `origin` to this point
    pub fn offset_from(&self, origin: Coord) -> Offset {
        Offset {
            dx: self.x - origin.x,
            dy: self.y - origin.y,
        }
    }

    /// This point moved back by `offset`
    pub fn minus(&self, offset: Offset) -> Coord {
        Coord::new(self.x - offset.dx, self.y - offset.dy)
    }

    pub fn distance(&self, other: Coord) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Coord {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = parse_ints(s, 2)?;
        Ok(Coord::new(parts[0], parts[1]))
    }
}

/// Displacement between two points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

/// Two linked coordinates, kept in insertion order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordPair {
    pub start: Coord,
    pub end: Coord,
}

impl CoordPair {
    pub fn new(start: Coord, end: Coord) -> Self {
        Self { start, end }
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    /// Whether both pairs link the same two points, in either direction
    pub fn same_link(&self, other: &CoordPair) -> bool {
        self == other || self.reversed() == *other
    }

    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CoordPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.start, self.end)
    }
}

impl FromStr for CoordPair {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = parse_ints(s, 4)?;
        Ok(CoordPair::new(
            Coord::new(parts[0], parts[1]),
            Coord::new(parts[2], parts[3]),
        ))
    }
}

fn parse_ints(input: &str, expected: usize) -> Result<Vec<i32>, CoordError> {
    let parts: Vec<&str> = input.split(',').collect();
    if parts.len() != expected {
        return Err(CoordError::Arity {
            input: input.to_string(),
            expected,
            found: parts.len(),
        });
    }
    parts
        .iter()
        .map(|part| {
            part.parse::<i32>().map_err(|_| CoordError::Integer {
                input: input.to_string(),
                part: part.to_string(),
            })
        })
        .collect()
}

/// A bounding box in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// The area a token covers when centered on its anchor coordinate.
///
/// All comparisons are done on doubled integer coordinates so odd token
/// sizes are exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    pub anchor: Coord,
    pub width: u32,
    pub height: u32,
}

impl Footprint {
    pub fn new(anchor: Coord, width: u32, height: u32) -> Self {
        Self {
            anchor,
            width,
            height,
        }
    }

    /// Whether `point` lies inside or on the edge of the footprint
    pub fn contains(&self, point: Coord) -> bool {
        let dx = 2 * (i64::from(point.x) - i64::from(self.anchor.x));
        let dy = 2 * (i64::from(point.y) - i64::from(self.anchor.y));
        dx.abs() <= i64::from(self.width) && dy.abs() <= i64::from(self.height)
    }

    /// Whether the whole footprint lies within `[0, width] x [0, height]`
    pub fn within(&self, width: u32, height: u32) -> bool {
        let x2 = 2 * i64::from(self.anchor.x);
        let y2 = 2 * i64::from(self.anchor.y);
        let w = i64::from(self.width);
        let h = i64::from(self.height);
        x2 - w >= 0
            && x2 + w <= 2 * i64::from(width)
            && y2 - h >= 0
            && y2 + h <= 2 * i64::from(height)
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(
            f64::from(self.anchor.x) - f64::from(self.width) / 2.0,
            f64::from(self.anchor.y) - f64::from(self.height) / 2.0,
            f64::from(self.width),
            f64::from(self.height),
        )
    }
}
