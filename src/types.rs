//! Core value types for the pipeline canvas
//!
//! This module contains the small geometric value types shared by the graph
//! store, the geometry module and the editing engines.
//!
//! # Main Types
//!
//! - [`Point`] - A position or offset in some coordinate space
//! - [`Size`] - Width and height of a node
//! - [`Rect`] - Axis-aligned bounding box used for hit-testing
//! - [`LayoutAxis`] - Direction along which placeholder chains grow
//!
//! # Coordinate Spaces
//!
//! A [`Point`] carries no tag for the space it lives in. Node positions are
//! local to the parent container (or canvas space for top-level nodes); all
//! conversions go through [`crate::geometry`].

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Tolerance used when comparing positions produced by coordinate transforms
pub const POSITION_EPSILON: f64 = 1e-6;

/// A 2D point (or offset) in canvas units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether two points are equal within [`POSITION_EPSILON`]
    pub fn approx_eq(self, other: Point) -> bool {
        (self.x - other.x).abs() < POSITION_EPSILON && (self.y - other.y).abs() < POSITION_EPSILON
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Width and height of a node
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Extent along the given axis
    pub fn along(self, axis: LayoutAxis) -> f64 {
        match axis {
            LayoutAxis::Horizontal => self.width,
            LayoutAxis::Vertical => self.height,
        }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}x{:.1}", self.width, self.height)
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Point::new(x, y), Size::new(width, height))
    }

    pub fn min(&self) -> Point {
        self.origin
    }

    pub fn max(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width,
            self.origin.y + self.size.height,
        )
    }

    /// Check if this rect overlaps another (touching edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
    }

    /// Smallest rect containing both
    pub fn union(&self, other: &Rect) -> Rect {
        let min = Point::new(
            self.origin.x.min(other.origin.x),
            self.origin.y.min(other.origin.y),
        );
        let (a, b) = (self.max(), other.max());
        let max = Point::new(a.x.max(b.x), a.y.max(b.y));
        Rect::new(min, Size::new(max.x - min.x, max.y - min.y))
    }

    /// Far edge along the given axis
    pub fn end(&self, axis: LayoutAxis) -> f64 {
        match axis {
            LayoutAxis::Horizontal => self.max().x,
            LayoutAxis::Vertical => self.max().y,
        }
    }
}

/// Direction along which a placeholder chain grows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutAxis {
    /// Left to right
    #[default]
    Horizontal,
    /// Top to bottom
    Vertical,
}

impl LayoutAxis {
    /// The perpendicular axis
    pub fn cross(self) -> LayoutAxis {
        match self {
            LayoutAxis::Horizontal => LayoutAxis::Vertical,
            LayoutAxis::Vertical => LayoutAxis::Horizontal,
        }
    }

    /// Unit step along this axis scaled by `distance`
    pub fn offset(self, distance: f64) -> Point {
        match self {
            LayoutAxis::Horizontal => Point::new(distance, 0.0),
            LayoutAxis::Vertical => Point::new(0.0, distance),
        }
    }

    /// `p` with its coordinate along this axis replaced by `value`
    pub fn with_coord(self, p: Point, value: f64) -> Point {
        match self {
            LayoutAxis::Horizontal => Point::new(value, p.y),
            LayoutAxis::Vertical => Point::new(p.x, value),
        }
    }
}

impl std::fmt::Display for LayoutAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutAxis::Horizontal => write!(f, "horizontal"),
            LayoutAxis::Vertical => write!(f, "vertical"),
        }
    }
}
