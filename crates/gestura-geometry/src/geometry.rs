//! Geometric primitives: Point, TouchPoint

use std::ops::{Add, Sub};

/// Logical-pixel position without a timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A single pointer sample: position plus the time it was observed.
///
/// Samples are created fresh for every input event and never mutated.
/// `time_ms` is signed so that out-of-order samples produce a negative
/// duration instead of wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
    pub time_ms: i64,
}

impl TouchPoint {
    pub const fn new(x: f32, y: f32, time_ms: i64) -> Self {
        Self { x, y, time_ms }
    }

    pub fn at(position: Point, time_ms: i64) -> Self {
        Self {
            x: position.x,
            y: position.y,
            time_ms,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl From<TouchPoint> for Point {
    fn from(point: TouchPoint) -> Self {
        point.position()
    }
}
