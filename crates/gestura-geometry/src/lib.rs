//! Pure point math for Gestura
//!
//! This crate contains the timestamped point types and the small set of
//! geometric helpers every recogniser builds on. Everything here is a pure
//! function of its inputs.

mod geometry;
mod math;

pub use geometry::*;
pub use math::*;

pub mod prelude {
    pub use crate::geometry::{Point, TouchPoint};
    pub use crate::math::{angle, center, clamp, distance, is_horizontal, is_vertical, lerp};
}

#[cfg(test)]
#[path = "tests/geometry_tests.rs"]
mod tests;
