//! Distance, angle and interpolation helpers shared by all recognisers.
//!
//! Angles follow screen coordinates: 0° points right and 90° points down,
//! because the y axis grows towards the bottom of the surface.

use crate::Point;

/// Default angular tolerance for [`is_horizontal`] and [`is_vertical`].
pub const DEFAULT_AXIS_TOLERANCE_DEG: f32 = 30.0;

/// Euclidean distance between two points.
pub fn distance(p1: impl Into<Point>, p2: impl Into<Point>) -> f32 {
    let (p1, p2) = (p1.into(), p2.into());
    (p2.x - p1.x).hypot(p2.y - p1.y)
}

/// Midpoint between two points.
pub fn center(p1: impl Into<Point>, p2: impl Into<Point>) -> Point {
    let (p1, p2) = (p1.into(), p2.into());
    Point::new((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0)
}

/// Direction of travel from `start` to `end` in degrees, in `[0, 360)`.
///
/// A zero-length segment reports 0°.
pub fn angle(start: impl Into<Point>, end: impl Into<Point>) -> f32 {
    let (start, end) = (start.into(), end.into());
    let degrees = (end.y - start.y).atan2(end.x - start.x).to_degrees();
    let normalized = if degrees < 0.0 { degrees + 360.0 } else { degrees };
    // -0.000001 + 360.0 rounds to exactly 360.0 in f32
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Restricts `value` to `[min, max]`.
///
/// Unlike [`f32::clamp`] this never panics; with `min > max` the upper bound
/// wins.
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Linear interpolation: `a` at `t = 0`, `b` at `t = 1`. `t` is not clamped.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Whether the segment points left or right within `tolerance_deg`.
pub fn is_horizontal(start: impl Into<Point>, end: impl Into<Point>, tolerance_deg: f32) -> bool {
    let a = angle(start, end);
    a <= tolerance_deg || a >= 360.0 - tolerance_deg || (a - 180.0).abs() <= tolerance_deg
}

/// Whether the segment points up or down within `tolerance_deg`.
pub fn is_vertical(start: impl Into<Point>, end: impl Into<Point>, tolerance_deg: f32) -> bool {
    let a = angle(start, end);
    (a - 90.0).abs() <= tolerance_deg || (a - 270.0).abs() <= tolerance_deg
}
