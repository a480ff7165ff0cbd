//! Assertion utilities for robot testing
//!
//! Helpers for checking recognised gestures and surface state in robot
//! tests, with tolerances for values derived from sampled traces.

use gestura_geometry::Point;
use gestura_ui::{GestureEvent, SwipeDirection};

/// Assert that a value is within `tolerance` of `expected`.
pub fn assert_approx_eq(actual: f32, expected: f32, tolerance: f32, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {} (±{}), got {} (diff: {})",
        msg,
        expected,
        tolerance,
        actual,
        diff
    );
}

pub fn assert_point_approx_eq(actual: Point, expected: Point, tolerance: f32, msg: &str) {
    assert_approx_eq(actual.x, expected.x, tolerance, &format!("{} - x", msg));
    assert_approx_eq(actual.y, expected.y, tolerance, &format!("{} - y", msg));
}

/// Assert that exactly one swipe was recognised and return its direction.
pub fn assert_single_swipe(events: &[GestureEvent], msg: &str) -> SwipeDirection {
    let swipes: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            GestureEvent::Swipe(gesture) => Some(gesture.direction),
            _ => None,
        })
        .collect();
    assert_eq!(
        swipes.len(),
        1,
        "{}: expected one swipe, got {:?}",
        msg,
        events
    );
    swipes[0]
}

/// Assert that no event in the list matches `predicate`.
pub fn assert_no_event(
    events: &[GestureEvent],
    predicate: impl Fn(&GestureEvent) -> bool,
    msg: &str,
) {
    assert!(
        !events.iter().any(predicate),
        "{}: unexpected event in {:?}",
        msg,
        events
    );
}

/// Assert that some event in the list matches `predicate`.
pub fn assert_has_event(
    events: &[GestureEvent],
    predicate: impl Fn(&GestureEvent) -> bool,
    msg: &str,
) {
    assert!(
        events.iter().any(predicate),
        "{}: no matching event in {:?}",
        msg,
        events
    );
}

/// Assert that a sequence of reported values never decreases.
pub fn assert_monotonic(values: &[f32], msg: &str) {
    for pair in values.windows(2) {
        assert!(
            pair[1] >= pair[0],
            "{}: {} followed by {} in {:?}",
            msg,
            pair[0],
            pair[1],
            values
        );
    }
}

/// Assert that a collection has an expected count.
pub fn assert_count<T>(items: &[T], expected: usize, msg: &str) {
    assert_eq!(
        items.len(),
        expected,
        "{}: expected {} items, got {}",
        msg,
        expected,
        items.len()
    );
}
