use super::*;
use crate::nodes::input::types::Contact;
use gestura_geometry::Point;
use proptest::prelude::*;
use std::cell::RefCell;

fn tp(x: f32, y: f32, time_ms: i64) -> TouchPoint {
    TouchPoint::new(x, y, time_ms)
}

#[test]
fn fast_horizontal_motion_is_a_right_swipe() {
    let gesture = classify_swipe(tp(0.0, 0.0, 0), tp(100.0, 5.0, 200), &SwipeConfig::default())
        .expect("swipe");
    assert_eq!(gesture.direction, SwipeDirection::Right);
    assert!((gesture.velocity - 0.5006).abs() < 1e-3);
    assert!((gesture.distance - 100.1249).abs() < 1e-3);
    assert_eq!(gesture.duration_ms, 200);
}

#[test]
fn short_motion_is_not_a_swipe() {
    assert!(classify_swipe(tp(0.0, 0.0, 0), tp(10.0, 10.0, 50), &SwipeConfig::default()).is_none());
}

#[test]
fn zero_travel_is_not_a_swipe_even_with_zero_threshold() {
    let config = SwipeConfig::default()
        .with_threshold(0.0)
        .with_velocity_threshold(0.0);
    assert!(classify_swipe(tp(5.0, 5.0, 0), tp(5.0, 5.0, 100), &config).is_none());
    assert!(classify_swipe(tp(5.0, 5.0, 0), tp(5.0, 4.0, 100), &config).is_some());
}

#[test]
fn each_direction_is_recognised() {
    let config = SwipeConfig::default();
    let cases = [
        (tp(100.0, 0.0, 100), SwipeDirection::Right),
        (tp(-100.0, 0.0, 100), SwipeDirection::Left),
        (tp(0.0, 100.0, 100), SwipeDirection::Down),
        (tp(0.0, -100.0, 100), SwipeDirection::Up),
    ];
    for (end, expected) in cases {
        let gesture = classify_swipe(tp(0.0, 0.0, 0), end, &config).expect("swipe");
        assert_eq!(gesture.direction, expected);
    }
}

#[test]
fn slow_motion_is_rejected() {
    // 60px over 250ms is 0.24 px/ms.
    assert!(classify_swipe(tp(0.0, 0.0, 0), tp(60.0, 0.0, 250), &SwipeConfig::default()).is_none());
}

#[test]
fn long_duration_is_rejected() {
    let config = SwipeConfig::default().with_velocity_threshold(0.0);
    assert!(classify_swipe(tp(0.0, 0.0, 0), tp(500.0, 0.0, 301), &config).is_none());
    assert!(classify_swipe(tp(0.0, 0.0, 0), tp(500.0, 0.0, 300), &config).is_some());
}

#[test]
fn non_positive_duration_is_rejected() {
    let config = SwipeConfig::default();
    assert!(classify_swipe(tp(0.0, 0.0, 10), tp(100.0, 0.0, 10), &config).is_none());
    assert!(classify_swipe(tp(0.0, 0.0, 10), tp(100.0, 0.0, 5), &config).is_none());
}

#[test]
fn diagonal_motion_is_rejected() {
    let config = SwipeConfig::default();
    assert!(classify_swipe(tp(0.0, 0.0, 0), tp(80.0, 60.0, 100), &config).is_none());
    assert!(classify_swipe(tp(0.0, 0.0, 0), tp(70.0, 70.0, 100), &config).is_none());
    // Exactly twice the secondary axis passes.
    let gesture = classify_swipe(tp(0.0, 0.0, 0), tp(80.0, 40.0, 100), &config).expect("swipe");
    assert_eq!(gesture.direction, SwipeDirection::Right);
}

#[test]
fn detector_classifies_a_live_stream() {
    let mut detector = SwipeDetector::new(SwipeConfig::default());
    let start = PointerEvent::new(PointerPhase::Start, Point::new(0.0, 0.0), 0);
    let moved = PointerEvent::new(PointerPhase::Move, Point::new(60.0, 2.0), 80);
    let end = PointerEvent::new(PointerPhase::End, Point::new(120.0, 4.0), 150);

    assert!(detector.on_event(&start).is_none());
    assert!(detector.is_tracking());
    assert!(detector.on_event(&moved).is_none());
    let gesture = detector.on_event(&end).expect("swipe");
    assert_eq!(gesture.direction, SwipeDirection::Right);
    assert!(!detector.is_tracking());
}

#[test]
fn detector_uses_last_position_when_end_has_no_contacts() {
    let mut detector = SwipeDetector::default();
    detector.on_event(&PointerEvent::new(PointerPhase::Start, Point::new(0.0, 0.0), 0));
    detector.on_event(&PointerEvent::new(PointerPhase::Move, Point::new(0.0, 120.0), 90));
    let end = PointerEvent::with_contacts(PointerPhase::End, [], 100);
    let gesture = detector.on_event(&end).expect("swipe");
    assert_eq!(gesture.direction, SwipeDirection::Down);
    assert_eq!(gesture.end, tp(0.0, 120.0, 100));
}

#[test]
fn detector_discards_cycle_on_cancel_or_second_contact() {
    let mut detector = SwipeDetector::default();
    detector.on_event(&PointerEvent::new(PointerPhase::Start, Point::new(0.0, 0.0), 0));
    detector.on_event(&PointerEvent::new(PointerPhase::Cancel, Point::new(0.0, 0.0), 50));
    assert!(detector
        .on_event(&PointerEvent::new(PointerPhase::End, Point::new(200.0, 0.0), 100))
        .is_none());

    detector.on_event(&PointerEvent::new(PointerPhase::Start, Point::new(0.0, 0.0), 0));
    detector.on_event(&PointerEvent::with_contacts(
        PointerPhase::Move,
        [
            Contact::new(0, Point::new(10.0, 0.0)),
            Contact::new(1, Point::new(50.0, 0.0)),
        ],
        40,
    ));
    assert!(detector
        .on_event(&PointerEvent::new(PointerPhase::End, Point::new(200.0, 0.0), 100))
        .is_none());
}

#[test]
fn end_without_start_is_ignored() {
    let mut detector = SwipeDetector::default();
    assert!(detector
        .on_event(&PointerEvent::new(PointerPhase::End, Point::new(200.0, 0.0), 100))
        .is_none());
}

#[test]
fn handlers_dispatch_generic_then_directional() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let handlers = {
        let generic = calls.clone();
        let left = calls.clone();
        let right = calls.clone();
        SwipeHandlers::new()
            .on_swipe(move |direction, _| generic.borrow_mut().push(format!("{direction:?}")))
            .on_swipe_left(move |_| left.borrow_mut().push("left".to_string()))
            .on_swipe_right(move |_| right.borrow_mut().push("right".to_string()))
    };

    let gesture = classify_swipe(tp(0.0, 0.0, 0), tp(-100.0, 0.0, 100), &SwipeConfig::default())
        .expect("swipe");
    handlers.dispatch(&gesture);
    assert_eq!(*calls.borrow(), vec!["Left".to_string(), "left".to_string()]);
}

proptest! {
    #[test]
    fn below_threshold_never_classifies(
        angle in 0.0f32..std::f32::consts::TAU,
        length in 0.0f32..49.9,
        duration in 1i64..300,
    ) {
        let end = tp(length * angle.cos(), length * angle.sin(), duration);
        prop_assert!(classify_swipe(tp(0.0, 0.0, 0), end, &SwipeConfig::default()).is_none());
    }

    #[test]
    fn too_slow_never_classifies(
        dx in -1000.0f32..1000.0,
        dy in -1000.0f32..1000.0,
        duration in 301i64..10_000,
    ) {
        prop_assert!(classify_swipe(tp(0.0, 0.0, 0), tp(dx, dy, duration), &SwipeConfig::default()).is_none());
    }

    #[test]
    fn classification_is_deterministic(
        x0 in -500.0f32..500.0,
        y0 in -500.0f32..500.0,
        dx in -500.0f32..500.0,
        dy in -500.0f32..500.0,
        duration in -10i64..400,
    ) {
        let start = tp(x0, y0, 1_000);
        let end = tp(x0 + dx, y0 + dy, 1_000 + duration);
        let config = SwipeConfig::default();
        prop_assert_eq!(classify_swipe(start, end, &config), classify_swipe(start, end, &config));
    }

    #[test]
    fn diagonal_motion_never_classifies(
        primary in 60.0f32..400.0,
        secondary_ratio in 0.51f32..1.0,
        flip_x in any::<bool>(),
        flip_y in any::<bool>(),
    ) {
        let mut dx = primary;
        let mut dy = primary * secondary_ratio;
        if flip_x { dx = -dx; }
        if flip_y { dy = -dy; }
        prop_assert!(classify_swipe(tp(0.0, 0.0, 0), tp(dx, dy, 100), &SwipeConfig::default()).is_none());
        prop_assert!(classify_swipe(tp(0.0, 0.0, 0), tp(dy, dx, 100), &SwipeConfig::default()).is_none());
    }

    #[test]
    fn recognised_swipe_respects_configured_limits(
        dx in -500.0f32..500.0,
        dy in -500.0f32..500.0,
        duration in 1i64..300,
    ) {
        let config = SwipeConfig::default();
        if let Some(gesture) = classify_swipe(tp(0.0, 0.0, 0), tp(dx, dy, duration), &config) {
            prop_assert!(gesture.distance >= config.threshold);
            prop_assert!(gesture.velocity >= config.velocity_threshold);
            prop_assert!(gesture.duration_ms <= config.time_threshold_ms);
            if gesture.direction.is_horizontal() {
                prop_assert!(dx.abs() >= config.directional_threshold * dy.abs());
            } else {
                prop_assert!(dy.abs() >= config.directional_threshold * dx.abs());
            }
        }
    }
}
