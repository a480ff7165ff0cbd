use super::*;
use crate::robot_assertions::{assert_approx_eq, assert_single_swipe};
use gestura_ui::{
    GestureEvent, LongPressCallbacks, LongPressConfig, PinchHandlers, SwipeConfig, SwipeDirection,
    SwipeHandlers,
};

#[test]
fn swipe_trace_advances_clock_and_is_recognised() {
    let mut robot = GestureRobot::new();
    robot
        .surface()
        .attach_swipe(SwipeConfig::default(), SwipeHandlers::new())
        .unwrap();

    robot.swipe((300.0, 100.0), (300.0, 10.0), 150);

    assert_eq!(robot.now_ms(), 150);
    assert!(!robot.is_pressed());
    let events = robot.surface().drain_events();
    assert_eq!(assert_single_swipe(&events, "upward swipe"), SwipeDirection::Up);
}

#[test]
fn slow_trace_is_not_a_swipe() {
    let mut robot = GestureRobot::new();
    robot
        .surface()
        .attach_swipe(SwipeConfig::default(), SwipeHandlers::new())
        .unwrap();

    robot.swipe((0.0, 0.0), (200.0, 0.0), 400);

    assert_eq!(robot.surface().pending_event_count(), 0);
}

#[test]
fn wait_for_idle_runs_long_press_to_completion() {
    let mut robot = GestureRobot::new();
    robot
        .surface()
        .attach_long_press(LongPressConfig::default(), LongPressCallbacks::new())
        .unwrap();

    robot.press(40.0, 40.0);
    robot.wait_for_idle();

    assert_eq!(robot.now_ms(), 500);
    assert!(robot.runtime().is_idle());
    let events = robot.surface().drain_events();
    assert_eq!(
        events.last(),
        Some(&GestureEvent::LongPress {
            position: Point::new(40.0, 40.0)
        })
    );
    robot.release();
    assert_eq!(robot.surface().pending_event_count(), 0);
}

#[test]
fn pinch_trace_reports_final_scale() {
    let mut robot = GestureRobot::new();
    robot.surface().attach_pinch(PinchHandlers::new()).unwrap();

    robot.pinch((200.0, 200.0), 100.0, 200.0);

    let events = robot.surface().drain_events();
    assert_eq!(
        events.first(),
        Some(&GestureEvent::PinchStarted {
            initial_distance: 100.0
        })
    );
    let last_scale = events
        .iter()
        .rev()
        .find_map(|event| match event {
            GestureEvent::Pinch(gesture) => Some(gesture.scale),
            _ => None,
        })
        .unwrap();
    assert_approx_eq(last_scale, 2.0, 1e-4, "final pinch scale");
    assert_eq!(events.last(), Some(&GestureEvent::PinchEnded));
}

#[test]
fn moving_without_a_contact_is_ignored() {
    let mut robot = GestureRobot::new();
    assert!(!robot.move_to(10.0, 10.0));
    assert!(!robot.release());
}

#[test]
#[should_panic(expected = "scale")]
fn approx_assertion_reports_message() {
    assert_approx_eq(1.5, 1.0, 0.1, "scale");
}
