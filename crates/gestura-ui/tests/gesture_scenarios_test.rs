//! End-to-end gesture scenarios driven through a `GestureSurface` by the
//! robot harness.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gestura_geometry::Point;
use gestura_testing::robot_assertions::{
    assert_approx_eq, assert_has_event, assert_monotonic, assert_no_event, assert_single_swipe,
};
use gestura_testing::{FixedScroll, GestureRobot, RecordingHaptics};
use gestura_ui::{
    DismissCallbacks, GestureEvent, HapticKind, LongPressCallbacks, LongPressCancelReason,
    LongPressConfig, PullCallbacks, PullToRefreshConfig, RefreshError, SwipeConfig,
    SwipeDirection, SwipeHandlers, SwipeToDismissConfig,
};

fn counting_refresh(robot: &GestureRobot, duration_ms: i64) -> (PullCallbacks, Rc<Cell<u32>>) {
    let calls = Rc::new(Cell::new(0));
    let runtime = robot.surface().runtime().clone();
    let callbacks = {
        let calls = calls.clone();
        PullCallbacks::new(move || {
            calls.set(calls.get() + 1);
            let delay = runtime.delay(duration_ms);
            async move {
                delay.await;
                Ok::<(), RefreshError>(())
            }
        })
    };
    (callbacks, calls)
}

#[test]
fn quick_horizontal_drag_is_a_right_swipe() {
    let mut robot = GestureRobot::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    {
        let seen = seen.clone();
        robot
            .surface()
            .attach_swipe(
                SwipeConfig::default(),
                SwipeHandlers::new().on_swipe_right(move |gesture| {
                    seen.borrow_mut().push(gesture.velocity)
                }),
            )
            .unwrap();
    }

    robot.press(0.0, 0.0);
    robot.advance_time(200);
    robot.move_to(100.0, 5.0);
    robot.release();

    let events = robot.surface().drain_events();
    assert_eq!(
        assert_single_swipe(&events, "right swipe"),
        SwipeDirection::Right
    );
    assert_eq!(seen.borrow().len(), 1);
    assert_approx_eq(seen.borrow()[0], 0.5006, 1e-3, "swipe velocity");
}

#[test]
fn short_diagonal_drag_is_not_a_swipe() {
    let mut robot = GestureRobot::new();
    robot
        .surface()
        .attach_swipe(SwipeConfig::default(), SwipeHandlers::new())
        .unwrap();

    robot.press(0.0, 0.0);
    robot.advance_time(50);
    robot.move_to(10.0, 10.0);
    robot.release();

    assert_eq!(robot.surface().pending_event_count(), 0);
}

#[test]
fn moving_past_threshold_cancels_long_press() {
    let mut robot = GestureRobot::new();
    let fired = Rc::new(Cell::new(false));
    let cancels = Rc::new(RefCell::new(Vec::new()));
    {
        let fired = fired.clone();
        let cancels = cancels.clone();
        robot
            .surface()
            .attach_long_press(
                LongPressConfig::default(),
                LongPressCallbacks::new()
                    .on_long_press(move |_| fired.set(true))
                    .on_cancel(move |reason| cancels.borrow_mut().push(reason)),
            )
            .unwrap();
    }

    robot.press(0.0, 0.0);
    robot.advance_time(100);
    robot.move_to(15.0, 0.0);
    robot.advance_time(1_000);
    robot.release();

    assert!(!fired.get());
    assert_eq!(*cancels.borrow(), vec![LongPressCancelReason::Moved]);
    assert!(robot.runtime().is_idle());
    assert!(!robot.surface().state().long_press_active);
}

#[test]
fn held_press_fires_once_with_monotonic_progress() {
    let haptics = RecordingHaptics::new();
    let mut robot = GestureRobot::with_haptics(haptics.as_feedback());
    robot
        .surface()
        .attach_long_press(LongPressConfig::default(), LongPressCallbacks::new())
        .unwrap();

    robot.long_press(20.0, 30.0, 700);

    let events = robot.surface().drain_events();
    let progress: Vec<f32> = events
        .iter()
        .filter_map(|event| match event {
            GestureEvent::LongPressProgress(progress) => Some(*progress),
            _ => None,
        })
        .collect();
    assert_monotonic(&progress, "long-press progress");
    assert_eq!(progress.last(), Some(&1.0));
    assert!(progress.iter().all(|p| (0.0..=1.0).contains(p)));
    assert_has_event(
        &events,
        |event| {
            *event
                == GestureEvent::LongPress {
                    position: Point::new(20.0, 30.0),
                }
        },
        "long press fired",
    );
    assert_no_event(
        &events,
        |event| matches!(event, GestureEvent::LongPressCancelled(_)),
        "fired press is not cancelled",
    );
    assert_eq!(haptics.performed(), vec![HapticKind::LongPress]);
}

#[test]
fn pull_past_threshold_refreshes_once() {
    let haptics = RecordingHaptics::new();
    let mut robot = GestureRobot::with_haptics(haptics.as_feedback());
    let (callbacks, calls) = counting_refresh(&robot, 1_000);
    robot
        .surface()
        .attach_pull_to_refresh(
            PullToRefreshConfig::default(),
            FixedScroll::at_top().as_container(),
            callbacks,
        )
        .unwrap();

    robot.drag_and_hold((100.0, 10.0), (100.0, 100.0), 200);
    assert_eq!(robot.surface().state().pull_distance, 90.0);
    robot.release();

    assert_eq!(calls.get(), 1);
    assert_eq!(robot.surface().state().pull_distance, 0.0);
    assert!(robot.surface().state().is_refreshing);
    assert_eq!(haptics.count(HapticKind::ThresholdCrossed), 1);

    robot.wait_for_idle();
    assert!(!robot.surface().state().is_refreshing);
    let events = robot.surface().drain_events();
    assert_has_event(
        &events,
        |event| *event == GestureEvent::RefreshStarted,
        "refresh started",
    );
    assert_eq!(events.last(), Some(&GestureEvent::RefreshFinished));
}

#[test]
fn second_pull_during_refresh_is_ignored() {
    let mut robot = GestureRobot::new();
    let (callbacks, calls) = counting_refresh(&robot, 1_000);
    robot
        .surface()
        .attach_pull_to_refresh(
            PullToRefreshConfig::default(),
            FixedScroll::at_top().as_container(),
            callbacks,
        )
        .unwrap();

    robot.drag_and_hold((0.0, 0.0), (0.0, 100.0), 100);
    robot.release();
    robot.drag_and_hold((0.0, 0.0), (0.0, 100.0), 100);
    robot.release();

    assert_eq!(calls.get(), 1);
    assert!(robot.surface().state().is_refreshing);

    robot.wait_for_idle();
    robot.drag_and_hold((0.0, 0.0), (0.0, 100.0), 100);
    robot.release();
    assert_eq!(calls.get(), 2);
}

#[test]
fn short_pull_does_not_refresh() {
    let mut robot = GestureRobot::new();
    let (callbacks, calls) = counting_refresh(&robot, 10);
    robot
        .surface()
        .attach_pull_to_refresh(
            PullToRefreshConfig::default(),
            FixedScroll::at_top().as_container(),
            callbacks,
        )
        .unwrap();

    robot.drag_and_hold((0.0, 0.0), (0.0, 60.0), 100);
    robot.release();
    robot.wait_for_idle();

    assert_eq!(calls.get(), 0);
    assert!(!robot.surface().state().is_refreshing);
}

#[test]
fn scrolled_content_leaves_drag_to_native_scroll() {
    let mut robot = GestureRobot::new();
    let scroll = FixedScroll::scrolled_to(40.0);
    let (callbacks, calls) = counting_refresh(&robot, 10);
    robot
        .surface()
        .attach_pull_to_refresh(PullToRefreshConfig::default(), scroll.as_container(), callbacks)
        .unwrap();

    robot.press(0.0, 0.0);
    robot.advance_time(16);
    assert!(!robot.move_to(0.0, 50.0));
    robot.advance_time(16);
    assert!(!robot.move_to(0.0, 120.0));
    robot.release();

    assert_eq!(calls.get(), 0);
    assert_eq!(robot.surface().pending_event_count(), 0);

    scroll.set_offset(0.0);
    robot.press(0.0, 0.0);
    robot.advance_time(16);
    assert!(!robot.move_to(0.0, 5.0));
    robot.advance_time(16);
    assert!(robot.move_to(0.0, 50.0));
}

#[test]
fn dismiss_follows_a_right_swipe() {
    let mut robot = GestureRobot::new();
    let dismissed = Rc::new(RefCell::new(Vec::new()));
    {
        let dismissed = dismissed.clone();
        robot
            .surface()
            .attach_swipe_to_dismiss(
                SwipeToDismissConfig::default(),
                DismissCallbacks::new()
                    .on_dismiss(move |direction| dismissed.borrow_mut().push(direction)),
            )
            .unwrap();
    }
    robot
        .surface()
        .attach_swipe(SwipeConfig::default(), SwipeHandlers::new())
        .unwrap();

    robot.swipe((50.0, 200.0), (250.0, 205.0), 150);
    assert_eq!(*dismissed.borrow(), vec![SwipeDirection::Right]);
    assert_eq!(
        robot.surface().state().dismissed,
        Some(SwipeDirection::Right)
    );

    let events = robot.surface().drain_events();
    let swipe_at = events
        .iter()
        .position(|event| matches!(event, GestureEvent::Swipe(_)))
        .unwrap();
    let dismiss_at = events
        .iter()
        .position(|event| matches!(event, GestureEvent::Dismissed(_)))
        .unwrap();
    assert!(swipe_at < dismiss_at);

    robot.swipe((250.0, 200.0), (50.0, 205.0), 150);
    assert_eq!(dismissed.borrow().len(), 1);
}

#[test]
fn vertical_swipe_does_not_dismiss() {
    let mut robot = GestureRobot::new();
    robot
        .surface()
        .attach_swipe_to_dismiss(SwipeToDismissConfig::default(), DismissCallbacks::new())
        .unwrap();

    robot.swipe((100.0, 300.0), (102.0, 100.0), 150);

    assert!(!robot.surface().is_dismissed());
    assert_no_event(
        &robot.surface().drain_events(),
        |event| matches!(event, GestureEvent::Dismissed(_)),
        "vertical swipe",
    );
}

#[test]
fn disposing_mid_refresh_clears_refreshing() {
    let mut robot = GestureRobot::new();
    let (callbacks, _calls) = counting_refresh(&robot, 5_000);
    robot
        .surface()
        .attach_pull_to_refresh(
            PullToRefreshConfig::default(),
            FixedScroll::at_top().as_container(),
            callbacks,
        )
        .unwrap();
    let pull = robot.surface().pull_to_refresh().unwrap();

    robot.drag_and_hold((0.0, 0.0), (0.0, 100.0), 100);
    robot.release();
    robot.advance_time(10);
    assert!(pull.is_refreshing());

    robot.surface().dispose();
    assert!(!pull.is_refreshing());
    robot.wait_for_idle();
    assert!(robot.runtime().is_idle());
}
