use super::*;
use gestura_core::Runtime;
use gestura_geometry::Point;
use std::cell::Cell;

struct Harness {
    runtime: Runtime,
    controller: PullToRefreshController,
    offset: Rc<Cell<f32>>,
    refreshes: Rc<Cell<u32>>,
    refreshing_log: Rc<RefCell<Vec<bool>>>,
    haptics: Rc<RefCell<Vec<HapticKind>>>,
}

fn harness(config: PullToRefreshConfig, fail: bool) -> Harness {
    let runtime = Runtime::default();
    let offset = Rc::new(Cell::new(0.0f32));
    let refreshes = Rc::new(Cell::new(0u32));
    let refreshing_log = Rc::new(RefCell::new(Vec::new()));
    let haptics = Rc::new(RefCell::new(Vec::new()));

    let callbacks = {
        let handle = runtime.handle();
        let refreshes = refreshes.clone();
        let log = refreshing_log.clone();
        PullCallbacks::new(move || {
            refreshes.set(refreshes.get() + 1);
            let delay = handle.delay(200);
            async move {
                delay.await;
                if fail {
                    Err::<(), RefreshError>("backend unavailable".into())
                } else {
                    Ok(())
                }
            }
        })
        .on_refreshing_changed(move |value| log.borrow_mut().push(value))
    };
    let scroll_offset = offset.clone();
    let recorder = haptics.clone();
    let controller = PullToRefreshController::new(
        runtime.handle(),
        config,
        Rc::new(move || scroll_offset.get()),
        callbacks,
    )
    .with_haptics(Rc::new(move |kind: HapticKind| {
        recorder.borrow_mut().push(kind)
    }));

    Harness {
        runtime,
        controller,
        offset,
        refreshes,
        refreshing_log,
        haptics,
    }
}

fn at(phase: PointerPhase, y: f32, time_ms: i64) -> PointerEvent {
    PointerEvent::new(phase, Point::new(0.0, y), time_ms)
}

fn drag(controller: &PullToRefreshController, distance: f32) -> bool {
    controller.handle(&at(PointerPhase::Start, 100.0, 0)).unwrap();
    controller
        .handle(&at(PointerPhase::Move, 100.0 + distance / 2.0, 10))
        .unwrap();
    controller
        .handle(&at(PointerPhase::Move, 100.0 + distance, 20))
        .unwrap();
    controller.handle(&at(PointerPhase::End, 100.0 + distance, 30)).unwrap()
}

#[test]
fn release_past_threshold_refreshes_once() {
    let h = harness(PullToRefreshConfig::default(), false);
    assert!(drag(&h.controller, 90.0));
    assert_eq!(h.controller.pull_distance(), 0.0);
    assert!(h.controller.is_refreshing());

    h.runtime.drain_ui();
    assert_eq!(h.refreshes.get(), 1);
    assert!(h.controller.is_refreshing());

    h.runtime.advance_by(200);
    assert!(!h.controller.is_refreshing());
    assert_eq!(h.refreshes.get(), 1);
    assert_eq!(*h.refreshing_log.borrow(), vec![true, false]);
    assert!(h.runtime.is_idle());
}

#[test]
fn release_below_threshold_does_not_refresh() {
    let h = harness(PullToRefreshConfig::default(), false);
    assert!(!drag(&h.controller, 70.0));
    h.runtime.advance_by(500);
    assert_eq!(h.refreshes.get(), 0);
    assert_eq!(h.controller.pull_distance(), 0.0);
    assert_eq!(h.controller.refresh_count(), 0);
}

#[test]
fn scrolled_container_never_engages() {
    let h = harness(PullToRefreshConfig::default(), false);
    h.offset.set(40.0);
    assert!(!h.controller.start(&at(PointerPhase::Start, 100.0, 0)).unwrap());
    let moved = at(PointerPhase::Move, 300.0, 10);
    h.controller.pointer_move(&moved).unwrap();
    assert!(!moved.is_consumed());
    assert_eq!(h.controller.pull_distance(), 0.0);
    assert!(!h.controller.release().unwrap());
}

#[test]
fn moves_past_suppress_threshold_are_consumed() {
    let h = harness(PullToRefreshConfig::default(), false);
    h.controller.handle(&at(PointerPhase::Start, 100.0, 0)).unwrap();

    let small = at(PointerPhase::Move, 105.0, 10);
    h.controller.handle(&small).unwrap();
    assert!(!small.is_consumed());
    assert_eq!(h.controller.pull_distance(), 5.0);

    let large = at(PointerPhase::Move, 115.0, 20);
    h.controller.handle(&large).unwrap();
    assert!(large.is_consumed());
}

#[test]
fn pull_distance_is_capped_and_never_negative() {
    let h = harness(PullToRefreshConfig::default(), false);
    h.controller.handle(&at(PointerPhase::Start, 100.0, 0)).unwrap();
    h.controller.handle(&at(PointerPhase::Move, 400.0, 10)).unwrap();
    assert_eq!(h.controller.pull_distance(), 120.0);
    h.controller.handle(&at(PointerPhase::Move, 40.0, 20)).unwrap();
    assert_eq!(h.controller.pull_distance(), 0.0);
}

#[test]
fn overlapping_release_is_ignored() {
    let h = harness(PullToRefreshConfig::default(), false);
    assert!(drag(&h.controller, 100.0));
    h.runtime.advance_by(50);

    // Pulls are tracked while refreshing.
    h.controller.handle(&at(PointerPhase::Start, 100.0, 60)).unwrap();
    h.controller.handle(&at(PointerPhase::Move, 200.0, 70)).unwrap();
    assert_eq!(h.controller.pull_distance(), 100.0);
    assert!(!h.controller.handle(&at(PointerPhase::End, 200.0, 80)).unwrap());
    assert_eq!(h.controller.pull_distance(), 0.0);

    h.runtime.advance_by(500);
    assert_eq!(h.refreshes.get(), 1);
    assert_eq!(h.controller.refresh_count(), 1);
    assert!(!h.controller.is_refreshing());
}

#[test]
fn failed_refresh_still_clears_flag() {
    let h = harness(PullToRefreshConfig::default(), true);
    assert!(drag(&h.controller, 90.0));
    h.runtime.advance_by(200);
    assert!(!h.controller.is_refreshing());
    assert_eq!(*h.refreshing_log.borrow(), vec![true, false]);

    assert!(drag(&h.controller, 90.0));
    assert_eq!(h.controller.refresh_count(), 2);
}

#[test]
fn dispose_cancels_running_refresh() {
    let h = harness(PullToRefreshConfig::default(), false);
    assert!(drag(&h.controller, 90.0));
    h.runtime.drain_ui();

    h.controller.dispose();
    assert!(!h.controller.is_refreshing());
    assert_eq!(*h.refreshing_log.borrow(), vec![true, false]);
    assert!(h.runtime.is_idle());
    assert_eq!(
        h.controller.handle(&at(PointerPhase::Start, 0.0, 0)),
        Err(GestureError::Disposed {
            controller: "PullToRefreshController"
        })
    );
}

#[test]
fn threshold_haptic_fires_once_per_drag() {
    let h = harness(PullToRefreshConfig::default(), false);
    h.controller.handle(&at(PointerPhase::Start, 100.0, 0)).unwrap();
    h.controller.handle(&at(PointerPhase::Move, 185.0, 10)).unwrap();
    h.controller.handle(&at(PointerPhase::Move, 150.0, 20)).unwrap();
    h.controller.handle(&at(PointerPhase::Move, 190.0, 30)).unwrap();
    assert_eq!(*h.haptics.borrow(), vec![HapticKind::ThresholdCrossed]);

    h.controller.handle(&at(PointerPhase::Cancel, 190.0, 40)).unwrap();
    assert_eq!(h.controller.pull_distance(), 0.0);
    assert_eq!(h.refreshes.get(), 0);

    h.controller.handle(&at(PointerPhase::Start, 100.0, 50)).unwrap();
    h.controller.handle(&at(PointerPhase::Move, 190.0, 60)).unwrap();
    assert_eq!(h.haptics.borrow().len(), 2);
}

#[test]
fn manual_refresh_respects_mutual_exclusion() {
    let h = harness(PullToRefreshConfig::default(), false);
    assert!(h.controller.refresh().unwrap());
    assert!(!h.controller.refresh().unwrap());
    h.runtime.advance_by(200);
    assert_eq!(h.refreshes.get(), 1);
    assert!(h.controller.refresh().unwrap());
}

#[test]
fn scroll_container_may_read_the_controller() {
    let runtime = Runtime::default();
    let slot: Rc<RefCell<Option<PullToRefreshController>>> = Rc::new(RefCell::new(None));
    let reads = Rc::new(Cell::new(0u32));
    let scroll = {
        let slot = slot.clone();
        let reads = reads.clone();
        move || {
            if let Some(controller) = slot.borrow().as_ref() {
                reads.set(reads.get() + 1);
                assert!(!controller.state().is_refreshing);
            }
            0.0f32
        }
    };
    let controller = PullToRefreshController::new(
        runtime.handle(),
        PullToRefreshConfig::default(),
        Rc::new(scroll),
        PullCallbacks::new(|| async { Ok::<(), RefreshError>(()) }),
    );
    *slot.borrow_mut() = Some(controller.clone());

    assert!(controller.start(&at(PointerPhase::Start, 100.0, 0)).unwrap());
    assert!(reads.get() > 0);
    controller.handle(&at(PointerPhase::Move, 150.0, 10)).unwrap();
    assert_eq!(controller.pull_distance(), 50.0);

    slot.borrow_mut().take();
}
