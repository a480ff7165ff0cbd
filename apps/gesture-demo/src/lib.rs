//! Scripted pointer traces replayed through a fully attached
//! [`GestureSurface`].
//!
//! Scripts describe physical-pixel input the way a winit window reports it;
//! the desktop adapter turns each step into [`PointerInput`] when it is
//! replayed, stamped with the driver's clock.

use std::rc::Rc;

use gestura_core::{Runtime, RuntimeHandle};
use gestura_foundation::{PointerButton, PointerId, PointerPhase};
use gestura_platform_desktop_winit::winit::dpi::PhysicalPosition;
use gestura_platform_desktop_winit::winit::event::ElementState;
use gestura_platform_desktop_winit::DesktopWinitPlatform;
use gestura_runtime_std::StdRuntime;
use gestura_ui::{
    DismissCallbacks, GestureEvent, GestureSurface, HapticKind, LongPressCallbacks,
    LongPressConfig, PinchHandlers, PointerInput, PullCallbacks, PullToRefreshConfig,
    RefreshError, SwipeConfig, SwipeHandlers, SwipeToDismissConfig,
};

/// Simulated refresh latency.
pub const REFRESH_DURATION_MS: i64 = 800;

/// Scale factor of the simulated window.
pub const SCALE_FACTOR: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    Press { x: f64, y: f64 },
    MoveTo { x: f64, y: f64 },
    Release,
    LeaveWindow,
    TouchDown { finger: PointerId, x: f64, y: f64 },
    TouchMove { finger: PointerId, x: f64, y: f64 },
    TouchUp { finger: PointerId, x: f64, y: f64 },
    Wait(i64),
}

#[derive(Clone, Debug)]
pub struct Scenario {
    pub name: &'static str,
    pub steps: Vec<Step>,
}

impl Scenario {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            steps: Vec::new(),
        }
    }

    fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Mouse drag in `moves` even steps `interval_ms` apart.
    fn drag(mut self, from: (f64, f64), to: (f64, f64), moves: usize, interval_ms: i64) -> Self {
        self.steps.push(Step::Press {
            x: from.0,
            y: from.1,
        });
        for i in 1..=moves {
            let t = i as f64 / moves as f64;
            self.steps.push(Step::Wait(interval_ms));
            self.steps.push(Step::MoveTo {
                x: from.0 + (to.0 - from.0) * t,
                y: from.1 + (to.1 - from.1) * t,
            });
        }
        self
    }
}

/// Every built-in script, in the order the demo plays them.
pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new("swipe-left")
            .drag((600.0, 400.0), (200.0, 410.0), 8, 15)
            .step(Step::Release),
        Scenario::new("slow-drag")
            .drag((200.0, 400.0), (600.0, 400.0), 8, 60)
            .step(Step::Release),
        Scenario::new("long-press")
            .step(Step::Press { x: 300.0, y: 300.0 })
            .step(Step::Wait(650))
            .step(Step::Release),
        Scenario::new("long-press-cancelled")
            .step(Step::Press { x: 300.0, y: 300.0 })
            .step(Step::Wait(100))
            .step(Step::MoveTo { x: 340.0, y: 300.0 })
            .step(Step::Wait(600))
            .step(Step::Release),
        Scenario::new("pinch-zoom")
            .step(Step::TouchDown {
                finger: 1,
                x: 300.0,
                y: 400.0,
            })
            .step(Step::TouchDown {
                finger: 2,
                x: 500.0,
                y: 400.0,
            })
            .step(Step::Wait(16))
            .step(Step::TouchMove {
                finger: 2,
                x: 600.0,
                y: 400.0,
            })
            .step(Step::Wait(16))
            .step(Step::TouchMove {
                finger: 1,
                x: 200.0,
                y: 400.0,
            })
            .step(Step::TouchUp {
                finger: 2,
                x: 600.0,
                y: 400.0,
            })
            .step(Step::TouchUp {
                finger: 1,
                x: 200.0,
                y: 400.0,
            }),
        Scenario::new("pull-to-refresh")
            .drag((400.0, 100.0), (400.0, 300.0), 10, 20)
            .step(Step::Release)
            .step(Step::Wait(REFRESH_DURATION_MS + 50)),
        Scenario::new("pull-aborted")
            .drag((400.0, 100.0), (400.0, 300.0), 10, 20)
            .step(Step::LeaveWindow),
    ]
}

/// Clock and timer source a script is replayed against.
pub enum Driver {
    /// Virtual time; waits complete instantly.
    Virtual(Runtime),
    /// Wall-clock time; waits sleep and then pump.
    Realtime(StdRuntime),
}

impl Driver {
    pub fn virtual_time() -> Self {
        Driver::Virtual(Runtime::default())
    }

    pub fn realtime() -> Self {
        Driver::Realtime(StdRuntime::new())
    }

    pub fn handle(&self) -> RuntimeHandle {
        match self {
            Driver::Virtual(runtime) => runtime.handle(),
            Driver::Realtime(runtime) => runtime.runtime_handle(),
        }
    }

    pub fn now_ms(&self) -> i64 {
        match self {
            Driver::Virtual(runtime) => runtime.now_ms(),
            Driver::Realtime(runtime) => runtime.now_ms(),
        }
    }

    fn wait(&self, delay_ms: i64) {
        match self {
            Driver::Virtual(runtime) => runtime.advance_by(delay_ms),
            Driver::Realtime(runtime) => {
                std::thread::sleep(std::time::Duration::from_millis(delay_ms.max(0) as u64));
                runtime.pump();
            }
        }
    }

    fn pump(&self) {
        match self {
            Driver::Virtual(runtime) => runtime.drain_ui(),
            Driver::Realtime(runtime) => runtime.pump(),
        }
    }
}

/// Builds a surface with every recogniser attached, logging callbacks.
pub fn demo_surface(runtime: RuntimeHandle) -> anyhow::Result<GestureSurface> {
    let haptics: Rc<dyn gestura_ui::HapticFeedback> =
        Rc::new(|kind: HapticKind| log::info!("haptic pulse: {kind:?}"));
    let surface = GestureSurface::new(runtime.clone()).with_haptics(haptics);

    surface.attach_swipe(
        SwipeConfig::default(),
        SwipeHandlers::new().on_swipe(|direction, velocity| {
            log::info!("swipe {direction:?} at {velocity:.2} px/ms")
        }),
    )?;
    surface.attach_long_press(
        LongPressConfig::default(),
        LongPressCallbacks::new()
            .on_start(|event| log::info!("press started at {:?}", event.position()))
            .on_cancel(|reason| log::info!("press cancelled: {reason:?}"))
            .on_long_press(|event| log::info!("long press at {:?}", event.position())),
    )?;
    surface.attach_pinch(
        PinchHandlers::new()
            .on_pinch_start(|distance| log::info!("pinch started, {distance:.1} px apart"))
            .on_pinch(|gesture| log::debug!("pinch scale {:.2}", gesture.scale))
            .on_pinch_end(|| log::info!("pinch ended")),
    )?;
    let scroll: Rc<dyn gestura_ui::ScrollContainer> = Rc::new(|| 0.0f32);
    surface.attach_pull_to_refresh(
        PullToRefreshConfig::default(),
        scroll,
        PullCallbacks::new(move || {
            let delay = runtime.delay(REFRESH_DURATION_MS);
            async move {
                let finished_at = delay.await;
                log::info!("content reloaded at t={finished_at}");
                Ok::<(), RefreshError>(())
            }
        })
        .on_refreshing_changed(|refreshing| log::info!("refreshing: {refreshing}")),
    )?;
    surface.attach_swipe_to_dismiss(
        SwipeToDismissConfig::default(),
        DismissCallbacks::new().on_dismiss(|direction| log::info!("dismissed {direction:?}")),
    )?;
    Ok(surface)
}

fn to_input(
    platform: &mut DesktopWinitPlatform,
    step: Step,
    time_ms: i64,
) -> Option<PointerInput> {
    match step {
        Step::Press { x, y } => {
            platform.cursor_moved(PhysicalPosition::new(x, y), time_ms);
            platform.mouse_input(ElementState::Pressed, PointerButton::Primary, time_ms)
        }
        Step::MoveTo { x, y } => Some(platform.cursor_moved(PhysicalPosition::new(x, y), time_ms)),
        Step::Release => {
            platform.mouse_input(ElementState::Released, PointerButton::Primary, time_ms)
        }
        Step::LeaveWindow => platform.cursor_left(time_ms),
        Step::TouchDown { finger, x, y } => Some(platform.touch(
            PointerPhase::Start,
            finger,
            PhysicalPosition::new(x, y),
            time_ms,
        )),
        Step::TouchMove { finger, x, y } => Some(platform.touch(
            PointerPhase::Move,
            finger,
            PhysicalPosition::new(x, y),
            time_ms,
        )),
        Step::TouchUp { finger, x, y } => Some(platform.touch(
            PointerPhase::End,
            finger,
            PhysicalPosition::new(x, y),
            time_ms,
        )),
        Step::Wait(_) => None,
    }
}

/// Replays `scenario` against `surface` and returns the gestures it queued.
pub fn replay(
    driver: &Driver,
    surface: &GestureSurface,
    scenario: &Scenario,
) -> anyhow::Result<Vec<GestureEvent>> {
    log::info!("--- {} ---", scenario.name);
    let mut platform = DesktopWinitPlatform::new(SCALE_FACTOR);
    for step in &scenario.steps {
        if let Step::Wait(delay_ms) = step {
            driver.wait(*delay_ms);
            continue;
        }
        if let Some(input) = to_input(&mut platform, *step, driver.now_ms()) {
            let consumed = surface.dispatch(input)?;
            if consumed {
                log::trace!("input consumed by a recogniser");
            }
        }
        driver.pump();
    }
    let events = surface.drain_events();
    for event in events.iter().filter(|event| !event.is_continuous()) {
        log::debug!("queued {event:?}");
    }
    surface.reset();
    Ok(events)
}

#[cfg(test)]
#[path = "tests/scenario_tests.rs"]
mod tests;
