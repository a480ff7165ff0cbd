//! Robot-style driver for gesture surfaces.
//!
//! A [`GestureRobot`] owns a virtual-time [`Runtime`] and a
//! [`GestureSurface`] bound to it, and injects pointer traces stamped with
//! the runtime clock. Time only moves when the robot is told to move it.
//!
//! # Example
//!
//! ```
//! use gestura_testing::GestureRobot;
//! use gestura_ui::{GestureEvent, SwipeConfig, SwipeDirection, SwipeHandlers};
//!
//! let mut robot = GestureRobot::new();
//! robot
//!     .surface()
//!     .attach_swipe(SwipeConfig::default(), SwipeHandlers::new())
//!     .unwrap();
//!
//! robot.swipe((10.0, 10.0), (200.0, 12.0), 120);
//!
//! match robot.surface().poll_event() {
//!     Some(GestureEvent::Swipe(gesture)) => assert_eq!(gesture.direction, SwipeDirection::Right),
//!     other => panic!("expected a swipe, got {other:?}"),
//! }
//! ```

use std::rc::Rc;

use gestura_core::Runtime;
use gestura_foundation::{Contact, HapticFeedback, PointerEvent, PointerPhase};
use gestura_geometry::{lerp, Point};
use gestura_ui::GestureSurface;
use smallvec::SmallVec;

/// Upper bound on timer firings processed by one `wait_for_idle`.
const MAX_IDLE_STEPS: usize = 10_000;

/// Number of intermediate moves in a scripted trace.
const TRACE_STEPS: usize = 10;

pub struct GestureRobot {
    runtime: Runtime,
    surface: GestureSurface,
    contacts: SmallVec<[Contact; 2]>,
}

impl GestureRobot {
    pub fn new() -> Self {
        let runtime = Runtime::default();
        let surface = GestureSurface::new(runtime.handle());
        Self {
            runtime,
            surface,
            contacts: SmallVec::new(),
        }
    }

    /// New robot whose surface reports haptics to `haptics`.
    pub fn with_haptics(haptics: Rc<dyn HapticFeedback>) -> Self {
        let runtime = Runtime::default();
        let surface = GestureSurface::new(runtime.handle()).with_haptics(haptics);
        Self::with_surface(runtime, surface)
    }

    /// Drives an existing surface bound to `runtime`.
    pub fn with_surface(runtime: Runtime, surface: GestureSurface) -> Self {
        Self {
            runtime,
            surface,
            contacts: SmallVec::new(),
        }
    }

    pub fn surface(&self) -> &GestureSurface {
        &self.surface
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn now_ms(&self) -> i64 {
        self.runtime.now_ms()
    }

    /// Whether any finger is currently down.
    pub fn is_pressed(&self) -> bool {
        !self.contacts.is_empty()
    }

    fn send(&self, phase: PointerPhase, contacts: &[Contact]) -> bool {
        let event =
            PointerEvent::with_contacts(phase, contacts.iter().copied(), self.runtime.now_ms());
        match self.surface.handle_event(&event) {
            Ok(consumed) => consumed,
            Err(err) => {
                log::warn!("robot event rejected: {err}");
                false
            }
        }
    }

    /// Puts one finger down. Returns whether the surface consumed the event.
    pub fn press(&mut self, x: f32, y: f32) -> bool {
        self.contacts.clear();
        self.contacts.push(Contact::new(0, Point::new(x, y)));
        let contacts = self.contacts.clone();
        self.send(PointerPhase::Start, &contacts)
    }

    /// Puts a second finger down next to the first.
    pub fn press_second(&mut self, x: f32, y: f32) -> bool {
        self.contacts.truncate(1);
        self.contacts.push(Contact::new(1, Point::new(x, y)));
        let contacts = self.contacts.clone();
        self.send(PointerPhase::Start, &contacts)
    }

    /// Moves the primary finger.
    pub fn move_to(&mut self, x: f32, y: f32) -> bool {
        let Some(primary) = self.contacts.first_mut() else {
            log::warn!("move_to without a pressed contact");
            return false;
        };
        primary.position = Point::new(x, y);
        let contacts = self.contacts.clone();
        self.send(PointerPhase::Move, &contacts)
    }

    /// Moves both fingers of a two-finger contact.
    pub fn move_both(&mut self, first: (f32, f32), second: (f32, f32)) -> bool {
        self.contacts.clear();
        self.contacts.push(Contact::new(0, Point::new(first.0, first.1)));
        self.contacts.push(Contact::new(1, Point::new(second.0, second.1)));
        let contacts = self.contacts.clone();
        self.send(PointerPhase::Move, &contacts)
    }

    /// Lifts every finger.
    pub fn release(&mut self) -> bool {
        let lifted = std::mem::take(&mut self.contacts);
        self.send(PointerPhase::End, &lifted)
    }

    pub fn cancel(&mut self) -> bool {
        let lifted = std::mem::take(&mut self.contacts);
        self.send(PointerPhase::Cancel, &lifted)
    }

    /// Advances virtual time, firing due timers and polling tasks.
    pub fn advance_time(&mut self, delta_ms: i64) {
        self.runtime.advance_by(delta_ms);
    }

    /// Fires pending timers until none remain or the step budget runs out.
    pub fn wait_for_idle(&mut self) {
        self.runtime.drain_ui();
        for _ in 0..MAX_IDLE_STEPS {
            match self.runtime.next_timer_due_ms() {
                Some(due) => self.runtime.advance_to(due),
                None => return,
            }
        }
        log::warn!("runtime still busy after {MAX_IDLE_STEPS} timer firings");
    }

    /// Press, move in even steps across `duration_ms`, release.
    pub fn swipe(&mut self, from: (f32, f32), to: (f32, f32), duration_ms: i64) {
        self.press(from.0, from.1);
        let step_ms = duration_ms / TRACE_STEPS as i64;
        let mut elapsed = 0;
        for i in 1..=TRACE_STEPS {
            let t = i as f32 / TRACE_STEPS as f32;
            let next = if i == TRACE_STEPS {
                duration_ms
            } else {
                step_ms * i as i64
            };
            self.advance_time(next - elapsed);
            elapsed = next;
            self.move_to(lerp(from.0, to.0, t), lerp(from.1, to.1, t));
        }
        self.release();
    }

    /// Same as [`swipe`](Self::swipe) but keeps the finger down at the end.
    pub fn drag_and_hold(&mut self, from: (f32, f32), to: (f32, f32), duration_ms: i64) {
        self.press(from.0, from.1);
        let step_ms = (duration_ms / TRACE_STEPS as i64).max(1);
        for i in 1..=TRACE_STEPS {
            let t = i as f32 / TRACE_STEPS as f32;
            self.advance_time(step_ms);
            self.move_to(lerp(from.0, to.0, t), lerp(from.1, to.1, t));
        }
    }

    /// Holds one finger still for `hold_ms`, then releases.
    pub fn long_press(&mut self, x: f32, y: f32, hold_ms: i64) {
        self.press(x, y);
        self.advance_time(hold_ms);
        self.release();
    }

    /// Two fingers centred on `center`, spreading horizontally from
    /// `from_distance` to `to_distance` apart, then both lift.
    pub fn pinch(&mut self, center: (f32, f32), from_distance: f32, to_distance: f32) {
        let half = from_distance / 2.0;
        self.press(center.0 - half, center.1);
        self.press_second(center.0 + half, center.1);
        for i in 1..=TRACE_STEPS {
            let t = i as f32 / TRACE_STEPS as f32;
            let half = lerp(from_distance, to_distance, t) / 2.0;
            self.advance_time(16);
            self.move_both((center.0 - half, center.1), (center.0 + half, center.1));
        }
        self.release();
    }
}

impl Default for GestureRobot {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GestureRobot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureRobot")
            .field("now_ms", &self.now_ms())
            .field("contacts", &self.contacts)
            .field("surface", &self.surface)
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/robot_tests.rs"]
mod tests;
