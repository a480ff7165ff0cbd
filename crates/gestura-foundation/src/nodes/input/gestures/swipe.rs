//! Swipe classification.
//!
//! [`classify_swipe`] is a pure function of two timestamped points.
//! [`SwipeDetector`] wraps it for a live event stream and [`SwipeHandlers`]
//! fans a recognised swipe out to the generic and directional callbacks.

use std::rc::Rc;

use gestura_geometry::{distance, TouchPoint};

use crate::config::SwipeConfig;
use crate::nodes::input::types::{PointerEvent, PointerPhase};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl SwipeDirection {
    pub fn is_horizontal(self) -> bool {
        matches!(self, SwipeDirection::Left | SwipeDirection::Right)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeGesture {
    pub direction: SwipeDirection,
    pub distance: f32,
    /// Average speed in px/ms.
    pub velocity: f32,
    pub duration_ms: i64,
    pub start: TouchPoint,
    pub end: TouchPoint,
}

/// Classifies the motion from `start` to `end`.
///
/// Returns `None` when the motion is too slow, too short, took too long or
/// has no dominant axis. Never fails.
///
/// Zero travel is never a swipe, even with `threshold` set to `0.0`: a
/// motionless trace has no direction to report.
pub fn classify_swipe(
    start: TouchPoint,
    end: TouchPoint,
    config: &SwipeConfig,
) -> Option<SwipeGesture> {
    let duration_ms = end.time_ms - start.time_ms;
    if duration_ms <= 0 || duration_ms > config.time_threshold_ms {
        log::trace!("swipe rejected: duration {duration_ms}ms");
        return None;
    }

    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let travelled = distance(start, end);
    if !travelled.is_finite() || travelled == 0.0 || travelled < config.threshold {
        log::trace!("swipe rejected: distance {travelled}");
        return None;
    }

    let velocity = travelled / duration_ms as f32;
    if velocity < config.velocity_threshold {
        log::trace!("swipe rejected: velocity {velocity}");
        return None;
    }

    let ratio = config.directional_threshold;
    let direction = if dx.abs() > dy.abs() {
        if dx.abs() < ratio * dy.abs() {
            log::trace!("swipe rejected: diagonal ({dx}, {dy})");
            return None;
        }
        if dx > 0.0 {
            SwipeDirection::Right
        } else {
            SwipeDirection::Left
        }
    } else {
        if dy.abs() < ratio * dx.abs() {
            log::trace!("swipe rejected: diagonal ({dx}, {dy})");
            return None;
        }
        if dy > 0.0 {
            SwipeDirection::Down
        } else {
            SwipeDirection::Up
        }
    };

    Some(SwipeGesture {
        direction,
        distance: travelled,
        velocity,
        duration_ms,
        start,
        end,
    })
}

/// Tracks one single-contact cycle from `Start` to `End`.
///
/// A second contact or a `Cancel` discards the cycle.
#[derive(Clone, Debug, Default)]
pub struct SwipeDetector {
    config: SwipeConfig,
    start: Option<TouchPoint>,
    last: Option<TouchPoint>,
}

impl SwipeDetector {
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            start: None,
            last: None,
        }
    }

    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }

    pub fn start_point(&self) -> Option<TouchPoint> {
        self.start
    }

    pub fn reset(&mut self) {
        self.start = None;
        self.last = None;
    }

    pub fn on_event(&mut self, event: &PointerEvent) -> Option<SwipeGesture> {
        match event.phase {
            PointerPhase::Start => {
                if event.contact_count() == 1 {
                    let point = event.touch_point();
                    self.start = Some(point);
                    self.last = Some(point);
                } else {
                    self.reset();
                }
                None
            }
            PointerPhase::Move => {
                if self.start.is_some() {
                    if event.contact_count() > 1 {
                        self.reset();
                    } else if event.contact_count() == 1 {
                        self.last = Some(event.touch_point());
                    }
                }
                None
            }
            PointerPhase::End => {
                let start = self.start.take()?;
                let last = self.last.take();
                // Lifted contacts may be missing; fall back to the last seen position.
                let end = if event.contact_count() > 0 {
                    event.touch_point()
                } else {
                    TouchPoint::at(last.unwrap_or(start).position(), event.time_ms)
                };
                classify_swipe(start, end, &self.config)
            }
            PointerPhase::Cancel => {
                self.reset();
                None
            }
        }
    }
}

type SwipeCallback = Rc<dyn Fn(SwipeDirection, f32)>;
type DirectionalCallback = Rc<dyn Fn(&SwipeGesture)>;

/// Generic and directional swipe callbacks.
#[derive(Clone, Default)]
pub struct SwipeHandlers {
    on_swipe: Option<SwipeCallback>,
    on_swipe_left: Option<DirectionalCallback>,
    on_swipe_right: Option<DirectionalCallback>,
    on_swipe_up: Option<DirectionalCallback>,
    on_swipe_down: Option<DirectionalCallback>,
}

impl SwipeHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_swipe(mut self, handler: impl Fn(SwipeDirection, f32) + 'static) -> Self {
        self.on_swipe = Some(Rc::new(handler));
        self
    }

    pub fn on_swipe_left(mut self, handler: impl Fn(&SwipeGesture) + 'static) -> Self {
        self.on_swipe_left = Some(Rc::new(handler));
        self
    }

    pub fn on_swipe_right(mut self, handler: impl Fn(&SwipeGesture) + 'static) -> Self {
        self.on_swipe_right = Some(Rc::new(handler));
        self
    }

    pub fn on_swipe_up(mut self, handler: impl Fn(&SwipeGesture) + 'static) -> Self {
        self.on_swipe_up = Some(Rc::new(handler));
        self
    }

    pub fn on_swipe_down(mut self, handler: impl Fn(&SwipeGesture) + 'static) -> Self {
        self.on_swipe_down = Some(Rc::new(handler));
        self
    }

    /// Invokes the generic handler, then the one matching the direction.
    pub fn dispatch(&self, gesture: &SwipeGesture) {
        if let Some(handler) = &self.on_swipe {
            handler(gesture.direction, gesture.velocity);
        }
        let directional = match gesture.direction {
            SwipeDirection::Left => &self.on_swipe_left,
            SwipeDirection::Right => &self.on_swipe_right,
            SwipeDirection::Up => &self.on_swipe_up,
            SwipeDirection::Down => &self.on_swipe_down,
        };
        if let Some(handler) = directional {
            handler(gesture);
        }
    }
}

impl std::fmt::Debug for SwipeHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwipeHandlers")
            .field("on_swipe", &self.on_swipe.is_some())
            .field("on_swipe_left", &self.on_swipe_left.is_some())
            .field("on_swipe_right", &self.on_swipe_right.is_some())
            .field("on_swipe_up", &self.on_swipe_up.is_some())
            .field("on_swipe_down", &self.on_swipe_down.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/swipe_tests.rs"]
mod tests;
