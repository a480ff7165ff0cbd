//! Swipe-to-dismiss controller.
//!
//! Reports the live horizontal offset while dragging and dismisses on a
//! horizontal swipe. Dismissal is terminal until [`SwipeToDismissController::reset`].

use std::rc::Rc;

use gestura_core::GestureError;

use super::swipe::{SwipeDetector, SwipeDirection};
use crate::config::SwipeToDismissConfig;
use crate::nodes::input::types::{PointerEvent, PointerPhase};

const CONTROLLER: &str = "SwipeToDismissController";

#[derive(Clone, Default)]
pub struct DismissCallbacks {
    on_drag_delta: Option<Rc<dyn Fn(f32)>>,
    on_dismiss: Option<Rc<dyn Fn(SwipeDirection)>>,
}

impl DismissCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signed horizontal offset from the gesture start. Reports `0.0` when a
    /// drag ends without dismissing.
    pub fn on_drag_delta(mut self, handler: impl Fn(f32) + 'static) -> Self {
        self.on_drag_delta = Some(Rc::new(handler));
        self
    }

    pub fn on_dismiss(mut self, handler: impl Fn(SwipeDirection) + 'static) -> Self {
        self.on_dismiss = Some(Rc::new(handler));
        self
    }

    pub fn notify_drag_delta(&self, delta: f32) {
        if let Some(handler) = &self.on_drag_delta {
            handler(delta);
        }
    }

    pub fn notify_dismiss(&self, direction: SwipeDirection) {
        if let Some(handler) = &self.on_dismiss {
            handler(direction);
        }
    }
}

impl std::fmt::Debug for DismissCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DismissCallbacks")
            .field("on_drag_delta", &self.on_drag_delta.is_some())
            .field("on_dismiss", &self.on_dismiss.is_some())
            .finish()
    }
}

#[derive(Debug)]
pub struct SwipeToDismissController {
    config: SwipeToDismissConfig,
    detector: SwipeDetector,
    callbacks: DismissCallbacks,
    dismissed: Option<SwipeDirection>,
    disposed: bool,
}

impl SwipeToDismissController {
    pub fn new(config: SwipeToDismissConfig, callbacks: DismissCallbacks) -> Self {
        Self {
            config,
            detector: SwipeDetector::new(config.swipe),
            callbacks,
            dismissed: None,
            disposed: false,
        }
    }

    pub fn config(&self) -> &SwipeToDismissConfig {
        &self.config
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed.is_some()
    }

    pub fn dismissed_direction(&self) -> Option<SwipeDirection> {
        self.dismissed
    }

    /// Current offset of an in-flight drag, if any.
    pub fn drag_delta(&self, event: &PointerEvent) -> Option<f32> {
        self.detector
            .start_point()
            .map(|start| event.position().x - start.x)
    }

    /// Feeds one event. Returns the direction when this event dismissed.
    pub fn handle(&mut self, event: &PointerEvent) -> Result<Option<SwipeDirection>, GestureError> {
        if self.disposed {
            return Err(GestureError::Disposed {
                controller: CONTROLLER,
            });
        }
        if self.dismissed.is_some() {
            log::trace!("dismissed; {:?} ignored", event.phase);
            return Ok(None);
        }

        match event.phase {
            PointerPhase::Start => {
                self.detector.on_event(event);
                Ok(None)
            }
            PointerPhase::Move => {
                self.detector.on_event(event);
                if let Some(delta) = self.drag_delta(event) {
                    self.callbacks.notify_drag_delta(delta);
                }
                Ok(None)
            }
            PointerPhase::End => {
                let was_tracking = self.detector.is_tracking();
                let swipe = self.detector.on_event(event);
                match swipe {
                    Some(gesture) if gesture.direction.is_horizontal() => {
                        self.dismissed = Some(gesture.direction);
                        log::debug!("dismissed {:?}", gesture.direction);
                        self.callbacks.notify_dismiss(gesture.direction);
                        Ok(Some(gesture.direction))
                    }
                    _ => {
                        if was_tracking {
                            self.callbacks.notify_drag_delta(0.0);
                        }
                        Ok(None)
                    }
                }
            }
            PointerPhase::Cancel => {
                let was_tracking = self.detector.is_tracking();
                self.detector.on_event(event);
                if was_tracking {
                    self.callbacks.notify_drag_delta(0.0);
                }
                Ok(None)
            }
        }
    }

    /// Clears the dismissed state and any in-flight drag.
    pub fn reset(&mut self) {
        self.detector.reset();
        self.dismissed = None;
    }

    pub fn dispose(&mut self) {
        self.reset();
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
#[path = "tests/swipe_dismiss_tests.rs"]
mod tests;
