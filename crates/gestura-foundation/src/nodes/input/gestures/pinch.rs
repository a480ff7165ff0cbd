//! Two-contact pinch detection.

use std::rc::Rc;

use gestura_core::GestureError;
use gestura_geometry::{center, distance, Point};

use crate::nodes::input::types::{PointerEvent, PointerPhase};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchGesture {
    /// Current distance over initial distance. Always positive.
    pub scale: f32,
    pub center: Point,
    pub distance: f32,
    pub initial_distance: f32,
}

/// Distance and midpoint of exactly two contacts.
pub fn pinch_geometry(contacts: &[Point]) -> Result<(f32, Point), GestureError> {
    match contacts {
        [first, second] => Ok((distance(*first, *second), center(*first, *second))),
        _ => Err(GestureError::ContactCount {
            expected: 2,
            actual: contacts.len(),
        }),
    }
}

/// Captures the initial separation of two contacts and reports scale
/// changes relative to it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PinchDetector {
    initial_distance: Option<f32>,
}

impl PinchDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a pinch. Returns the captured initial distance.
    pub fn begin(&mut self, contacts: &[Point]) -> Result<f32, GestureError> {
        let (initial, _) = pinch_geometry(contacts)?;
        if !(initial.is_finite() && initial > 0.0) {
            return Err(GestureError::DegenerateContacts);
        }
        log::debug!("pinch began at distance {initial}");
        self.initial_distance = Some(initial);
        Ok(initial)
    }

    /// Scale relative to the captured distance. Contacts that coincide
    /// mid-pinch are `DegenerateContacts`; the pinch stays active.
    pub fn update(&self, contacts: &[Point]) -> Result<PinchGesture, GestureError> {
        let initial_distance = self.initial_distance.ok_or(GestureError::NotStarted {
            detector: "PinchDetector",
        })?;
        let (distance, center) = pinch_geometry(contacts)?;
        if !(distance.is_finite() && distance > 0.0) {
            return Err(GestureError::DegenerateContacts);
        }
        Ok(PinchGesture {
            scale: distance / initial_distance,
            center,
            distance,
            initial_distance,
        })
    }

    pub fn end(&mut self) {
        if self.initial_distance.take().is_some() {
            log::debug!("pinch ended");
        }
    }

    pub fn is_active(&self) -> bool {
        self.initial_distance.is_some()
    }

    pub fn initial_distance(&self) -> Option<f32> {
        self.initial_distance
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PinchUpdate {
    Started { initial_distance: f32 },
    Changed(PinchGesture),
    Ended,
}

/// Drives a [`PinchDetector`] from the event stream.
///
/// A pinch starts on the first sample carrying two contacts and ends on the
/// first sample that does not, or on `End`/`Cancel`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PinchTracker {
    detector: PinchDetector,
}

impl PinchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.detector.is_active()
    }

    pub fn reset(&mut self) {
        self.detector.end();
    }

    pub fn on_event(&mut self, event: &PointerEvent) -> Result<Option<PinchUpdate>, GestureError> {
        let terminal = matches!(event.phase, PointerPhase::End | PointerPhase::Cancel);
        if terminal || event.contact_count() != 2 {
            if self.detector.is_active() {
                self.detector.end();
                return Ok(Some(PinchUpdate::Ended));
            }
            return Ok(None);
        }

        let contacts = event.contact_positions();
        if self.detector.is_active() {
            return match self.detector.update(&contacts) {
                Ok(gesture) => Ok(Some(PinchUpdate::Changed(gesture))),
                Err(GestureError::DegenerateContacts) => {
                    log::trace!("pinch sample skipped: contacts coincide");
                    Ok(None)
                }
                Err(err) => Err(err),
            };
        }
        match self.detector.begin(&contacts) {
            Ok(initial_distance) => Ok(Some(PinchUpdate::Started { initial_distance })),
            // Two fingers landing on the same spot: wait for them to separate.
            Err(GestureError::DegenerateContacts) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[derive(Clone, Default)]
pub struct PinchHandlers {
    on_pinch_start: Option<Rc<dyn Fn(f32)>>,
    on_pinch: Option<Rc<dyn Fn(&PinchGesture)>>,
    on_pinch_end: Option<Rc<dyn Fn()>>,
}

impl PinchHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receives the initial contact distance.
    pub fn on_pinch_start(mut self, handler: impl Fn(f32) + 'static) -> Self {
        self.on_pinch_start = Some(Rc::new(handler));
        self
    }

    pub fn on_pinch(mut self, handler: impl Fn(&PinchGesture) + 'static) -> Self {
        self.on_pinch = Some(Rc::new(handler));
        self
    }

    pub fn on_pinch_end(mut self, handler: impl Fn() + 'static) -> Self {
        self.on_pinch_end = Some(Rc::new(handler));
        self
    }

    pub fn dispatch(&self, update: &PinchUpdate) {
        match update {
            PinchUpdate::Started { initial_distance } => {
                if let Some(handler) = &self.on_pinch_start {
                    handler(*initial_distance);
                }
            }
            PinchUpdate::Changed(gesture) => {
                if let Some(handler) = &self.on_pinch {
                    handler(gesture);
                }
            }
            PinchUpdate::Ended => {
                if let Some(handler) = &self.on_pinch_end {
                    handler();
                }
            }
        }
    }
}

impl std::fmt::Debug for PinchHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinchHandlers")
            .field("on_pinch_start", &self.on_pinch_start.is_some())
            .field("on_pinch", &self.on_pinch.is_some())
            .field("on_pinch_end", &self.on_pinch_end.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/pinch_tests.rs"]
mod tests;
