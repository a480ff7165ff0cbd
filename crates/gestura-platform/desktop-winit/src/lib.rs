//! Desktop input adapter for Gestura.
//!
//! winit reports physical pixels; recognisers work in logical pixels, so
//! every position is divided by the window scale factor.

use gestura_foundation::{
    Contact, PointerButton, PointerButtons, PointerId, PointerInput, PointerPhase,
};
use gestura_geometry::Point;
use smallvec::SmallVec;
use winit::dpi::PhysicalPosition;
use winit::event::ElementState;

pub use winit;

pub struct DesktopWinitPlatform {
    scale_factor: f64,
    cursor: Point,
    buttons: PointerButtons,
    fingers: SmallVec<[Contact; 2]>,
}

impl DesktopWinitPlatform {
    pub fn new(scale_factor: f64) -> Self {
        Self {
            scale_factor,
            cursor: Point::ZERO,
            buttons: PointerButtons::NONE,
            fingers: SmallVec::new(),
        }
    }

    pub fn set_scale_factor(&mut self, factor: f64) {
        if factor.is_finite() && factor > 0.0 {
            self.scale_factor = factor;
        } else {
            log::warn!("ignoring scale factor {factor}");
        }
    }

    pub fn pointer_position(&self, position: PhysicalPosition<f64>) -> Point {
        Point {
            x: (position.x / self.scale_factor) as f32,
            y: (position.y / self.scale_factor) as f32,
        }
    }

    fn mouse(&self, phase: PointerPhase, time_ms: i64) -> PointerInput {
        PointerInput::Mouse {
            phase,
            position: self.cursor,
            buttons: self.buttons,
            time_ms,
        }
    }

    /// Cursor motion. Reported as a move whether or not a button is held;
    /// recognisers ignore moves outside a press.
    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>, time_ms: i64) -> PointerInput {
        self.cursor = self.pointer_position(position);
        self.mouse(PointerPhase::Move, time_ms)
    }

    /// Button transitions. Only the primary button starts and ends gestures;
    /// other buttons update the held-buttons mask and yield nothing.
    pub fn mouse_input(
        &mut self,
        state: ElementState,
        button: PointerButton,
        time_ms: i64,
    ) -> Option<PointerInput> {
        let was_down = self.buttons.contains(PointerButton::Primary);
        match state {
            ElementState::Pressed => self.buttons.insert(button),
            ElementState::Released => self.buttons.remove(button),
        }
        if button != PointerButton::Primary {
            return None;
        }
        match (state, was_down) {
            (ElementState::Pressed, false) => Some(self.mouse(PointerPhase::Start, time_ms)),
            (ElementState::Released, true) => Some(self.mouse(PointerPhase::End, time_ms)),
            _ => None,
        }
    }

    /// Leaving the window mid-press cancels the gesture.
    pub fn cursor_left(&mut self, time_ms: i64) -> Option<PointerInput> {
        if !self.buttons.contains(PointerButton::Primary) {
            return None;
        }
        self.buttons = PointerButtons::NONE;
        Some(self.mouse(PointerPhase::Cancel, time_ms))
    }

    /// One finger changed. Start and move report every finger still down;
    /// end and cancel report only the finger that lifted.
    pub fn touch(
        &mut self,
        phase: PointerPhase,
        finger: PointerId,
        position: PhysicalPosition<f64>,
        time_ms: i64,
    ) -> PointerInput {
        let contact = Contact::new(finger, self.pointer_position(position));
        let existing = self.fingers.iter().position(|c| c.id == finger);
        let contacts = match phase {
            PointerPhase::Start | PointerPhase::Move => {
                match existing {
                    Some(index) => self.fingers[index] = contact,
                    None => self.fingers.push(contact),
                }
                self.fingers.clone()
            }
            PointerPhase::End | PointerPhase::Cancel => {
                if let Some(index) = existing {
                    self.fingers.remove(index);
                }
                SmallVec::from_slice(&[contact])
            }
        };
        PointerInput::Touch {
            phase,
            contacts,
            time_ms,
        }
    }

    pub fn active_fingers(&self) -> usize {
        self.fingers.len()
    }
}

impl Default for DesktopWinitPlatform {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
#[path = "tests/desktop_tests.rs"]
mod tests;
