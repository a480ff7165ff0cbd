//! Browser input adapter for Gestura.
//!
//! Converts DOM mouse, touch and pointer events into [`PointerInput`]. DOM
//! offsets are already CSS pixels, so positions are used as-is.

use gestura_foundation::{Contact, PointerButton, PointerButtons, PointerInput, PointerPhase};
use gestura_geometry::Point;
use smallvec::SmallVec;
use wasm_bindgen::JsCast;

#[derive(Debug, Clone, Copy, Default)]
pub struct WebPlatform {
    // Top-left of the target element in client coordinates.
    origin: Point,
}

impl WebPlatform {
    pub fn new() -> Self {
        Self {
            origin: Point::ZERO,
        }
    }

    /// Client position of the element receiving touches. Touch coordinates
    /// are client-relative, unlike mouse offsets.
    pub fn set_origin(&mut self, left: f64, top: f64) {
        self.origin = Point::new(left as f32, top as f32);
    }

    pub fn pointer_position(&self, x: f64, y: f64) -> Point {
        Point::new(x as f32, y as f32)
    }

    fn client_position(&self, x: f64, y: f64) -> Point {
        self.pointer_position(x, y) - self.origin
    }

    pub fn mouse_input(
        &self,
        phase: PointerPhase,
        x: f64,
        y: f64,
        buttons: u16,
        time_stamp: f64,
    ) -> PointerInput {
        PointerInput::Mouse {
            phase,
            position: self.pointer_position(x, y),
            buttons: buttons_from_mask(buttons),
            time_ms: timestamp_ms(time_stamp),
        }
    }

    /// `touches` are `(identifier, client_x, client_y)`.
    pub fn touch_input(
        &self,
        phase: PointerPhase,
        touches: impl IntoIterator<Item = (i32, f64, f64)>,
        time_stamp: f64,
    ) -> PointerInput {
        let contacts: SmallVec<[Contact; 2]> = touches
            .into_iter()
            .map(|(id, x, y)| Contact::new(u64::from(id as u32), self.client_position(x, y)))
            .collect();
        PointerInput::Touch {
            phase,
            contacts,
            time_ms: timestamp_ms(time_stamp),
        }
    }

    pub fn mouse_event(&self, phase: PointerPhase, event: &web_sys::MouseEvent) -> PointerInput {
        self.mouse_input(
            phase,
            f64::from(event.offset_x()),
            f64::from(event.offset_y()),
            event.buttons(),
            event.time_stamp(),
        )
    }

    /// Start and move report every finger still down; end and cancel report
    /// the fingers that lifted.
    pub fn touch_event(&self, phase: PointerPhase, event: &web_sys::TouchEvent) -> PointerInput {
        let list = match phase {
            PointerPhase::Start | PointerPhase::Move => event.touches(),
            PointerPhase::End | PointerPhase::Cancel => event.changed_touches(),
        };
        let touches = (0..list.length()).filter_map(|index| list.get(index)).map(|touch| {
            (
                touch.identifier(),
                f64::from(touch.client_x()),
                f64::from(touch.client_y()),
            )
        });
        self.touch_input(phase, touches, event.time_stamp())
    }

    /// Pen pointers keep their pressure; touch pointers become single-contact
    /// touch input; everything else is treated as a mouse.
    pub fn pointer_event(
        &self,
        phase: PointerPhase,
        event: &web_sys::PointerEvent,
    ) -> PointerInput {
        match event.pointer_type().as_str() {
            "pen" => PointerInput::Pen {
                phase,
                position: self.pointer_position(
                    f64::from(event.offset_x()),
                    f64::from(event.offset_y()),
                ),
                pressure: event.pressure(),
                time_ms: timestamp_ms(event.time_stamp()),
            },
            "touch" => self.touch_input(
                phase,
                [(
                    event.pointer_id(),
                    f64::from(event.client_x()),
                    f64::from(event.client_y()),
                )],
                event.time_stamp(),
            ),
            _ => self.mouse_event(phase, event),
        }
    }

    /// Converts any supported DOM event, picking the shape from its type.
    pub fn dom_event(&self, event: &web_sys::Event) -> Option<PointerInput> {
        let phase = phase_for_event_type(&event.type_())?;
        if let Some(pointer) = event.dyn_ref::<web_sys::PointerEvent>() {
            Some(self.pointer_event(phase, pointer))
        } else if let Some(touch) = event.dyn_ref::<web_sys::TouchEvent>() {
            Some(self.touch_event(phase, touch))
        } else {
            event
                .dyn_ref::<web_sys::MouseEvent>()
                .map(|mouse| self.mouse_event(phase, mouse))
        }
    }
}

/// Maps a DOM event type to a pointer phase.
pub fn phase_for_event_type(event_type: &str) -> Option<PointerPhase> {
    match event_type {
        "mousedown" | "touchstart" | "pointerdown" => Some(PointerPhase::Start),
        "mousemove" | "touchmove" | "pointermove" => Some(PointerPhase::Move),
        "mouseup" | "touchend" | "pointerup" => Some(PointerPhase::End),
        "touchcancel" | "pointercancel" | "mouseleave" | "pointerleave" => {
            Some(PointerPhase::Cancel)
        }
        _ => None,
    }
}

/// Decodes the DOM `buttons` bitmask.
pub fn buttons_from_mask(mask: u16) -> PointerButtons {
    const BITS: [(u16, PointerButton); 5] = [
        (1, PointerButton::Primary),
        (2, PointerButton::Secondary),
        (4, PointerButton::Middle),
        (8, PointerButton::Back),
        (16, PointerButton::Forward),
    ];
    BITS.iter()
        .filter(|(bit, _)| mask & bit != 0)
        .fold(PointerButtons::NONE, |buttons, (_, button)| buttons.with(*button))
}

fn timestamp_ms(time_stamp: f64) -> i64 {
    if time_stamp.is_finite() {
        time_stamp.round() as i64
    } else {
        0
    }
}

#[cfg(test)]
#[path = "tests/web_tests.rs"]
mod tests;
