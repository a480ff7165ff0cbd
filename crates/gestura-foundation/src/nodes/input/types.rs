use gestura_geometry::{Point, TouchPoint};
use smallvec::{smallvec, SmallVec};
use std::cell::Cell;
use std::rc::Rc;

pub type PointerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Start,
    Move,
    End,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerSource {
    Mouse,
    Touch,
    Pen,
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary = 0,
    Secondary = 1,
    Middle = 2,
    Back = 3,
    Forward = 4,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerButtons(u8);

impl PointerButtons {
    pub const NONE: Self = Self(0);
    pub const PRIMARY: Self = Self(1 << (PointerButton::Primary as u8));

    pub fn new() -> Self {
        Self::NONE
    }

    pub fn with(mut self, button: PointerButton) -> Self {
        self.insert(button);
        self
    }

    pub fn insert(&mut self, button: PointerButton) {
        self.0 |= 1 << (button as u8);
    }

    pub fn remove(&mut self, button: PointerButton) {
        self.0 &= !(1 << (button as u8));
    }

    pub fn contains(&self, button: PointerButton) -> bool {
        (self.0 & (1 << (button as u8))) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl Default for PointerButtons {
    fn default() -> Self {
        Self::NONE
    }
}

/// One finger, stylus tip or mouse cursor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub id: PointerId,
    pub position: Point,
}

impl Contact {
    pub fn new(id: PointerId, position: Point) -> Self {
        Self { id, position }
    }
}

/// Raw input as a platform adapter delivers it.
///
/// For `Touch` the contacts are every finger currently down on `Start` and
/// `Move`, and the fingers that lifted on `End` and `Cancel`.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerInput {
    Mouse {
        phase: PointerPhase,
        position: Point,
        buttons: PointerButtons,
        time_ms: i64,
    },
    Touch {
        phase: PointerPhase,
        contacts: SmallVec<[Contact; 2]>,
        time_ms: i64,
    },
    Pen {
        phase: PointerPhase,
        position: Point,
        pressure: f32,
        time_ms: i64,
    },
}

impl PointerInput {
    pub fn phase(&self) -> PointerPhase {
        match self {
            PointerInput::Mouse { phase, .. }
            | PointerInput::Touch { phase, .. }
            | PointerInput::Pen { phase, .. } => *phase,
        }
    }

    pub fn time_ms(&self) -> i64 {
        match self {
            PointerInput::Mouse { time_ms, .. }
            | PointerInput::Touch { time_ms, .. }
            | PointerInput::Pen { time_ms, .. } => *time_ms,
        }
    }
}

/// Normalised pointer sample fed to every recogniser.
///
/// Events can be consumed by a recogniser (pull-to-refresh past its
/// suppression threshold) to tell the host that native scrolling must not
/// react to this sample. Consumption is shared across clones.
#[derive(Clone, Debug)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub source: PointerSource,
    pub contacts: SmallVec<[Contact; 2]>,
    pub buttons: PointerButtons,
    pub time_ms: i64,
    /// Shared via Rc<Cell> so consumption can be tracked across copies.
    consumed: Rc<Cell<bool>>,
}

impl PointerEvent {
    /// Single-contact event, the shape produced by a mouse or a lone finger.
    pub fn new(phase: PointerPhase, position: Point, time_ms: i64) -> Self {
        Self {
            phase,
            source: PointerSource::Touch,
            contacts: smallvec![Contact::new(0, position)],
            buttons: PointerButtons::NONE,
            time_ms,
            consumed: Rc::new(Cell::new(false)),
        }
    }

    pub fn with_contacts(
        phase: PointerPhase,
        contacts: impl IntoIterator<Item = Contact>,
        time_ms: i64,
    ) -> Self {
        Self {
            phase,
            source: PointerSource::Touch,
            contacts: contacts.into_iter().collect(),
            buttons: PointerButtons::NONE,
            time_ms,
            consumed: Rc::new(Cell::new(false)),
        }
    }

    pub fn with_source(mut self, source: PointerSource) -> Self {
        self.source = source;
        self
    }

    /// Set the buttons state for this event
    pub fn with_buttons(mut self, buttons: PointerButtons) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// Position of the first contact, or the origin when there is none.
    pub fn position(&self) -> Point {
        self.contacts
            .first()
            .map(|contact| contact.position)
            .unwrap_or(Point::ZERO)
    }

    pub fn contact_positions(&self) -> SmallVec<[Point; 2]> {
        self.contacts.iter().map(|contact| contact.position).collect()
    }

    pub fn touch_point(&self) -> TouchPoint {
        TouchPoint::at(self.position(), self.time_ms)
    }

    /// Mark this event as consumed so native scrolling ignores it.
    pub fn consume(&self) {
        self.consumed.set(true);
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed.get()
    }
}

impl From<PointerInput> for PointerEvent {
    fn from(input: PointerInput) -> Self {
        match input {
            PointerInput::Mouse {
                phase,
                position,
                buttons,
                time_ms,
            } => PointerEvent::new(phase, position, time_ms)
                .with_source(PointerSource::Mouse)
                .with_buttons(buttons),
            PointerInput::Touch {
                phase,
                contacts,
                time_ms,
            } => PointerEvent::with_contacts(phase, contacts, time_ms),
            PointerInput::Pen {
                phase,
                position,
                time_ms,
                ..
            } => PointerEvent::new(phase, position, time_ms).with_source(PointerSource::Pen),
        }
    }
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
