//! Recording stand-ins for the platform collaborators.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gestura_foundation::{HapticFeedback, HapticKind, ScrollContainer};

/// Remembers every haptic request in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingHaptics {
    performed: Rc<RefCell<Vec<HapticKind>>>,
}

impl RecordingHaptics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn performed(&self) -> Vec<HapticKind> {
        self.performed.borrow().clone()
    }

    pub fn count(&self, kind: HapticKind) -> usize {
        self.performed
            .borrow()
            .iter()
            .filter(|performed| **performed == kind)
            .count()
    }

    pub fn clear(&self) {
        self.performed.borrow_mut().clear();
    }

    pub fn as_feedback(&self) -> Rc<dyn HapticFeedback> {
        Rc::new(self.clone())
    }
}

impl HapticFeedback for RecordingHaptics {
    fn perform(&self, kind: HapticKind) {
        self.performed.borrow_mut().push(kind);
    }
}

/// Scroll container whose offset the test sets directly.
#[derive(Clone, Debug, Default)]
pub struct FixedScroll {
    offset: Rc<Cell<f32>>,
}

impl FixedScroll {
    pub fn at_top() -> Self {
        Self::default()
    }

    pub fn scrolled_to(offset: f32) -> Self {
        let scroll = Self::default();
        scroll.set_offset(offset);
        scroll
    }

    pub fn set_offset(&self, offset: f32) {
        self.offset.set(offset);
    }

    pub fn as_container(&self) -> Rc<dyn ScrollContainer> {
        Rc::new(self.clone())
    }
}

impl ScrollContainer for FixedScroll {
    fn scroll_offset(&self) -> f32 {
        self.offset.get()
    }
}
