//! Gesture surfaces for Gestura
//!
//! A [`GestureSurface`] attaches recognisers from `gestura-foundation` to one
//! input area, routes normalised pointer events to them, and exposes what
//! they recognise three ways: user callbacks, a pull-based
//! [`GestureEvent`] queue, and [`SurfaceState`] change listeners.

mod event;
mod state;
mod surface;

pub use event::GestureEvent;
pub use state::{StateListenerId, SurfaceState};
pub use surface::{GestureSurface, EVENT_QUEUE_CAPACITY};

pub use gestura_foundation::{
    DismissCallbacks, HapticFeedback, HapticKind, LongPressCallbacks, LongPressCancelReason,
    LongPressConfig, PinchGesture, PinchHandlers, PointerEvent, PointerInput, PointerPhase,
    PullCallbacks, PullToRefreshConfig, RefreshError, ScrollContainer, SwipeConfig,
    SwipeDirection, SwipeGesture, SwipeHandlers, SwipeToDismissConfig,
};

pub mod prelude {
    pub use crate::event::GestureEvent;
    pub use crate::state::SurfaceState;
    pub use crate::surface::GestureSurface;
    pub use gestura_foundation::prelude::*;
    pub use gestura_foundation::{
        DismissCallbacks, LongPressCallbacks, PinchHandlers, PullCallbacks, SwipeHandlers,
    };
}
