//! Gesture recognisers for Gestura
//!
//! Every recogniser here consumes normalised [`PointerEvent`]s. Pure
//! classifiers ([`classify_swipe`], [`PinchDetector`]) return values; the
//! stateful controllers ([`LongPressController`], [`PullToRefreshController`],
//! [`SwipeToDismissController`]) report through callbacks and arm their
//! timers on a [`gestura_core::RuntimeHandle`].

pub mod config;
pub mod gesture_constants;
pub mod haptics;
pub mod nodes;
pub mod scrollable;

pub use config::{LongPressConfig, PullToRefreshConfig, SwipeConfig, SwipeToDismissConfig};
pub use haptics::{HapticFeedback, HapticKind, NoHaptics};
pub use nodes::input::gestures::{
    classify_swipe, pinch_geometry, DismissCallbacks, LongPressCallbacks, LongPressCancelReason,
    LongPressController, LongPressPhase, LongPressState, PinchDetector, PinchGesture,
    PinchHandlers, PinchTracker, PinchUpdate, PullCallbacks, PullState, PullToRefreshController,
    RefreshError, RefreshFuture, SwipeDetector, SwipeDirection, SwipeGesture, SwipeHandlers,
    SwipeToDismissController,
};
pub use nodes::input::{
    Contact, PointerButton, PointerButtons, PointerEvent, PointerId, PointerInput, PointerPhase,
    PointerSource,
};
pub use scrollable::ScrollContainer;

pub mod prelude {
    pub use crate::config::{
        LongPressConfig, PullToRefreshConfig, SwipeConfig, SwipeToDismissConfig,
    };
    pub use crate::haptics::{HapticFeedback, HapticKind};
    pub use crate::nodes::input::gestures::{
        classify_swipe, LongPressController, PinchDetector, PullToRefreshController,
        SwipeDirection, SwipeGesture, SwipeToDismissController,
    };
    pub use crate::nodes::input::prelude::*;
    pub use crate::scrollable::ScrollContainer;
}
