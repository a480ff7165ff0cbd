pub mod long_press;
pub mod pinch;
pub mod pull_refresh;
pub mod swipe;
pub mod swipe_dismiss;

pub use long_press::{
    LongPressCallbacks, LongPressCancelReason, LongPressController, LongPressPhase, LongPressState,
};
pub use pinch::{
    pinch_geometry, PinchDetector, PinchGesture, PinchHandlers, PinchTracker, PinchUpdate,
};
pub use pull_refresh::{
    PullCallbacks, PullState, PullToRefreshController, RefreshError, RefreshFuture,
};
pub use swipe::{classify_swipe, SwipeDetector, SwipeDirection, SwipeGesture, SwipeHandlers};
pub use swipe_dismiss::{DismissCallbacks, SwipeToDismissController};
