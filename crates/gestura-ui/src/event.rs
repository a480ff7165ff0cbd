use gestura_foundation::{LongPressCancelReason, PinchGesture, SwipeDirection, SwipeGesture};
use gestura_geometry::Point;

/// Queued copy of every recognised gesture, for hosts that prefer polling
/// over callbacks.
#[derive(Clone, Debug, PartialEq)]
pub enum GestureEvent {
    Swipe(SwipeGesture),
    LongPressStarted { position: Point },
    LongPressProgress(f32),
    LongPressCancelled(LongPressCancelReason),
    LongPress { position: Point },
    PinchStarted { initial_distance: f32 },
    Pinch(PinchGesture),
    PinchEnded,
    PullChanged(f32),
    RefreshStarted,
    RefreshFinished,
    DragDelta(f32),
    Dismissed(SwipeDirection),
}

impl GestureEvent {
    /// High-frequency events that are usually rendered, not acted upon.
    pub fn is_continuous(&self) -> bool {
        matches!(
            self,
            GestureEvent::LongPressProgress(_)
                | GestureEvent::Pinch(_)
                | GestureEvent::PullChanged(_)
                | GestureEvent::DragDelta(_)
        )
    }
}
