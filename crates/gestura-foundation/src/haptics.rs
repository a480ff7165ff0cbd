//! Haptic feedback collaborator.

/// What kind of feedback a recogniser is asking for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HapticKind {
    /// A long-press completed.
    LongPress,
    /// A pull crossed its refresh threshold during a drag.
    ThresholdCrossed,
}

/// Platform hook for vibration or similar feedback.
///
/// Implementations must be cheap and must not call back into the
/// controller that requested the feedback.
pub trait HapticFeedback {
    fn perform(&self, kind: HapticKind);
}

/// Discards every request. The default when no device support exists.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHaptics;

impl HapticFeedback for NoHaptics {
    fn perform(&self, kind: HapticKind) {
        log::trace!("haptic {kind:?} requested without a device");
    }
}

impl<F> HapticFeedback for F
where
    F: Fn(HapticKind),
{
    fn perform(&self, kind: HapticKind) {
        self(kind)
    }
}
