//! Platform abstraction traits for the Gestura runtime.
//!
//! These traits let the runtime ask the host for attention and read time
//! without depending on a particular event loop.

/// Receives wakeup requests from the runtime.
///
/// Called whenever a timer is armed or an async task is woken, so the host
/// knows it should drive [`crate::Runtime::advance_to`] again soon.
pub trait RuntimeScheduler: Send + Sync {
    fn schedule_pump(&self);
}

/// Provides timing information for a host-driven runtime.
pub trait Clock {
    /// Milliseconds elapsed since the clock was created.
    fn now_ms(&self) -> i64;
}

/// Scheduler for hosts that poll on their own cadence.
#[derive(Debug, Default)]
pub struct DefaultScheduler;

impl RuntimeScheduler for DefaultScheduler {
    fn schedule_pump(&self) {}
}
