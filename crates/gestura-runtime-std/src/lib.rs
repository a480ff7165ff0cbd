//! Standard runtime services backed by a wall clock.
//!
//! This crate provides concrete implementations of the platform traits
//! defined in `gestura-core`. Hosts construct a [`StdRuntime`], hand its
//! [`RuntimeHandle`] to gesture controllers, and call [`StdRuntime::pump`]
//! from their event loop.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use gestura_core::{Clock, Runtime, RuntimeHandle, RuntimeScheduler};
use web_time::{Duration, Instant};

/// Scheduler that records pump requests and forwards them to a host waker.
pub struct StdScheduler {
    pump_requested: AtomicBool,
    pump_waker: RwLock<Option<Arc<dyn Fn() + Send + Sync + 'static>>>,
}

impl StdScheduler {
    pub fn new() -> Self {
        Self {
            pump_requested: AtomicBool::new(false),
            pump_waker: RwLock::new(None),
        }
    }

    /// Returns whether a pump has been requested since the last call.
    pub fn take_pump_request(&self) -> bool {
        self.pump_requested.swap(false, Ordering::SeqCst)
    }

    /// Registers a waker that will be invoked whenever the runtime needs a pump.
    pub fn set_pump_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        if let Ok(mut slot) = self.pump_waker.write() {
            *slot = Some(Arc::new(waker));
        }
    }

    /// Clears any registered pump waker.
    pub fn clear_pump_waker(&self) {
        if let Ok(mut slot) = self.pump_waker.write() {
            *slot = None;
        }
    }

    fn wake(&self) {
        let waker = self
            .pump_waker
            .read()
            .ok()
            .and_then(|slot| slot.clone());
        if let Some(waker) = waker {
            waker();
        }
    }
}

impl Default for StdScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StdScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdScheduler")
            .field("pump_requested", &self.pump_requested.load(Ordering::SeqCst))
            .finish()
    }
}

impl RuntimeScheduler for StdScheduler {
    fn schedule_pump(&self) {
        self.pump_requested.store(true, Ordering::SeqCst);
        self.wake();
    }
}

/// Monotonic clock measured from its creation.
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: Instant,
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Returns the elapsed time as a [`Duration`] for convenience.
    pub fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StdClock {
    fn now_ms(&self) -> i64 {
        i64::try_from(self.elapsed().as_millis()).unwrap_or(i64::MAX)
    }
}

/// Convenience container bundling the standard scheduler, clock and runtime.
#[derive(Clone)]
pub struct StdRuntime {
    scheduler: Arc<StdScheduler>,
    clock: StdClock,
    runtime: Runtime,
}

impl StdRuntime {
    pub fn new() -> Self {
        let scheduler = Arc::new(StdScheduler::default());
        let clock = StdClock::new();
        let runtime = Runtime::with_clock(scheduler.clone(), Rc::new(clock));
        Self {
            scheduler,
            clock,
            runtime,
        }
    }

    pub fn runtime(&self) -> Runtime {
        self.runtime.clone()
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    pub fn scheduler(&self) -> Arc<StdScheduler> {
        Arc::clone(&self.scheduler)
    }

    pub fn clock(&self) -> StdClock {
        self.clock
    }

    /// Milliseconds since this runtime was created, suitable as the
    /// timestamp of an incoming pointer sample.
    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Advances the runtime to the wall clock, firing any due timers.
    pub fn pump(&self) {
        self.scheduler.take_pump_request();
        let before = self.runtime.pending_timer_count();
        let now = self.clock.now_ms();
        self.runtime.advance_to(now);
        log::trace!(
            "pumped to t={now}: {} timer(s) pending, was {before}",
            self.runtime.pending_timer_count()
        );
    }

    /// How long the host may sleep before the next timer is due.
    pub fn time_until_next_timer(&self) -> Option<Duration> {
        let due = self.runtime.next_timer_due_ms()?;
        let wait = (due - self.clock.now_ms()).max(0);
        Some(Duration::from_millis(wait as u64))
    }

    pub fn take_pump_request(&self) -> bool {
        self.scheduler.take_pump_request()
    }

    pub fn set_pump_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        self.scheduler.set_pump_waker(waker);
    }

    pub fn clear_pump_waker(&self) {
        self.scheduler.clear_pump_waker();
    }
}

impl fmt::Debug for StdRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdRuntime")
            .field("scheduler", &self.scheduler)
            .field("clock", &self.clock)
            .field("runtime", &self.runtime)
            .finish()
    }
}

impl Default for StdRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/std_runtime_tests.rs"]
mod tests;
