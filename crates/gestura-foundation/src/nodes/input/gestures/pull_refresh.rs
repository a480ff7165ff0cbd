//! Pull-to-refresh controller.
//!
//! Tracking engages only when the attached [`ScrollContainer`] is at its
//! top edge at gesture start. Releasing past `pull_threshold` spawns the
//! refresh action on the runtime; `is_refreshing` stays set until that task
//! completes, fails or is cancelled.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};

use gestura_core::{GestureError, RuntimeHandle, TaskHandle};

use crate::config::PullToRefreshConfig;
use crate::haptics::{HapticFeedback, HapticKind, NoHaptics};
use crate::nodes::input::types::{PointerEvent, PointerPhase};
use crate::scrollable::ScrollContainer;

const CONTROLLER: &str = "PullToRefreshController";

pub type RefreshError = Box<dyn std::error::Error>;
pub type RefreshFuture = Pin<Box<dyn Future<Output = Result<(), RefreshError>>>>;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PullState {
    pub pull_distance: f32,
    pub is_refreshing: bool,
}

#[derive(Clone)]
pub struct PullCallbacks {
    on_refresh: Rc<dyn Fn() -> RefreshFuture>,
    on_pull: Option<Rc<dyn Fn(f32)>>,
    on_refreshing_changed: Option<Rc<dyn Fn(bool)>>,
}

impl PullCallbacks {
    /// `on_refresh` produces the async action run when a pull is released
    /// past the threshold.
    pub fn new<F, Fut>(on_refresh: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<(), RefreshError>> + 'static,
    {
        Self {
            on_refresh: Rc::new(move || Box::pin(on_refresh()) as RefreshFuture),
            on_pull: None,
            on_refreshing_changed: None,
        }
    }

    /// Receives every change of the pull distance, including the reset to 0.
    pub fn on_pull(mut self, handler: impl Fn(f32) + 'static) -> Self {
        self.on_pull = Some(Rc::new(handler));
        self
    }

    pub fn on_refreshing_changed(mut self, handler: impl Fn(bool) + 'static) -> Self {
        self.on_refreshing_changed = Some(Rc::new(handler));
        self
    }

    /// Produces a fresh refresh action.
    pub fn run_refresh(&self) -> RefreshFuture {
        (self.on_refresh)()
    }

    pub fn notify_pull(&self, pull_distance: f32) {
        if let Some(handler) = &self.on_pull {
            handler(pull_distance);
        }
    }

    pub fn notify_refreshing(&self, is_refreshing: bool) {
        if let Some(handler) = &self.on_refreshing_changed {
            handler(is_refreshing);
        }
    }
}

impl std::fmt::Debug for PullCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PullCallbacks")
            .field("on_pull", &self.on_pull.is_some())
            .field("on_refreshing_changed", &self.on_refreshing_changed.is_some())
            .finish()
    }
}

struct PullInner {
    config: PullToRefreshConfig,
    callbacks: PullCallbacks,
    scroll: Rc<dyn ScrollContainer>,
    haptics: Rc<dyn HapticFeedback>,
    // Y of the gesture start while tracking.
    origin_y: Option<f32>,
    pull_distance: f32,
    threshold_crossed: bool,
    is_refreshing: bool,
    task: Option<TaskHandle>,
    refresh_count: u64,
    disposed: bool,
}

/// Clears `is_refreshing` when the refresh task finishes or is dropped.
struct RefreshGuard {
    inner: Weak<RefCell<PullInner>>,
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        let notify = match inner.try_borrow_mut() {
            Ok(mut inner) => {
                inner.is_refreshing = false;
                inner.task = None;
                inner.callbacks.on_refreshing_changed.clone()
            }
            Err(_) => {
                log::warn!("refresh finished while controller state was borrowed");
                None
            }
        };
        log::debug!("refresh finished");
        if let Some(notify) = notify {
            notify(false);
        }
    }
}

#[derive(Clone)]
pub struct PullToRefreshController {
    inner: Rc<RefCell<PullInner>>,
    runtime: RuntimeHandle,
}

impl PullToRefreshController {
    pub fn new(
        runtime: RuntimeHandle,
        config: PullToRefreshConfig,
        scroll: Rc<dyn ScrollContainer>,
        callbacks: PullCallbacks,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(PullInner {
                config,
                callbacks,
                scroll,
                haptics: Rc::new(NoHaptics),
                origin_y: None,
                pull_distance: 0.0,
                threshold_crossed: false,
                is_refreshing: false,
                task: None,
                refresh_count: 0,
                disposed: false,
            })),
            runtime,
        }
    }

    pub fn with_haptics(self, haptics: Rc<dyn HapticFeedback>) -> Self {
        self.inner.borrow_mut().haptics = haptics;
        self
    }

    pub fn config(&self) -> PullToRefreshConfig {
        self.inner.borrow().config
    }

    pub fn pull_distance(&self) -> f32 {
        self.inner.borrow().pull_distance
    }

    pub fn is_refreshing(&self) -> bool {
        self.inner.borrow().is_refreshing
    }

    pub fn is_tracking(&self) -> bool {
        self.inner.borrow().origin_y.is_some()
    }

    /// Number of refresh actions started so far.
    pub fn refresh_count(&self) -> u64 {
        self.inner.borrow().refresh_count
    }

    pub fn state(&self) -> PullState {
        let inner = self.inner.borrow();
        PullState {
            pull_distance: inner.pull_distance,
            is_refreshing: inner.is_refreshing,
        }
    }

    fn ensure_live(&self) -> Result<(), GestureError> {
        if self.inner.borrow().disposed {
            Err(GestureError::Disposed {
                controller: CONTROLLER,
            })
        } else {
            Ok(())
        }
    }

    /// Routes an event by phase. Returns `true` when a refresh was started.
    pub fn handle(&self, event: &PointerEvent) -> Result<bool, GestureError> {
        match event.phase {
            PointerPhase::Start => self.start(event).map(|_| false),
            PointerPhase::Move => self.pointer_move(event).map(|_| false),
            PointerPhase::End => self.release(),
            PointerPhase::Cancel => self.cancel().map(|_| false),
        }
    }

    /// Begins tracking if the scroll container is at its top edge.
    /// Returns whether tracking engaged.
    pub fn start(&self, event: &PointerEvent) -> Result<bool, GestureError> {
        self.ensure_live()?;
        // The container is user code and may read this controller.
        let scroll = self.inner.borrow().scroll.clone();
        if !scroll.is_at_top() {
            log::trace!("pull ignored: scroll offset {}", scroll.scroll_offset());
            self.inner.borrow_mut().origin_y = None;
            return Ok(false);
        }
        let mut inner = self.inner.borrow_mut();
        inner.origin_y = Some(event.position().y);
        inner.threshold_crossed = false;
        Ok(true)
    }

    pub fn pointer_move(&self, event: &PointerEvent) -> Result<(), GestureError> {
        self.ensure_live()?;
        let (on_pull, haptic, pull_distance) = {
            let mut inner = self.inner.borrow_mut();
            let Some(origin_y) = inner.origin_y else {
                return Ok(());
            };
            let delta_y = event.position().y - origin_y;
            let pull_distance = if delta_y > 0.0 {
                delta_y.min(inner.config.max_pull)
            } else {
                0.0
            };
            if delta_y > inner.config.scroll_suppress_threshold {
                event.consume();
            }
            let crossed = !inner.threshold_crossed && pull_distance >= inner.config.pull_threshold;
            if crossed {
                inner.threshold_crossed = true;
            }
            let changed = pull_distance != inner.pull_distance;
            inner.pull_distance = pull_distance;
            let haptic = crossed.then(|| inner.haptics.clone());
            let on_pull = if changed {
                inner.callbacks.on_pull.clone()
            } else {
                None
            };
            (on_pull, haptic, pull_distance)
        };
        log::trace!("pull distance {pull_distance}");
        if let Some(haptics) = haptic {
            haptics.perform(HapticKind::ThresholdCrossed);
        }
        if let Some(on_pull) = on_pull {
            on_pull(pull_distance);
        }
        Ok(())
    }

    /// Ends the drag. Starts a refresh when the pull reached the threshold
    /// and no refresh is running; returns whether one was started.
    pub fn release(&self) -> Result<bool, GestureError> {
        self.ensure_live()?;
        let (should_refresh, on_pull) = {
            let mut inner = self.inner.borrow_mut();
            if inner.origin_y.take().is_none() {
                return Ok(false);
            }
            let reached = inner.pull_distance >= inner.config.pull_threshold;
            if reached && inner.is_refreshing {
                log::debug!("pull released during refresh; ignored");
            }
            let had_pull = inner.pull_distance != 0.0;
            inner.pull_distance = 0.0;
            inner.threshold_crossed = false;
            let on_pull = if had_pull {
                inner.callbacks.on_pull.clone()
            } else {
                None
            };
            (reached && !inner.is_refreshing, on_pull)
        };
        if let Some(on_pull) = on_pull {
            on_pull(0.0);
        }
        if should_refresh {
            self.start_refresh()?;
        }
        Ok(should_refresh)
    }

    /// Aborts the drag without refreshing.
    pub fn cancel(&self) -> Result<(), GestureError> {
        self.ensure_live()?;
        let on_pull = {
            let mut inner = self.inner.borrow_mut();
            inner.origin_y = None;
            inner.threshold_crossed = false;
            let had_pull = inner.pull_distance != 0.0;
            inner.pull_distance = 0.0;
            if had_pull {
                inner.callbacks.on_pull.clone()
            } else {
                None
            }
        };
        if let Some(on_pull) = on_pull {
            on_pull(0.0);
        }
        Ok(())
    }

    /// Runs the refresh action unless one is already running.
    pub fn refresh(&self) -> Result<bool, GestureError> {
        self.ensure_live()?;
        if self.is_refreshing() {
            return Ok(false);
        }
        self.start_refresh()?;
        Ok(true)
    }

    fn start_refresh(&self) -> Result<(), GestureError> {
        if !self.runtime.is_alive() {
            return Err(GestureError::RuntimeUnavailable {
                controller: CONTROLLER,
            });
        }
        let (on_refresh, on_refreshing_changed) = {
            let mut inner = self.inner.borrow_mut();
            inner.is_refreshing = true;
            inner.refresh_count += 1;
            (
                inner.callbacks.on_refresh.clone(),
                inner.callbacks.on_refreshing_changed.clone(),
            )
        };
        log::debug!("refresh started");
        if let Some(notify) = on_refreshing_changed {
            notify(true);
        }

        let action = on_refresh();
        let guard = RefreshGuard {
            inner: Rc::downgrade(&self.inner),
        };
        let task = self.runtime.spawn_ui(async move {
            let _guard = guard;
            if let Err(err) = action.await {
                log::warn!("refresh action failed: {err}");
            }
        });
        match task {
            Some(task) => {
                self.inner.borrow_mut().task = Some(task);
                Ok(())
            }
            None => Err(GestureError::RuntimeUnavailable {
                controller: CONTROLLER,
            }),
        }
    }

    /// Cancels any running refresh and rejects later calls.
    pub fn dispose(&self) {
        let task = {
            let mut inner = self.inner.borrow_mut();
            inner.disposed = true;
            inner.origin_y = None;
            inner.pull_distance = 0.0;
            inner.task.take()
        };
        if let Some(task) = task {
            task.cancel();
        }
        log::debug!("pull-to-refresh controller disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.borrow().disposed
    }
}

impl std::fmt::Debug for PullToRefreshController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PullToRefreshController")
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/pull_refresh_tests.rs"]
mod tests;
