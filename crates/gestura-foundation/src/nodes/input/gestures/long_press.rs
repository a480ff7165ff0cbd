//! Long-press state machine.
//!
//! ```text
//! Idle ──press──▶ Pressing ──delay elapsed──▶ fired ──▶ Idle
//!                     │
//!                     └──release / moved / second contact──▶ cancelled ──▶ Idle
//! ```
//!
//! While pressing, a progress ticker and a single-shot delay timer live on the
//! runtime. Both hold only a weak reference to the controller state.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gestura_core::{GestureError, RuntimeHandle, TimerRegistration};
use gestura_geometry::{clamp, distance, Point};

use crate::config::LongPressConfig;
use crate::haptics::{HapticFeedback, HapticKind, NoHaptics};
use crate::nodes::input::types::{PointerEvent, PointerPhase};

const CONTROLLER: &str = "LongPressController";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LongPressPhase {
    Idle,
    Pressing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LongPressCancelReason {
    Released,
    Moved,
    MultiTouch,
}

/// Snapshot of an in-flight press.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LongPressState {
    pub is_active: bool,
    pub progress: f32,
    pub start_time_ms: i64,
    pub start_position: Point,
}

type EventCallback = Rc<dyn Fn(&PointerEvent)>;

#[derive(Clone, Default)]
pub struct LongPressCallbacks {
    on_start: Option<EventCallback>,
    on_progress: Option<Rc<dyn Fn(f32)>>,
    on_cancel: Option<Rc<dyn Fn(LongPressCancelReason)>>,
    on_long_press: Option<EventCallback>,
}

impl LongPressCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_start(mut self, handler: impl Fn(&PointerEvent) + 'static) -> Self {
        self.on_start = Some(Rc::new(handler));
        self
    }

    /// Receives values in `[0, 1]`, never decreasing within one press.
    pub fn on_progress(mut self, handler: impl Fn(f32) + 'static) -> Self {
        self.on_progress = Some(Rc::new(handler));
        self
    }

    pub fn on_cancel(mut self, handler: impl Fn(LongPressCancelReason) + 'static) -> Self {
        self.on_cancel = Some(Rc::new(handler));
        self
    }

    /// Receives the event that started the press.
    pub fn on_long_press(mut self, handler: impl Fn(&PointerEvent) + 'static) -> Self {
        self.on_long_press = Some(Rc::new(handler));
        self
    }

    pub fn notify_start(&self, event: &PointerEvent) {
        if let Some(handler) = &self.on_start {
            handler(event);
        }
    }

    pub fn notify_progress(&self, progress: f32) {
        if let Some(handler) = &self.on_progress {
            handler(progress);
        }
    }

    pub fn notify_cancel(&self, reason: LongPressCancelReason) {
        if let Some(handler) = &self.on_cancel {
            handler(reason);
        }
    }

    pub fn notify_long_press(&self, event: &PointerEvent) {
        if let Some(handler) = &self.on_long_press {
            handler(event);
        }
    }
}

impl std::fmt::Debug for LongPressCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LongPressCallbacks")
            .field("on_start", &self.on_start.is_some())
            .field("on_progress", &self.on_progress.is_some())
            .field("on_cancel", &self.on_cancel.is_some())
            .field("on_long_press", &self.on_long_press.is_some())
            .finish()
    }
}

struct Press {
    start_time_ms: i64,
    start_event: PointerEvent,
    progress: f32,
    ticker: Option<TimerRegistration>,
    timeout: Option<TimerRegistration>,
}

struct LongPressInner {
    config: LongPressConfig,
    callbacks: LongPressCallbacks,
    haptics: Rc<dyn HapticFeedback>,
    press: Option<Press>,
    disposed: bool,
}

impl LongPressInner {
    fn take_press(&mut self) -> Option<Press> {
        self.press.take()
    }
}

/// Drives one long-press cycle at a time.
#[derive(Clone)]
pub struct LongPressController {
    inner: Rc<RefCell<LongPressInner>>,
    runtime: RuntimeHandle,
}

impl LongPressController {
    pub fn new(
        runtime: RuntimeHandle,
        config: LongPressConfig,
        callbacks: LongPressCallbacks,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(LongPressInner {
                config,
                callbacks,
                haptics: Rc::new(NoHaptics),
                press: None,
                disposed: false,
            })),
            runtime,
        }
    }

    pub fn with_haptics(self, haptics: Rc<dyn HapticFeedback>) -> Self {
        self.inner.borrow_mut().haptics = haptics;
        self
    }

    pub fn config(&self) -> LongPressConfig {
        self.inner.borrow().config
    }

    pub fn phase(&self) -> LongPressPhase {
        if self.inner.borrow().press.is_some() {
            LongPressPhase::Pressing
        } else {
            LongPressPhase::Idle
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase() == LongPressPhase::Pressing
    }

    /// Progress of the current press, `0.0` when idle.
    pub fn progress(&self) -> f32 {
        self.inner
            .borrow()
            .press
            .as_ref()
            .map(|press| press.progress)
            .unwrap_or(0.0)
    }

    pub fn state(&self) -> Option<LongPressState> {
        self.inner.borrow().press.as_ref().map(|press| LongPressState {
            is_active: true,
            progress: press.progress,
            start_time_ms: press.start_time_ms,
            start_position: press.start_event.position(),
        })
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

    /// Routes an event to `press`, `pointer_move` or `release`.
    pub fn handle(&self, event: &PointerEvent) -> Result<(), GestureError> {
        self.ensure_live()?;
        if event.contact_count() > 1 {
            self.cancel(LongPressCancelReason::MultiTouch);
            return Ok(());
        }
        match event.phase {
            PointerPhase::Start => self.press(event).map(|_| ()),
            PointerPhase::Move => self.pointer_move(event),
            PointerPhase::End | PointerPhase::Cancel => self.release(),
        }
    }

    /// Starts a press. Returns `false` when a press is already in flight.
    pub fn press(&self, event: &PointerEvent) -> Result<bool, GestureError> {
        self.ensure_live()?;
        if self.is_active() {
            log::trace!("long-press start ignored: already pressing");
            return Ok(false);
        }
        let start_time_ms = self.runtime.now_ms().ok_or(GestureError::RuntimeUnavailable {
            controller: CONTROLLER,
        })?;
        let config = self.config();

        let weak = Rc::downgrade(&self.inner);
        let ticker = self
            .runtime
            .set_interval(config.progress_interval_ms, move |time| {
                Self::on_tick(&weak, time)
            });
        let weak = Rc::downgrade(&self.inner);
        let timeout = self
            .runtime
            .set_timeout(config.delay_ms, move |_| Self::on_fire(&weak));

        let callbacks = {
            let mut inner = self.inner.borrow_mut();
            inner.press = Some(Press {
                start_time_ms,
                start_event: event.clone(),
                progress: 0.0,
                ticker: Some(ticker),
                timeout: Some(timeout),
            });
            inner.callbacks.clone()
        };
        log::debug!(
            "long-press started at {:?} (t={start_time_ms})",
            event.position()
        );
        callbacks.notify_start(event);
        Ok(true)
    }

    /// Cancels the press once the pointer strays beyond `move_threshold`.
    pub fn pointer_move(&self, event: &PointerEvent) -> Result<(), GestureError> {
        self.ensure_live()?;
        let exceeded = {
            let inner = self.inner.borrow();
            match &inner.press {
                Some(press) => {
                    distance(press.start_event.position(), event.position())
                        > inner.config.move_threshold
                }
                None => false,
            }
        };
        if exceeded {
            self.cancel(LongPressCancelReason::Moved);
        }
        Ok(())
    }

    /// Release or pointer-leave. Cancels a press that has not fired yet.
    pub fn release(&self) -> Result<(), GestureError> {
        self.ensure_live()?;
        self.cancel(LongPressCancelReason::Released);
        Ok(())
    }

    /// Returns to `Idle`, clearing timers without invoking any callback.
    pub fn reset(&self) {
        let press = self.inner.borrow_mut().take_press();
        // Registrations cancel on drop, outside the borrow.
        drop(press);
    }

    /// Resets and rejects every later call with [`GestureError::Disposed`].
    pub fn dispose(&self) {
        self.reset();
        self.inner.borrow_mut().disposed = true;
        log::debug!("long-press controller disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.borrow().disposed
    }

    fn cancel(&self, reason: LongPressCancelReason) {
        let (press, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            (inner.take_press(), inner.callbacks.clone())
        };
        if press.is_none() {
            return;
        }
        drop(press);
        log::debug!("long-press cancelled: {reason:?}");
        callbacks.notify_cancel(reason);
    }

    fn on_tick(weak: &Weak<RefCell<LongPressInner>>, time: i64) {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let update = {
            let mut inner = inner.borrow_mut();
            let delay_ms = inner.config.delay_ms.max(1);
            let on_progress = inner.callbacks.on_progress.clone();
            match inner.press.as_mut() {
                Some(press) => {
                    let elapsed = (time - press.start_time_ms) as f32;
                    let progress = clamp(elapsed / delay_ms as f32, 0.0, 1.0).max(press.progress);
                    press.progress = progress;
                    Some((progress, on_progress))
                }
                None => None,
            }
        };
        if let Some((progress, Some(on_progress))) = update {
            log::trace!("long-press progress {progress}");
            on_progress(progress);
        }
    }

    fn on_fire(weak: &Weak<RefCell<LongPressInner>>) {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let (press, callbacks, haptics) = {
            let mut inner = inner.borrow_mut();
            let Some(press) = inner.take_press() else {
                return;
            };
            (press, inner.callbacks.clone(), inner.haptics.clone())
        };
        let Press {
            start_event,
            ticker,
            timeout,
            ..
        } = press;
        drop((ticker, timeout));
        log::debug!("long-press fired at {:?}", start_event.position());

        haptics.perform(HapticKind::LongPress);
        callbacks.notify_progress(1.0);
        callbacks.notify_long_press(&start_event);
    }
}

impl std::fmt::Debug for LongPressController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LongPressController")
            .field("phase", &self.phase())
            .field("progress", &self.progress())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/long_press_tests.rs"]
mod tests;
