//! Binding of recognisers to a single input surface.
//!
//! A [`GestureSurface`] owns at most one recogniser of each kind. Every
//! [`PointerEvent`] handed to [`GestureSurface::handle_event`] is routed to
//! the attached recognisers in a fixed order (pinch, long-press, swipe,
//! swipe-to-dismiss, pull-to-refresh). Recognised gestures are reported to
//! the user's callbacks and queued as [`GestureEvent`]s.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use gestura_core::{GestureError, RuntimeHandle};
use gestura_foundation::{
    DismissCallbacks, HapticFeedback, LongPressCallbacks, LongPressConfig, LongPressController,
    NoHaptics, PinchHandlers, PinchTracker, PinchUpdate, PointerEvent, PointerInput,
    PullCallbacks, PullToRefreshConfig, PullToRefreshController, ScrollContainer, SwipeConfig,
    SwipeDetector, SwipeDirection, SwipeHandlers, SwipeToDismissConfig,
    SwipeToDismissController,
};

use crate::event::GestureEvent;
use crate::state::{StateListenerId, SurfaceState};

const SURFACE: &str = "GestureSurface";

/// Oldest events are dropped once this many are waiting.
pub const EVENT_QUEUE_CAPACITY: usize = 1024;

type StateListener = Rc<dyn Fn(&SurfaceState)>;

struct SwipeBinding {
    detector: SwipeDetector,
    handlers: SwipeHandlers,
}

struct PinchBinding {
    tracker: PinchTracker,
    handlers: PinchHandlers,
}

struct SurfaceInner {
    runtime: RuntimeHandle,
    haptics: RefCell<Rc<dyn HapticFeedback>>,
    swipe: RefCell<Option<SwipeBinding>>,
    long_press: RefCell<Option<LongPressController>>,
    pinch: RefCell<Option<PinchBinding>>,
    pull: RefCell<Option<PullToRefreshController>>,
    dismiss: RefCell<Option<SwipeToDismissController>>,
    pinch_scale: Cell<Option<f32>>,
    dismissed: Cell<Option<SwipeDirection>>,
    events: RefCell<VecDeque<GestureEvent>>,
    listeners: RefCell<Vec<(StateListenerId, StateListener)>>,
    next_listener_id: Cell<StateListenerId>,
    last_state: Cell<SurfaceState>,
    disposed: Cell<bool>,
}

impl SurfaceInner {
    fn push_event(&self, event: GestureEvent) {
        let mut events = self.events.borrow_mut();
        if events.len() >= EVENT_QUEUE_CAPACITY {
            events.pop_front();
            log::warn!("gesture event queue full; dropping oldest event");
        }
        events.push_back(event);
    }

    fn snapshot(&self) -> SurfaceState {
        let long_press = self
            .long_press
            .try_borrow()
            .ok()
            .and_then(|slot| slot.clone());
        let pull = self.pull.try_borrow().ok().and_then(|slot| slot.clone());
        SurfaceState {
            long_press_active: long_press.as_ref().is_some_and(|c| c.is_active()),
            long_press_progress: long_press.as_ref().map_or(0.0, |c| c.progress()),
            pinch_scale: self.pinch_scale.get(),
            pull_distance: pull.as_ref().map_or(0.0, |c| c.pull_distance()),
            is_refreshing: pull.as_ref().is_some_and(|c| c.is_refreshing()),
            dismissed: self.dismissed.get(),
        }
    }

    fn notify_state(&self) {
        let state = self.snapshot();
        if state == self.last_state.get() {
            return;
        }
        self.last_state.set(state);
        let listeners: Vec<StateListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(&state);
        }
    }
}

fn with_inner(weak: &Weak<SurfaceInner>, f: impl FnOnce(&SurfaceInner)) {
    if let Some(inner) = weak.upgrade() {
        f(&inner);
    }
}

/// Input surface with attached gesture recognisers.
///
/// Cloning yields another handle to the same surface.
#[derive(Clone)]
pub struct GestureSurface {
    inner: Rc<SurfaceInner>,
}

impl GestureSurface {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self {
            inner: Rc::new(SurfaceInner {
                runtime,
                haptics: RefCell::new(Rc::new(NoHaptics)),
                swipe: RefCell::new(None),
                long_press: RefCell::new(None),
                pinch: RefCell::new(None),
                pull: RefCell::new(None),
                dismiss: RefCell::new(None),
                pinch_scale: Cell::new(None),
                dismissed: Cell::new(None),
                events: RefCell::new(VecDeque::new()),
                listeners: RefCell::new(Vec::new()),
                next_listener_id: Cell::new(1),
                last_state: Cell::new(SurfaceState::default()),
                disposed: Cell::new(false),
            }),
        }
    }

    /// Haptics used by recognisers attached after this call.
    pub fn with_haptics(self, haptics: Rc<dyn HapticFeedback>) -> Self {
        *self.inner.haptics.borrow_mut() = haptics;
        self
    }

    pub fn runtime(&self) -> &RuntimeHandle {
        &self.inner.runtime
    }

    fn ensure_live(&self) -> Result<(), GestureError> {
        if self.inner.disposed.get() {
            Err(GestureError::Disposed {
                controller: SURFACE,
            })
        } else {
            Ok(())
        }
    }

    fn validated(result: Result<(), GestureError>) -> Result<(), GestureError> {
        if let Err(err) = &result {
            log::warn!("rejected gesture config: {err}");
        }
        result
    }

    pub fn attach_swipe(
        &self,
        config: SwipeConfig,
        handlers: SwipeHandlers,
    ) -> Result<(), GestureError> {
        self.ensure_live()?;
        Self::validated(config.validate())?;
        *self.inner.swipe.borrow_mut() = Some(SwipeBinding {
            detector: SwipeDetector::new(config),
            handlers,
        });
        log::debug!("swipe attached");
        Ok(())
    }

    pub fn attach_long_press(
        &self,
        config: LongPressConfig,
        callbacks: LongPressCallbacks,
    ) -> Result<(), GestureError> {
        self.ensure_live()?;
        Self::validated(config.validate())?;

        let weak = Rc::downgrade(&self.inner);
        let wrapped = LongPressCallbacks::new()
            .on_start({
                let weak = weak.clone();
                let user = callbacks.clone();
                move |event| {
                    with_inner(&weak, |inner| {
                        inner.push_event(GestureEvent::LongPressStarted {
                            position: event.position(),
                        })
                    });
                    user.notify_start(event);
                    with_inner(&weak, SurfaceInner::notify_state);
                }
            })
            .on_progress({
                let weak = weak.clone();
                let user = callbacks.clone();
                move |progress| {
                    with_inner(&weak, |inner| {
                        inner.push_event(GestureEvent::LongPressProgress(progress))
                    });
                    user.notify_progress(progress);
                    with_inner(&weak, SurfaceInner::notify_state);
                }
            })
            .on_cancel({
                let weak = weak.clone();
                let user = callbacks.clone();
                move |reason| {
                    with_inner(&weak, |inner| {
                        inner.push_event(GestureEvent::LongPressCancelled(reason))
                    });
                    user.notify_cancel(reason);
                    with_inner(&weak, SurfaceInner::notify_state);
                }
            })
            .on_long_press({
                let user = callbacks;
                move |event| {
                    with_inner(&weak, |inner| {
                        inner.push_event(GestureEvent::LongPress {
                            position: event.position(),
                        })
                    });
                    user.notify_long_press(event);
                    with_inner(&weak, SurfaceInner::notify_state);
                }
            });

        let haptics = self.inner.haptics.borrow().clone();
        let controller = LongPressController::new(self.inner.runtime.clone(), config, wrapped)
            .with_haptics(haptics);
        let previous = self.inner.long_press.borrow_mut().replace(controller);
        if let Some(previous) = previous {
            previous.dispose();
        }
        log::debug!("long-press attached");
        Ok(())
    }

    pub fn attach_pinch(&self, handlers: PinchHandlers) -> Result<(), GestureError> {
        self.ensure_live()?;
        *self.inner.pinch.borrow_mut() = Some(PinchBinding {
            tracker: PinchTracker::new(),
            handlers,
        });
        self.inner.pinch_scale.set(None);
        log::debug!("pinch attached");
        Ok(())
    }

    pub fn attach_pull_to_refresh(
        &self,
        config: PullToRefreshConfig,
        scroll: Rc<dyn ScrollContainer>,
        callbacks: PullCallbacks,
    ) -> Result<(), GestureError> {
        self.ensure_live()?;
        Self::validated(config.validate())?;

        let weak = Rc::downgrade(&self.inner);
        let wrapped = PullCallbacks::new({
            let user = callbacks.clone();
            move || user.run_refresh()
        })
        .on_pull({
            let weak = weak.clone();
            let user = callbacks.clone();
            move |pull_distance| {
                with_inner(&weak, |inner| {
                    inner.push_event(GestureEvent::PullChanged(pull_distance))
                });
                user.notify_pull(pull_distance);
                with_inner(&weak, SurfaceInner::notify_state);
            }
        })
        .on_refreshing_changed({
            let user = callbacks;
            move |is_refreshing| {
                with_inner(&weak, |inner| {
                    inner.push_event(if is_refreshing {
                        GestureEvent::RefreshStarted
                    } else {
                        GestureEvent::RefreshFinished
                    })
                });
                user.notify_refreshing(is_refreshing);
                with_inner(&weak, SurfaceInner::notify_state);
            }
        });

        let haptics = self.inner.haptics.borrow().clone();
        let controller =
            PullToRefreshController::new(self.inner.runtime.clone(), config, scroll, wrapped)
                .with_haptics(haptics);
        let previous = self.inner.pull.borrow_mut().replace(controller);
        if let Some(previous) = previous {
            previous.dispose();
        }
        log::debug!("pull-to-refresh attached");
        Ok(())
    }

    pub fn attach_swipe_to_dismiss(
        &self,
        config: SwipeToDismissConfig,
        callbacks: DismissCallbacks,
    ) -> Result<(), GestureError> {
        self.ensure_live()?;
        Self::validated(config.validate())?;

        let weak = Rc::downgrade(&self.inner);
        let wrapped = DismissCallbacks::new()
            .on_drag_delta({
                let weak = weak.clone();
                let user = callbacks.clone();
                move |delta| {
                    with_inner(&weak, |inner| {
                        inner.push_event(GestureEvent::DragDelta(delta))
                    });
                    user.notify_drag_delta(delta);
                }
            })
            .on_dismiss({
                let user = callbacks;
                move |direction| {
                    with_inner(&weak, |inner| {
                        inner.dismissed.set(Some(direction));
                        inner.push_event(GestureEvent::Dismissed(direction));
                    });
                    user.notify_dismiss(direction);
                    with_inner(&weak, SurfaceInner::notify_state);
                }
            });

        *self.inner.dismiss.borrow_mut() = Some(SwipeToDismissController::new(config, wrapped));
        self.inner.dismissed.set(None);
        log::debug!("swipe-to-dismiss attached");
        Ok(())
    }

    /// Normalises raw platform input and routes it.
    pub fn dispatch(&self, input: PointerInput) -> Result<bool, GestureError> {
        self.handle_event(&PointerEvent::from(input))
    }

    /// Routes one event to every attached recogniser. Returns `true` when the
    /// event was consumed and native scrolling must ignore it.
    pub fn handle_event(&self, event: &PointerEvent) -> Result<bool, GestureError> {
        self.ensure_live()?;
        log::trace!(
            "{:?} with {} contact(s) at t={}",
            event.phase,
            event.contact_count(),
            event.time_ms
        );

        self.route_pinch(event)?;
        let long_press = self.inner.long_press.borrow().clone();
        if let Some(long_press) = long_press {
            long_press.handle(event)?;
        }
        self.route_swipe(event);
        self.route_dismiss(event)?;
        let pull = self.inner.pull.borrow().clone();
        if let Some(pull) = pull {
            pull.handle(event)?;
        }

        self.inner.notify_state();
        Ok(event.is_consumed())
    }

    fn route_pinch(&self, event: &PointerEvent) -> Result<(), GestureError> {
        let routed = {
            let mut slot = self.inner.pinch.borrow_mut();
            match slot.as_mut() {
                Some(binding) => Some((binding.tracker.on_event(event), binding.handlers.clone())),
                None => None,
            }
        };
        let Some((update, handlers)) = routed else {
            return Ok(());
        };
        let update = update.map_err(|err| {
            log::warn!("pinch rejected event: {err}");
            err
        })?;
        let Some(update) = update else {
            return Ok(());
        };

        let event = match update {
            PinchUpdate::Started { initial_distance } => {
                self.inner.pinch_scale.set(Some(1.0));
                GestureEvent::PinchStarted { initial_distance }
            }
            PinchUpdate::Changed(gesture) => {
                self.inner.pinch_scale.set(Some(gesture.scale));
                GestureEvent::Pinch(gesture)
            }
            PinchUpdate::Ended => {
                self.inner.pinch_scale.set(None);
                GestureEvent::PinchEnded
            }
        };
        self.inner.push_event(event);
        handlers.dispatch(&update);
        Ok(())
    }

    fn route_swipe(&self, event: &PointerEvent) {
        let recognised = {
            let mut slot = self.inner.swipe.borrow_mut();
            slot.as_mut().and_then(|binding| {
                binding
                    .detector
                    .on_event(event)
                    .map(|gesture| (gesture, binding.handlers.clone()))
            })
        };
        if let Some((gesture, handlers)) = recognised {
            log::debug!(
                "swipe {:?} at {:.3} px/ms",
                gesture.direction,
                gesture.velocity
            );
            self.inner.push_event(GestureEvent::Swipe(gesture));
            handlers.dispatch(&gesture);
        }
    }

    fn route_dismiss(&self, event: &PointerEvent) -> Result<(), GestureError> {
        // Taken out so callbacks may call back into the surface.
        let Some(mut controller) = self.inner.dismiss.borrow_mut().take() else {
            return Ok(());
        };
        let result = controller.handle(event);
        let mut slot = self.inner.dismiss.borrow_mut();
        if slot.is_none() && !self.inner.disposed.get() {
            *slot = Some(controller);
        }
        result.map(|_| ())
    }

    pub fn state(&self) -> SurfaceState {
        self.inner.snapshot()
    }

    /// Registers a listener invoked whenever the [`SurfaceState`] changes.
    pub fn on_state_change(&self, listener: impl Fn(&SurfaceState) + 'static) -> StateListenerId {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    pub fn remove_state_listener(&self, id: StateListenerId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    pub fn poll_event(&self) -> Option<GestureEvent> {
        self.inner.events.borrow_mut().pop_front()
    }

    pub fn drain_events(&self) -> Vec<GestureEvent> {
        self.inner.events.borrow_mut().drain(..).collect()
    }

    pub fn pending_event_count(&self) -> usize {
        self.inner.events.borrow().len()
    }

    pub fn long_press(&self) -> Option<LongPressController> {
        self.inner.long_press.borrow().clone()
    }

    pub fn pull_to_refresh(&self) -> Option<PullToRefreshController> {
        self.inner.pull.borrow().clone()
    }

    pub fn is_dismissed(&self) -> bool {
        self.inner.dismissed.get().is_some()
    }

    /// Returns every recogniser to its idle state without invoking callbacks.
    /// A running refresh is left to finish.
    pub fn reset(&self) {
        if let Some(long_press) = self.long_press() {
            long_press.reset();
        }
        if let Some(binding) = self.inner.swipe.borrow_mut().as_mut() {
            binding.detector.reset();
        }
        if let Some(binding) = self.inner.pinch.borrow_mut().as_mut() {
            binding.tracker.reset();
        }
        if let Some(controller) = self.inner.dismiss.borrow_mut().as_mut() {
            controller.reset();
        }
        if let Some(pull) = self.pull_to_refresh() {
            if let Err(err) = pull.cancel() {
                log::debug!("pull reset skipped: {err}");
            }
        }
        self.inner.pinch_scale.set(None);
        self.inner.dismissed.set(None);
        self.inner.notify_state();
    }

    /// Tears down every recogniser, cancelling timers and any running
    /// refresh. Later calls fail with [`GestureError::Disposed`].
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        let long_press = self.inner.long_press.borrow_mut().take();
        let pull = self.inner.pull.borrow_mut().take();
        let dismiss = self.inner.dismiss.borrow_mut().take();
        self.inner.swipe.borrow_mut().take();
        self.inner.pinch.borrow_mut().take();
        if let Some(long_press) = long_press {
            long_press.dispose();
        }
        if let Some(pull) = pull {
            pull.dispose();
        }
        if let Some(mut dismiss) = dismiss {
            dismiss.dispose();
        }
        self.inner.events.borrow_mut().clear();
        self.inner.listeners.borrow_mut().clear();
        log::debug!("gesture surface disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }
}

impl std::fmt::Debug for GestureSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureSurface")
            .field("state", &self.state())
            .field("pending_events", &self.pending_event_count())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/surface_tests.rs"]
mod tests;
