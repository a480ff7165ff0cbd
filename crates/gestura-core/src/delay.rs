use crate::runtime::{RuntimeHandle, TimerRegistration};
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

struct DelayState {
    registration: Option<TimerRegistration>,
    fired_at: Option<i64>,
    waker: Option<Waker>,
}

/// Future that resolves with the runtime time once `delay_ms` has elapsed.
///
/// The timer is armed on first poll. If the runtime is gone the future never
/// resolves; dropping it cancels the timer.
pub struct Delay {
    runtime: RuntimeHandle,
    delay_ms: i64,
    state: Rc<RefCell<DelayState>>,
}

impl Delay {
    pub(crate) fn new(runtime: RuntimeHandle, delay_ms: i64) -> Self {
        Self {
            runtime,
            delay_ms,
            state: Rc::new(RefCell::new(DelayState {
                registration: None,
                fired_at: None,
                waker: None,
            })),
        }
    }
}

impl Future for Delay {
    type Output = i64;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(time) = self.state.borrow().fired_at {
            return Poll::Ready(time);
        }

        let needs_registration = {
            let mut state = self.state.borrow_mut();
            state.waker = Some(cx.waker().clone());
            state.registration.is_none()
        };
        if needs_registration {
            let weak = Rc::downgrade(&self.state);
            let registration = self.runtime.set_timeout(self.delay_ms, move |time| {
                if let Some(state) = weak.upgrade() {
                    let waker = {
                        let mut state = state.borrow_mut();
                        state.fired_at = Some(time);
                        state.registration.take();
                        state.waker.take()
                    };
                    if let Some(waker) = waker {
                        waker.wake();
                    }
                }
            });
            self.state.borrow_mut().registration = Some(registration);
        }

        match self.state.borrow().fired_at {
            Some(time) => Poll::Ready(time),
            None => Poll::Pending,
        }
    }
}

impl Drop for Delay {
    fn drop(&mut self) {
        let registration = self.state.borrow_mut().registration.take();
        drop(registration);
    }
}

impl RuntimeHandle {
    pub fn delay(&self, delay_ms: i64) -> Delay {
        Delay::new(self.clone(), delay_ms)
    }
}
