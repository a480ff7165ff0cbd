use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use smallvec::SmallVec;

use crate::platform::{Clock, DefaultScheduler, RuntimeScheduler};
use crate::{TaskId, TimerId};

type TimerCallback = Rc<RefCell<Box<dyn FnMut(i64) + 'static>>>;

struct TimerEntry {
    id: TimerId,
    due_ms: i64,
    period_ms: Option<i64>,
    callback: TimerCallback,
}

struct TaskEntry {
    id: TaskId,
    future: Pin<Box<dyn Future<Output = ()> + 'static>>,
}

struct RuntimeInner {
    scheduler: Arc<dyn RuntimeScheduler>,
    clock: Option<Rc<dyn Clock>>,
    now_ms: Cell<i64>,
    advancing: Cell<bool>,
    timers: RefCell<SmallVec<[TimerEntry; 4]>>,
    next_timer_id: Cell<TimerId>,
    tasks: RefCell<Vec<TaskEntry>>,
    // Tasks cancelled while taken out of `tasks` for polling.
    cancelled_in_poll: RefCell<SmallVec<[TaskId; 2]>>,
    next_task_id: Cell<TaskId>,
    task_waker: RefCell<Option<Waker>>,
}

impl RuntimeInner {
    fn new(
        scheduler: Arc<dyn RuntimeScheduler>,
        clock: Option<Rc<dyn Clock>>,
        start_ms: i64,
    ) -> Self {
        Self {
            scheduler,
            clock,
            now_ms: Cell::new(start_ms),
            advancing: Cell::new(false),
            timers: RefCell::new(SmallVec::new()),
            next_timer_id: Cell::new(1),
            tasks: RefCell::new(Vec::new()),
            cancelled_in_poll: RefCell::new(SmallVec::new()),
            next_task_id: Cell::new(1),
            task_waker: RefCell::new(None),
        }
    }

    fn init_task_waker(this: &Rc<Self>) {
        let waker = RuntimeTaskWaker::new(this.scheduler.clone()).into_waker();
        *this.task_waker.borrow_mut() = Some(waker);
    }

    /// Moves `now_ms` up to the host clock without firing timers. Overdue
    /// timers still fire, at their due time, on the next advance. Skipped
    /// while advancing so callbacks observe their own firing time.
    fn catch_up(&self) -> i64 {
        if let Some(clock) = &self.clock {
            if !self.advancing.get() {
                let now = clock.now_ms();
                if now > self.now_ms.get() {
                    log::trace!("runtime clock caught up {} -> {now}", self.now_ms.get());
                    self.now_ms.set(now);
                }
            }
        }
        self.now_ms.get()
    }

    fn register_timer(
        &self,
        delay_ms: i64,
        period_ms: Option<i64>,
        callback: Box<dyn FnMut(i64) + 'static>,
    ) -> TimerId {
        let id = self.next_timer_id.get();
        self.next_timer_id.set(id + 1);
        self.timers.borrow_mut().push(TimerEntry {
            id,
            due_ms: self.catch_up() + delay_ms.max(0),
            period_ms: period_ms.map(|period| period.max(1)),
            callback: Rc::new(RefCell::new(callback)),
        });
        self.scheduler.schedule_pump();
        id
    }

    fn cancel_timer(&self, id: TimerId) {
        let removed = {
            let mut timers = self.timers.borrow_mut();
            timers
                .iter()
                .position(|entry| entry.id == id)
                .map(|index| timers.remove(index))
        };
        // Dropped outside the borrow: the closure may own handles that call back in.
        drop(removed);
    }

    fn next_due_ms(&self) -> Option<i64> {
        self.timers.borrow().iter().map(|entry| entry.due_ms).min()
    }

    /// Pops the earliest timer due at or before `target_ms`, rescheduling
    /// periodic timers, and returns its callback with the firing time.
    fn take_due_timer(&self, target_ms: i64) -> Option<(TimerCallback, i64)> {
        let mut timers = self.timers.borrow_mut();
        let index = timers
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due_ms <= target_ms)
            .min_by_key(|(_, entry)| (entry.due_ms, entry.id))
            .map(|(index, _)| index)?;
        let fire_at = timers[index].due_ms;
        let callback = timers[index].callback.clone();
        match timers[index].period_ms {
            Some(period) => timers[index].due_ms += period,
            None => {
                timers.remove(index);
            }
        }
        Some((callback, fire_at))
    }

    fn advance_to(&self, target_ms: i64) {
        if self.advancing.replace(true) {
            log::warn!("advance_to({target_ms}) called re-entrantly from a timer callback; ignored");
            return;
        }
        let target_ms = target_ms.max(self.now_ms.get());
        // Tasks spawned since the last pump observe the current time first.
        self.drain_tasks();
        while let Some((callback, fire_at)) = self.take_due_timer(target_ms) {
            self.now_ms.set(fire_at.max(self.now_ms.get()));
            if let Ok(mut callback) = callback.try_borrow_mut() {
                (&mut **callback)(fire_at);
            }
            self.drain_tasks();
        }
        self.now_ms.set(target_ms);
        self.advancing.set(false);
        self.drain_tasks();
    }

    fn spawn_task(&self, future: Pin<Box<dyn Future<Output = ()> + 'static>>) -> TaskId {
        let id = self.next_task_id.get();
        self.next_task_id.set(id + 1);
        self.tasks.borrow_mut().push(TaskEntry { id, future });
        self.scheduler.schedule_pump();
        id
    }

    fn cancel_task(&self, id: TaskId) {
        let removed = {
            let mut tasks = self.tasks.borrow_mut();
            match tasks.iter().position(|entry| entry.id == id) {
                Some(index) => Some(tasks.remove(index)),
                None => {
                    self.cancelled_in_poll.borrow_mut().push(id);
                    None
                }
            }
        };
        drop(removed);
    }

    fn is_task_live(&self, id: TaskId) -> bool {
        self.tasks.borrow().iter().any(|entry| entry.id == id)
    }

    fn poll_tasks(&self) -> bool {
        let waker = match self.task_waker.borrow().as_ref() {
            Some(waker) => waker.clone(),
            None => return false,
        };
        let mut cx = Context::from_waker(&waker);
        let tasks = std::mem::take(&mut *self.tasks.borrow_mut());
        let mut pending = Vec::with_capacity(tasks.len());
        let mut made_progress = false;
        for mut entry in tasks {
            if self.cancelled_in_poll.borrow().contains(&entry.id) {
                made_progress = true;
                continue;
            }
            match entry.future.as_mut().poll(&mut cx) {
                Poll::Ready(()) => made_progress = true,
                Poll::Pending => pending.push(entry),
            }
        }
        let cancelled = std::mem::take(&mut *self.cancelled_in_poll.borrow_mut());
        pending.retain(|entry| !cancelled.contains(&entry.id));
        if !pending.is_empty() {
            let mut tasks = self.tasks.borrow_mut();
            // Tasks spawned while polling were pushed onto the now-empty list.
            pending.append(&mut tasks);
            *tasks = pending;
        }
        made_progress
    }

    fn drain_tasks(&self) {
        while self.poll_tasks() {}
    }
}

/// Single-threaded runtime that owns every timer and async task armed by
/// gesture controllers.
///
/// Time is virtual: it only moves when the host calls [`Runtime::advance_to`]
/// or [`Runtime::advance_by`]. Controllers keep a [`RuntimeHandle`], which is
/// weak; once the runtime is dropped every handle operation becomes a no-op
/// and no callback can fire.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self::starting_at(scheduler, 0)
    }

    /// Creates a runtime whose clock starts at `start_ms`.
    pub fn starting_at(scheduler: Arc<dyn RuntimeScheduler>, start_ms: i64) -> Self {
        Self::build(scheduler, None, start_ms)
    }

    /// Creates a runtime that follows a host clock.
    ///
    /// Reading the time or arming a timer first catches the runtime up to
    /// `clock`, so a timer armed after an idle stretch is measured from the
    /// real present rather than from the last advance.
    pub fn with_clock(scheduler: Arc<dyn RuntimeScheduler>, clock: Rc<dyn Clock>) -> Self {
        let start_ms = clock.now_ms();
        Self::build(scheduler, Some(clock), start_ms)
    }

    fn build(
        scheduler: Arc<dyn RuntimeScheduler>,
        clock: Option<Rc<dyn Clock>>,
        start_ms: i64,
    ) -> Self {
        let inner = Rc::new(RuntimeInner::new(scheduler, clock, start_ms));
        RuntimeInner::init_task_waker(&inner);
        Self { inner }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn now_ms(&self) -> i64 {
        self.inner.catch_up()
    }

    /// Moves the clock forward to `target_ms`, firing due timers in order and
    /// polling async tasks after each one. Time never moves backwards.
    pub fn advance_to(&self, target_ms: i64) {
        self.inner.advance_to(target_ms);
    }

    pub fn advance_by(&self, delta_ms: i64) {
        self.advance_to(self.now_ms() + delta_ms.max(0));
    }

    /// Polls async tasks until none of them makes progress.
    pub fn drain_ui(&self) {
        self.inner.drain_tasks();
    }

    pub fn next_timer_due_ms(&self) -> Option<i64> {
        self.inner.next_due_ms()
    }

    pub fn pending_timer_count(&self) -> usize {
        self.inner.timers.borrow().len()
    }

    pub fn pending_task_count(&self) -> usize {
        self.inner.tasks.borrow().len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending_timer_count() == 0 && self.pending_task_count() == 0
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(Arc::new(DefaultScheduler))
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("now_ms", &self.now_ms())
            .field("timers", &self.pending_timer_count())
            .field("tasks", &self.pending_task_count())
            .finish()
    }
}

#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
}

impl RuntimeHandle {
    /// A handle that is not attached to any runtime.
    pub fn detached() -> Self {
        Self { inner: Weak::new() }
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Current runtime time, or `None` after the runtime has been dropped.
    pub fn now_ms(&self) -> Option<i64> {
        self.inner.upgrade().map(|inner| inner.catch_up())
    }

    /// Runs `callback` once, `delay_ms` after now.
    pub fn set_timeout(
        &self,
        delay_ms: i64,
        callback: impl FnOnce(i64) + 'static,
    ) -> TimerRegistration {
        let mut callback = Some(callback);
        self.register(delay_ms, None, move |time| {
            if let Some(callback) = callback.take() {
                callback(time);
            }
        })
    }

    /// Runs `callback` every `period_ms`, first at now + `period_ms`.
    pub fn set_interval(
        &self,
        period_ms: i64,
        callback: impl FnMut(i64) + 'static,
    ) -> TimerRegistration {
        self.register(period_ms, Some(period_ms), callback)
    }

    fn register(
        &self,
        delay_ms: i64,
        period_ms: Option<i64>,
        callback: impl FnMut(i64) + 'static,
    ) -> TimerRegistration {
        match self.inner.upgrade() {
            Some(inner) => {
                let id = inner.register_timer(delay_ms, period_ms, Box::new(callback));
                TimerRegistration::new(self.clone(), id)
            }
            None => TimerRegistration::inactive(self.clone()),
        }
    }

    pub fn cancel_timer(&self, id: TimerId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_timer(id);
        }
    }

    pub fn spawn_ui<F>(&self, fut: F) -> Option<TaskHandle>
    where
        F: Future<Output = ()> + 'static,
    {
        self.inner.upgrade().map(|inner| {
            let id = inner.spawn_task(Box::pin(fut));
            TaskHandle {
                id,
                runtime: self.clone(),
            }
        })
    }

    pub fn cancel_task(&self, id: TaskId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_task(id);
        }
    }

    fn is_timer_live(&self, id: TimerId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.timers.borrow().iter().any(|entry| entry.id == id))
            .unwrap_or(false)
    }

    fn is_task_live(&self, id: TaskId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.is_task_live(id))
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for RuntimeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// Keeps an armed timer alive. Dropping the registration cancels the timer.
pub struct TimerRegistration {
    runtime: RuntimeHandle,
    id: Option<TimerId>,
}

impl TimerRegistration {
    fn new(runtime: RuntimeHandle, id: TimerId) -> Self {
        Self {
            runtime,
            id: Some(id),
        }
    }

    fn inactive(runtime: RuntimeHandle) -> Self {
        Self { runtime, id: None }
    }

    /// Whether the timer is still scheduled. A fired timeout is not active.
    pub fn is_active(&self) -> bool {
        self.id
            .map(|id| self.runtime.is_timer_live(id))
            .unwrap_or(false)
    }

    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_timer(id);
        }
    }
}

impl Drop for TimerRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_timer(id);
        }
    }
}

impl std::fmt::Debug for TimerRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerRegistration")
            .field("id", &self.id)
            .finish()
    }
}

/// Handle to a spawned async task. Cancelling drops the future in place.
#[derive(Debug)]
pub struct TaskHandle {
    id: TaskId,
    runtime: RuntimeHandle,
}

impl TaskHandle {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.runtime.is_task_live(self.id)
    }

    pub fn cancel(self) {
        self.runtime.cancel_task(self.id);
    }
}

struct RuntimeTaskWaker {
    scheduler: Arc<dyn RuntimeScheduler>,
}

impl RuntimeTaskWaker {
    fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self { scheduler }
    }

    fn into_waker(self) -> Waker {
        futures_task::waker(Arc::new(self))
    }
}

impl futures_task::ArcWake for RuntimeTaskWaker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.scheduler.schedule_pump();
    }
}
