//! Event loop implementation.
//!
//! The event loop is the host that job queues arm their flushes with. It also
//! owns a virtual clock so that drivers can model timers without real time
//! passing.

use crate::task_queue::{Host, Task, TaskQueue};
use core_types::JsError;
use std::cell::{Cell, RefCell};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use tracing::trace;

/// Identifier returned by [`EventLoop::set_timeout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct Timer {
    fire_at: u64,
    id: TimerId,
    task: Task,
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Timer {}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.fire_at, self.id.0).cmp(&(other.fire_at, other.id.0))
    }
}

/// A single-threaded event loop with a virtual clock.
///
/// Each turn runs one task. Ready tasks run in FIFO order; once none are
/// left, the clock jumps to the earliest timer. Timers due at the same
/// instant fire in the order they were set.
///
/// # Examples
///
/// ```
/// use future_runtime::{EventLoop, Task};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let event_loop = EventLoop::new();
/// let order = Rc::new(RefCell::new(Vec::new()));
///
/// let o = order.clone();
/// event_loop.set_timeout(100, Task::new(move || { o.borrow_mut().push("late"); Ok(()) }));
/// let o = order.clone();
/// event_loop.set_timeout(10, Task::new(move || { o.borrow_mut().push("early"); Ok(()) }));
///
/// event_loop.run_until_done().unwrap();
/// assert_eq!(*order.borrow(), vec!["early", "late"]);
/// assert_eq!(event_loop.now(), 100);
/// ```
#[derive(Default)]
pub struct EventLoop {
    task_queue: RefCell<TaskQueue>,
    timers: RefCell<BinaryHeap<Reverse<Timer>>>,
    now: Cell<u64>,
    next_timer_id: Cell<u64>,
}

impl EventLoop {
    /// Creates a new EventLoop with empty queues and the clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a task to the ready queue.
    pub fn enqueue_task(&self, task: Task) {
        self.task_queue.borrow_mut().enqueue(task);
    }

    /// Schedules `task` to run once the clock reaches `now + delay_ms`,
    /// saturating at `u64::MAX`.
    pub fn set_timeout(&self, delay_ms: u64, task: Task) -> TimerId {
        let id = TimerId(self.next_timer_id.get());
        self.next_timer_id.set(id.0 + 1);
        let fire_at = self.now.get().saturating_add(delay_ms);
        self.timers
            .borrow_mut()
            .push(Reverse(Timer { fire_at, id, task }));
        trace!(timer = id.0, fire_at, "timer set");
        id
    }

    /// Returns the current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now.get()
    }

    /// Returns true if the ready queue is empty.
    pub fn is_task_queue_empty(&self) -> bool {
        self.task_queue.borrow().is_empty()
    }

    /// Returns the number of timers that have not fired yet.
    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Runs one task: the next ready task, or else the earliest timer.
    ///
    /// Returns `Ok(false)` when there was nothing to run.
    pub fn process_one_cycle(&self) -> Result<bool, JsError> {
        match self.next_task() {
            Some(task) => {
                task.run()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Runs the event loop until no tasks or timers remain.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all tasks completed successfully, or the first task error.
    pub fn run_until_done(&self) -> Result<(), JsError> {
        while self.process_one_cycle()? {}
        Ok(())
    }

    fn next_task(&self) -> Option<Task> {
        if let Some(task) = self.task_queue.borrow_mut().dequeue() {
            return Some(task);
        }
        let Reverse(timer) = self.timers.borrow_mut().pop()?;
        self.now.set(self.now.get().max(timer.fire_at));
        trace!(timer = timer.id.0, now = self.now.get(), "timer fired");
        Some(timer.task)
    }
}

impl Host for EventLoop {
    fn run_later(&self, task: Task) {
        self.enqueue_task(task);
    }
}

impl std::fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoop")
            .field("now", &self.now.get())
            .field("ready", &self.task_queue.borrow().len())
            .field("timers", &self.timers.borrow().len())
            .finish()
    }
}
