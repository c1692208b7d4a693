//! Task and job queue management.
//!
//! Two levels of deferred work live here:
//! - [`Task`]s belong to the host (see [`EventLoop`](crate::EventLoop)) and run
//!   one per turn.
//! - [`Job`]s belong to a [`JobQueue`]. Settling a future never runs user code
//!   directly; it schedules jobs, and the queue drains them in FIFO order from
//!   a task it arms through the [`Host`].

use core_types::JsError;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use tracing::trace;

/// A unit of host work, such as a timer callback or a queue flush.
pub struct Task {
    callback: Box<dyn FnOnce() -> Result<(), JsError>>,
}

impl Task {
    /// Creates a new Task from a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> Result<(), JsError> + 'static,
    {
        Self {
            callback: Box::new(f),
        }
    }

    /// Executes the task.
    pub fn run(self) -> Result<(), JsError> {
        (self.callback)()
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task {{ ... }}")
    }
}

/// A FIFO queue of host tasks.
#[derive(Debug, Default)]
pub struct TaskQueue {
    queue: VecDeque<Task>,
}

impl TaskQueue {
    /// Creates a new empty TaskQueue.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Adds a task to the end of the queue.
    pub fn enqueue(&mut self, task: Task) {
        self.queue.push_back(task);
    }

    /// Removes and returns the next task from the queue.
    pub fn dequeue(&mut self) -> Option<Task> {
        self.queue.pop_front()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of tasks in the queue.
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

/// The host's "run later" primitive.
///
/// `run_later` must not run the task before returning.
pub trait Host {
    /// Queues `task` to run after the current synchronous execution unit.
    fn run_later(&self, task: Task);
}

/// A deferred reaction or resolution step.
///
/// Jobs return nothing: every failure inside a job has already been turned
/// into a rejection by the code that built it.
pub struct Job {
    callback: Box<dyn FnOnce()>,
}

impl Job {
    /// Creates a new Job from a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            callback: Box::new(f),
        }
    }

    /// Executes the job.
    pub fn run(self) {
        (self.callback)()
    }
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Job {{ ... }}")
    }
}

/// FIFO queue of jobs with a single armed flush.
///
/// # Examples
///
/// ```
/// use future_runtime::{EventLoop, Job, JobQueue};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let event_loop = Rc::new(EventLoop::new());
/// let queue = JobQueue::new(event_loop.clone());
/// let log = Rc::new(RefCell::new(Vec::new()));
///
/// let l = log.clone();
/// queue.schedule(Job::new(move || l.borrow_mut().push("job")));
/// log.borrow_mut().push("sync");
///
/// event_loop.run_until_done().unwrap();
/// assert_eq!(*log.borrow(), vec!["sync", "job"]);
/// ```
pub struct JobQueue {
    jobs: RefCell<VecDeque<Job>>,
    armed: Cell<bool>,
    flushing: Cell<bool>,
    host: Rc<dyn Host>,
    this: Weak<JobQueue>,
}

impl JobQueue {
    /// Creates an idle queue that arms its flushes through `host`.
    pub fn new(host: Rc<dyn Host>) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            jobs: RefCell::new(VecDeque::new()),
            armed: Cell::new(false),
            flushing: Cell::new(false),
            host,
            this: this.clone(),
        })
    }

    /// Appends `job`. If no flush is pending, one is armed with the host.
    pub fn schedule(&self, job: Job) {
        self.jobs.borrow_mut().push_back(job);
        if !self.armed.replace(true) {
            let this = self.this.clone();
            self.host.run_later(Task::new(move || {
                if let Some(queue) = this.upgrade() {
                    queue.flush();
                }
                Ok(())
            }));
        }
    }

    /// Runs jobs until the queue is empty, including jobs scheduled by the
    /// jobs being run. Returns the number of jobs executed.
    ///
    /// A call made from inside a running job returns 0; the outer drain picks
    /// up everything.
    pub fn flush(&self) -> usize {
        if self.flushing.replace(true) {
            return 0;
        }
        let mut ran = 0;
        loop {
            // The borrow ends before the job runs so that it can schedule more.
            let job = self.jobs.borrow_mut().pop_front();
            match job {
                Some(job) => {
                    job.run();
                    ran += 1;
                }
                None => break,
            }
        }
        self.armed.set(false);
        self.flushing.set(false);
        trace!(jobs = ran, "flushed job queue");
        ran
    }

    /// Returns the number of jobs waiting to run.
    pub fn len(&self) -> usize {
        self.jobs.borrow().len()
    }

    /// Returns true if no job is waiting.
    pub fn is_empty(&self) -> bool {
        self.jobs.borrow().is_empty()
    }

    /// Returns true while a flush is pending with the host.
    pub fn is_armed(&self) -> bool {
        self.armed.get()
    }
}

impl std::fmt::Debug for JobQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobQueue")
            .field("len", &self.len())
            .field("armed", &self.armed.get())
            .finish()
    }
}
