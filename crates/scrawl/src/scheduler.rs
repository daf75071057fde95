//! Single-threaded cooperative scheduling.
//!
//! The render lifecycle is driven entirely by deferred callbacks: the
//! fixed-interval readiness poll, the one-tick deferral before a freshly
//! added element is colorized, and nothing else. There is no parallel
//! execution and no locking; the shell advances a virtual clock by pumping
//! the scheduler, and due tasks run in (due time, schedule order).
//!
//! Tasks receive `&mut Scheduler` so they can re-schedule themselves,
//! which is how the fixed poll cadence is expressed.

use std::{cmp::Reverse, collections::BinaryHeap, time::Duration};

/// A deferred callback.
type Task = Box<dyn FnOnce(&mut Scheduler)>;

struct ScheduledTask {
    due: Duration,
    seq: u64,
    task: Task,
}

impl PartialEq for ScheduledTask {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTask {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

/// A deterministic virtual-clock timer queue.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use scrawl::scheduler::Scheduler;
/// use std::{cell::Cell, rc::Rc};
///
/// let mut scheduler = Scheduler::new();
/// let fired = Rc::new(Cell::new(false));
///
/// let flag = Rc::clone(&fired);
/// scheduler.schedule_after(Duration::from_millis(100), move |_| flag.set(true));
///
/// scheduler.advance(Duration::from_millis(50));
/// assert!(!fired.get());
///
/// scheduler.advance(Duration::from_millis(50));
/// assert!(fired.get());
/// ```
#[derive(Default)]
pub struct Scheduler {
    now: Duration,
    seq: u64,
    queue: BinaryHeap<Reverse<ScheduledTask>>,
}

impl Scheduler {
    /// Creates a scheduler with the clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Returns the number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Schedules `task` to run `delay` after the current virtual time.
    ///
    /// Tasks scheduled for the same instant run in schedule order.
    pub fn schedule_after(&mut self, delay: Duration, task: impl FnOnce(&mut Scheduler) + 'static) {
        self.seq += 1;
        self.queue.push(Reverse(ScheduledTask {
            due: self.now + delay,
            seq: self.seq,
            task: Box::new(task),
        }));
    }

    /// Advances the clock by `dt`, running every task that falls due.
    ///
    /// Tasks scheduled from within a running task also run if their due
    /// time still falls inside the advanced window.
    pub fn advance(&mut self, dt: Duration) {
        let target = self.now + dt;
        while let Some(Reverse(next)) = self.queue.peek() {
            if next.due > target {
                break;
            }
            let Reverse(next) = self.queue.pop().expect("peeked task is present");
            self.now = self.now.max(next.due);
            (next.task)(self);
        }
        self.now = target;
    }

    /// Runs every pending task, advancing the clock to each due time,
    /// until the queue is empty.
    pub fn run_until_idle(&mut self) {
        while let Some(Reverse(next)) = self.queue.pop() {
            self.now = self.now.max(next.due);
            (next.task)(self);
        }
    }
}
