//! Logical clock and deferred-task queue
//!
//! Chain-reaction staggering and the countdown are explicit tasks on a
//! logical clock rather than wall-clock timers: the host advances time, due
//! tasks fire in (due-time, schedule-order) order, and tests drive the clock
//! directly. A task scheduled by another task inside one advance window still
//! fires inside that window if its due time allows.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use super::state::OrbId;

/// Logical time-units. The browser host advances the clock with elapsed
/// milliseconds, so one unit is one millisecond there.
pub type Ticks = u64;

/// Deferred work items
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Task {
    /// Sweep neighbors of an exploded orb and schedule matching pops
    Propagate { source: OrbId },
    /// A pop triggered by a propagation sweep (non-initial explosion)
    ChainExplode { target: OrbId },
    /// Once-per-second countdown decrement
    CountdownTick,
}

/// Handle for cancelling a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    due: Ticks,
    id: TaskId,
    task: Task,
}

/// Min-ordered pending-task queue over a monotonic clock
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Ticks,
    next_id: u64,
    queue: BinaryHeap<Reverse<Entry>>,
    cancelled: HashSet<TaskId>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time
    pub fn now(&self) -> Ticks {
        self.now
    }

    /// Number of live (non-cancelled) pending tasks
    pub fn pending(&self) -> usize {
        self.queue
            .iter()
            .filter(|Reverse(e)| !self.cancelled.contains(&e.id))
            .count()
    }

    /// Enqueue `task` to fire `delay` units from now
    pub fn schedule(&mut self, delay: Ticks, task: Task) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.queue.push(Reverse(Entry {
            due: self.now + delay,
            id,
            task,
        }));
        id
    }

    /// Cancel a pending task. Unknown or already-fired ids are ignored.
    pub fn cancel(&mut self, id: TaskId) {
        self.cancelled.insert(id);
    }

    /// Pop the next task due at or before `horizon`, advancing the clock to
    /// its due time. Returns `None` once nothing is due in the window.
    pub fn pop_due(&mut self, horizon: Ticks) -> Option<(Ticks, Task)> {
        while let Some(Reverse(entry)) = self.queue.peek().copied() {
            if entry.due > horizon {
                return None;
            }
            self.queue.pop();
            if self.cancelled.remove(&entry.id) {
                continue;
            }
            self.now = self.now.max(entry.due);
            return Some((entry.due, entry.task));
        }
        None
    }

    /// Move the clock to the end of an advance window
    pub fn finish(&mut self, horizon: Ticks) {
        self.now = self.now.max(horizon);
    }

    /// Drop every pending task (session teardown)
    pub fn clear(&mut self) {
        self.queue.clear();
        self.cancelled.clear();
    }
}
