//! Cooperative timers
//!
//! The deck never sleeps or spawns threads. The host passes its frame clock in
//! milliseconds and the scheduler hands back whatever became due. Deferred work
//! is data, so teardown can cancel it.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Identifier of a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Identifier of a running counter animation
pub type CounterId = usize;

/// Deferred work the deck knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Task {
    /// Check the slide that is active when the task fires for reveals
    RevealCheck,

    /// Advance one counter animation by a single step
    CounterTick(CounterId),
}

// Ordered by deadline, then insertion id
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    due_ms: u64,
    id: TimerId,
    task: Task,
}

/// Timer queue driven by an external clock
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Reverse<Entry>>,
    cancelled: Vec<TimerId>,
    next_id: u64,
}

impl Scheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to run `delay_ms` after `now_ms`
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64, task: Task) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.queue.push(Reverse(Entry {
            due_ms: now_ms.saturating_add(delay_ms),
            id,
            task,
        }));
        id
    }

    /// Remove and return every task due at `now_ms`, earliest first
    pub fn due(&mut self, now_ms: u64) -> Vec<Task> {
        let mut ready = Vec::new();
        while let Some(Reverse(entry)) = self.queue.peek() {
            if entry.due_ms > now_ms {
                break;
            }
            let Some(Reverse(entry)) = self.queue.pop() else {
                break;
            };
            if let Some(pos) = self.cancelled.iter().position(|id| *id == entry.id) {
                self.cancelled.swap_remove(pos);
                continue;
            }
            ready.push(entry.task);
        }
        ready
    }

    /// Cancel a single task; unknown or already fired ids are ignored
    pub fn cancel(&mut self, id: TimerId) {
        if self.queue.iter().any(|Reverse(entry)| entry.id == id) && !self.cancelled.contains(&id) {
            self.cancelled.push(id);
        }
    }

    /// Drop every pending task
    pub fn cancel_all(&mut self) {
        self.queue.clear();
        self.cancelled.clear();
    }

    /// Number of tasks still waiting to fire
    pub fn pending(&self) -> usize {
        self.queue.len() - self.cancelled.len()
    }

    /// Deadline of the earliest pending task
    pub fn next_deadline(&self) -> Option<u64> {
        self.queue
            .iter()
            .filter(|Reverse(entry)| !self.cancelled.contains(&entry.id))
            .map(|Reverse(entry)| entry.due_ms)
            .min()
    }
}

/// Lock window that follows a slide transition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CooldownTimer {
    deadline_ms: Option<u64>,
}

impl CooldownTimer {
    /// Start (or restart) the window
    pub fn start(&mut self, now_ms: u64, duration_ms: u64) {
        self.deadline_ms = Some(now_ms.saturating_add(duration_ms));
    }

    /// Whether a window is running
    pub fn is_running(&self) -> bool {
        self.deadline_ms.is_some()
    }

    /// Whether the running window has elapsed at `now_ms`
    pub fn expired(&self, now_ms: u64) -> bool {
        matches!(self.deadline_ms, Some(deadline) if now_ms >= deadline)
    }

    /// Stop the window without it ever expiring
    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }

    /// When the window ends
    pub fn deadline(&self) -> Option<u64> {
        self.deadline_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_in_deadline_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0, 300, Task::RevealCheck);
        scheduler.schedule(0, 16, Task::CounterTick(1));
        scheduler.schedule(0, 16, Task::CounterTick(2));

        assert!(scheduler.due(15).is_empty());
        assert_eq!(scheduler.due(16), vec![Task::CounterTick(1), Task::CounterTick(2)]);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.due(1_000), vec![Task::RevealCheck]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_cancel_single_task() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(0, 10, Task::RevealCheck);
        scheduler.schedule(0, 20, Task::CounterTick(0));

        scheduler.cancel(id);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.next_deadline(), Some(20));
        assert_eq!(scheduler.due(100), vec![Task::CounterTick(0)]);
    }

    #[test]
    fn test_cancel_all() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0, 10, Task::RevealCheck);
        scheduler.schedule(5, 10, Task::RevealCheck);
        scheduler.cancel_all();

        assert_eq!(scheduler.pending(), 0);
        assert!(scheduler.due(u64::MAX).is_empty());
    }

    #[test]
    fn test_cooldown_window() {
        let mut cooldown = CooldownTimer::default();
        assert!(!cooldown.is_running());

        cooldown.start(1_000, 800);
        assert!(cooldown.is_running());
        assert!(!cooldown.expired(1_799));
        assert!(cooldown.expired(1_800));

        cooldown.cancel();
        assert!(!cooldown.expired(u64::MAX));
    }
}
