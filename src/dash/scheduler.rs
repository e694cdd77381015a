//! Delayed tasks on the frame clock

use std::time::Duration;

/// Handle for cancelling a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskToken(u64);

#[derive(Debug)]
struct Scheduled<T> {
    token: TaskToken,
    due: Duration,
    task: T,
}

/// Tasks that fire once the host clock reaches their due time
#[derive(Debug)]
pub struct Scheduler<T> {
    next_token: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            next_token: 0,
            pending: Vec::new(),
        }
    }

    /// Schedules `task` to fire at or after `due`
    pub fn schedule(&mut self, due: Duration, task: T) -> TaskToken {
        let token = TaskToken(self.next_token);
        self.next_token += 1;
        self.pending.push(Scheduled { token, due, task });
        token
    }

    /// Cancels a task; returns false if it already fired or was cancelled
    pub fn cancel(&mut self, token: TaskToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|scheduled| scheduled.token != token);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Removes and returns every task due at `now`, earliest first
    pub fn drain_due(&mut self, now: Duration) -> Vec<(TaskToken, T)> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|scheduled| scheduled.due <= now);
        self.pending = pending;

        // Stable sort keeps scheduling order for equal due times
        due.sort_by_key(|scheduled| scheduled.due);
        due.into_iter()
            .map(|scheduled| (scheduled.token, scheduled.task))
            .collect()
    }

    pub fn is_pending(&self, token: TaskToken) -> bool {
        self.pending.iter().any(|scheduled| scheduled.token == token)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_tasks_fire_at_due_time_in_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(300), "late");
        scheduler.schedule(ms(100), "early");

        assert!(scheduler.drain_due(ms(99)).is_empty());

        let fired: Vec<_> = scheduler.drain_due(ms(300)).into_iter().map(|(_, t)| t).collect();
        assert_eq!(fired, vec!["early", "late"]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_cancelled_task_never_fires() {
        let mut scheduler = Scheduler::new();
        let token = scheduler.schedule(ms(100), 1);
        scheduler.schedule(ms(100), 2);

        assert!(scheduler.cancel(token));
        assert!(!scheduler.cancel(token));
        assert!(!scheduler.is_pending(token));

        let fired: Vec<_> = scheduler.drain_due(ms(100)).into_iter().map(|(_, t)| t).collect();
        assert_eq!(fired, vec![2]);
    }

    #[test]
    fn test_tokens_are_unique() {
        let mut scheduler = Scheduler::new();
        let a = scheduler.schedule(ms(0), ());
        let b = scheduler.schedule(ms(0), ());
        assert_ne!(a, b);
    }
}
