//! Cancellable delayed events on the tick timeline.
//!
//! Delays are expressed in ticks. Due events are popped one at a time in
//! `(due, id)` order, so an event handler that cancels the remaining timers
//! prevents them from firing within the same tick.

/// Handle for a scheduled event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

#[derive(Clone, Debug, PartialEq, Eq)]
struct Pending<E> {
    id: TimerId,
    due: u64,
    event: E,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scheduler<E> {
    now: u64,
    next_id: u64,
    pending: Vec<Pending<E>>,
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Current tick.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Schedules `event` to fire `delay` ticks from now.
    pub fn schedule(&mut self, delay: u64, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due: self.now + delay,
            event,
        });
        id
    }

    /// Returns true if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|pending| pending.id != id);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Moves the clock forward by one tick.
    pub fn advance(&mut self) {
        self.now += 1;
    }

    /// Removes and returns the earliest event due at or before now.
    pub fn pop_due(&mut self) -> Option<E> {
        let now = self.now;
        let (index, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, pending)| pending.due <= now)
            .min_by_key(|(_, pending)| (pending.due, pending.id))?;
        Some(self.pending.remove(index).event)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_delay() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(2, "slash");
        scheduler.advance();
        assert_eq!(scheduler.pop_due(), None);
        scheduler.advance();
        assert_eq!(scheduler.pop_due(), Some("slash"));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn pops_in_due_then_insertion_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(3, "c");
        scheduler.schedule(1, "a");
        scheduler.schedule(1, "b");
        for _ in 0..3 {
            scheduler.advance();
        }
        assert_eq!(scheduler.pop_due(), Some("a"));
        assert_eq!(scheduler.pop_due(), Some("b"));
        assert_eq!(scheduler.pop_due(), Some("c"));
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut scheduler = Scheduler::new();
        let slash = scheduler.schedule(1, "slash");
        scheduler.schedule(1, "damage");
        assert!(scheduler.cancel(slash));
        assert!(!scheduler.cancel(slash));
        scheduler.advance();
        assert_eq!(scheduler.pop_due(), Some("damage"));

        scheduler.schedule(1, "late");
        scheduler.cancel_all();
        scheduler.advance();
        assert_eq!(scheduler.pop_due(), None);
    }
}
