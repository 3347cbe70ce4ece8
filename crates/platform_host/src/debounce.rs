//! Clock-driven debounce timer for autosave.
//!
//! The host owns the clock: it calls [`Debouncer::schedule`] on every edit and
//! [`Debouncer::poll`] from its timer tick. A later schedule replaces the pending value and
//! restarts the delay, so only the last edit in a burst is saved.

/// Pending value plus the unix millisecond deadline at which it becomes due.
#[derive(Debug, Clone, PartialEq)]
pub struct Debouncer<T> {
    delay_ms: u64,
    pending: Option<(T, u64)>,
}

impl<T> Debouncer<T> {
    /// Creates an idle debouncer with the given delay.
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Returns the configured delay.
    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Replaces any pending value and restarts the delay from `now_ms`.
    pub fn schedule(&mut self, value: T, now_ms: u64) {
        self.pending = Some((value, now_ms.saturating_add(self.delay_ms)));
    }

    /// Drops the pending value, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Returns whether a value is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the pending deadline, if any.
    pub fn deadline_ms(&self) -> Option<u64> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Takes the pending value once its deadline has passed.
    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        let due = matches!(&self.pending, Some((_, deadline)) if now_ms >= *deadline);
        if due {
            self.flush()
        } else {
            None
        }
    }

    /// Takes the pending value regardless of its deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn poll_before_deadline_keeps_value() {
        let mut debouncer = Debouncer::new(2000);
        debouncer.schedule("a", 1_000);
        assert_eq!(debouncer.poll(2_999), None);
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.poll(3_000), Some("a"));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn later_schedule_supersedes_earlier_one() {
        let mut debouncer = Debouncer::new(1000);
        debouncer.schedule(1, 0);
        debouncer.schedule(2, 900);
        assert_eq!(debouncer.poll(1_000), None);
        assert_eq!(debouncer.deadline_ms(), Some(1_900));
        assert_eq!(debouncer.poll(1_900), Some(2));
    }

    #[test]
    fn cancel_and_flush() {
        let mut debouncer = Debouncer::new(10);
        debouncer.schedule("x", 0);
        debouncer.cancel();
        assert_eq!(debouncer.poll(100), None);

        debouncer.schedule("y", 0);
        assert_eq!(debouncer.flush(), Some("y"));
        assert_eq!(debouncer.flush(), None);
    }
}
