/// A single pending task that fires once its quiet period has elapsed.
///
/// Every [`schedule`](Debouncer::schedule) cancels the previous deadline and
/// starts a new one, so a burst of requests collapses into one firing.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay_secs: f64,
    pending: Option<Pending<T>>,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    deadline: f64,
    payload: T,
}

impl<T> Debouncer<T> {
    pub fn new(delay_secs: f64) -> Self {
        Self {
            delay_secs,
            pending: None,
        }
    }

    pub fn delay_secs(&self) -> f64 {
        self.delay_secs
    }

    /// Cancel any pending task and schedule `payload` to fire at `now + delay`.
    ///
    /// `merge` combines the payload of the cancelled task with the new one.
    pub fn schedule_with(&mut self, now: f64, payload: T, merge: impl FnOnce(T, T) -> T) {
        let payload = match self.pending.take() {
            Some(previous) => merge(previous.payload, payload),
            None => payload,
        };
        self.pending = Some(Pending {
            deadline: now + self.delay_secs,
            payload,
        });
    }

    /// Cancel any pending task and schedule `payload`.
    pub fn schedule(&mut self, now: f64, payload: T) {
        self.schedule_with(now, payload, |_, new| new);
    }

    /// Returns the payload if the deadline has passed.
    pub fn poll(&mut self, now: f64) -> Option<T> {
        match &self.pending {
            Some(pending) if now >= pending.deadline => self.pending.take().map(|p| p.payload),
            _ => None,
        }
    }

    /// Take the pending payload regardless of its deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.payload)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let mut debouncer = Debouncer::new(0.3);
        debouncer.schedule(1.0, "save");

        assert_eq!(debouncer.poll(1.2), None);
        assert_eq!(debouncer.poll(1.3), Some("save"));
        assert_eq!(debouncer.poll(2.0), None);
    }

    #[test]
    fn test_reschedule_collapses_burst() {
        let mut debouncer = Debouncer::new(0.3);
        debouncer.schedule(0.0, 1);
        debouncer.schedule(0.2, 2);
        debouncer.schedule(0.4, 3);

        // The first deadline would have been 0.3, the burst pushed it to 0.7
        assert_eq!(debouncer.poll(0.5), None);
        assert_eq!(debouncer.poll(0.7), Some(3));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_merge_combines_payloads() {
        let mut debouncer = Debouncer::new(0.3);
        debouncer.schedule(0.0, true);
        debouncer.schedule_with(0.1, false, |a, b| a && b);

        assert_eq!(debouncer.flush(), Some(false));
    }

    #[test]
    fn test_cancel() {
        let mut debouncer = Debouncer::new(0.3);
        debouncer.schedule(0.0, ());
        debouncer.cancel();
        assert_eq!(debouncer.poll(10.0), None);
    }
}
