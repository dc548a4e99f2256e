use std::time::Duration;

/// Coalesces bursts of requests into one, delivered once `window` has passed
/// without a newer request. Time is measured as a `Duration` since some loop
/// epoch so callers can drive it with a real or virtual clock.
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(Duration, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Replace any pending request and restart the window from `now`.
    pub fn schedule(&mut self, now: Duration, value: T) {
        self.pending = Some((now.saturating_add(self.window), value));
    }

    /// Take the pending request if its deadline has been reached.
    pub fn fire(&mut self, now: Duration) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if *deadline <= now => self.pending.take().map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|(d, _)| *d)
    }
}
