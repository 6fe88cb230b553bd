use tokio::time::{Duration, Instant};

/// In-flight flag with a fixed hold time.
///
/// Once acquired the flag stays set until its deadline passes, whatever
/// happens in between. Callers pass the current instant so the window can be
/// driven by a synthetic clock.
#[derive(Debug, Clone)]
pub struct Debounce {
    window: Duration,
    in_flight_until: Option<Instant>,
}

impl Debounce {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            in_flight_until: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Set the flag if it is clear. Returns `false` while a previous
    /// acquisition is still in flight.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        self.expire(now);
        if self.in_flight_until.is_some() {
            return false;
        }
        self.in_flight_until = Some(now + self.window);
        true
    }

    /// Clear the flag if its deadline has passed.
    pub fn expire(&mut self, now: Instant) {
        if self.in_flight_until.is_some_and(|deadline| now >= deadline) {
            self.in_flight_until = None;
        }
    }

    /// When the flag clears, if it is set.
    pub fn deadline(&self) -> Option<Instant> {
        self.in_flight_until
    }

    pub fn is_in_flight(&self, now: Instant) -> bool {
        self.in_flight_until.is_some_and(|deadline| now < deadline)
    }
}

