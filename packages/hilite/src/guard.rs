use std::collections::HashMap;
use std::time::Duration;

use web_time::Instant;

/// Per-key in-flight flags which release themselves after a fixed window.
///
/// Used to absorb duplicate requests (e.g. two remove-by-id messages for the same
/// highlight) that arrive before the first one has settled.
#[derive(Debug)]
pub struct InFlightGuard {
    window: Duration,
    in_flight: HashMap<String, Instant>,
}

impl InFlightGuard {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            in_flight: HashMap::new(),
        }
    }

    /// Claim `key`. Returns false if it is already claimed and the claim hasn't expired.
    pub fn try_acquire(&mut self, key: &str, now: Instant) -> bool {
        match self.in_flight.get(key) {
            Some(&started) if now.saturating_duration_since(started) < self.window => false,
            _ => {
                self.in_flight.insert(key.to_string(), now);
                true
            }
        }
    }

    pub fn is_in_flight(&self, key: &str, now: Instant) -> bool {
        self.in_flight
            .get(key)
            .is_some_and(|&started| now.saturating_duration_since(started) < self.window)
    }

    pub fn release(&mut self, key: &str) {
        self.in_flight.remove(key);
    }

    /// Drop every claim whose window has passed
    pub fn expire(&mut self, now: Instant) {
        let window = self.window;
        self.in_flight
            .retain(|_, started| now.saturating_duration_since(*started) < window);
    }

    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }
}
