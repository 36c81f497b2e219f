use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Denied { retry_after: Duration },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed)
    }
}

#[derive(Debug)]
struct WindowSlot {
    count: u32,
    reset_at: Instant,
}

/// Fixed-window counter per client key.
///
/// Intentionally approximate: the store is process-local memory, so the limit
/// is not enforced across instances. Good enough for abuse deterrence, not
/// for strict quota enforcement. Instances are owned by the application state
/// and passed where needed; there is no global limiter.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    max: u32,
    window: Duration,
    slots: Mutex<HashMap<String, WindowSlot>>,
}

// Stale keys are swept once the map grows past this; keeps a long-lived
// process from accumulating one slot per client forever.
const SWEEP_THRESHOLD: usize = 10_000;

impl FixedWindowLimiter {
    pub fn new(max: u32, window: Duration) -> Self {
        Self {
            max,
            window,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Count a request against `key`. First request in a window (or after the
    /// window elapsed) resets the slot and is allowed; past `max` the request
    /// is denied with the time remaining until the window resets.
    pub fn check(&self, key: &str) -> RateLimitDecision {
        let now = Instant::now();
        let mut slots = self.slots.lock().expect("rate limiter lock poisoned");

        if slots.len() > SWEEP_THRESHOLD {
            slots.retain(|_, slot| slot.reset_at > now);
        }

        match slots.get_mut(key) {
            Some(slot) if now <= slot.reset_at => {
                if slot.count >= self.max {
                    RateLimitDecision::Denied {
                        retry_after: slot.reset_at - now,
                    }
                } else {
                    slot.count += 1;
                    RateLimitDecision::Allowed
                }
            }
            _ => {
                slots.insert(
                    key.to_string(),
                    WindowSlot {
                        count: 1,
                        reset_at: now + self.window,
                    },
                );
                RateLimitDecision::Allowed
            }
        }
    }
}
