use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

/// Injected time source. Every timestamp the engine assigns comes from here,
/// so tests can pin submission and creation times exactly.
pub trait Clock: Send {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock for tests: returns a fixed instant until advanced.
/// Clones share the instant, so a test can keep a handle after the engine
/// takes ownership of another.
#[derive(Clone)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn advance_seconds(&self, seconds: i64) {
        let mut guard = self.now.lock().expect("clock lock");
        *guard += chrono::Duration::seconds(seconds);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}
