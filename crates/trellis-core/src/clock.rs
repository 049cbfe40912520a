//! Time sources.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use web_time::{Duration, Instant};

/// Monotonic time for timers plus wall time for saved records.
pub trait Clock {
    fn now(&self) -> Instant;

    fn wall(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wall(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Rc<ManualInner>,
}

#[derive(Debug)]
struct ManualInner {
    start: Instant,
    wall_start: DateTime<Utc>,
    elapsed: Cell<Duration>,
}

impl ManualClock {
    pub fn new(wall_start: DateTime<Utc>) -> Self {
        Self {
            inner: Rc::new(ManualInner {
                start: Instant::now(),
                wall_start,
                elapsed: Cell::new(Duration::ZERO),
            }),
        }
    }

    pub fn advance(&self, by: Duration) {
        let elapsed = &self.inner.elapsed;
        elapsed.set(elapsed.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.inner.start + self.inner.elapsed.get()
    }

    fn wall(&self) -> DateTime<Utc> {
        let elapsed = chrono::Duration::from_std(self.inner.elapsed.get())
            .unwrap_or(chrono::Duration::zero());
        self.inner.wall_start + elapsed
    }
}
