//! In-session error list and transient notifications.

use std::collections::VecDeque;

use web_time::{Duration, Instant};

/// One reported fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    /// Where it happened, e.g. `"Preview"` or `"Auto Save"`.
    pub context: String,
    pub message: String,
}

/// Faults collected during this session. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    entries: Vec<ErrorEntry>,
    visible: bool,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fault and reveal the panel.
    pub fn push(&mut self, context: impl Into<String>, message: impl Into<String>) -> &ErrorEntry {
        let entry = ErrorEntry {
            context: context.into(),
            message: message.into(),
        };
        tracing::error!(context = %entry.context, "{}", entry.message);
        self.entries.push(entry);
        self.visible = true;
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_visible(&self) -> bool {
        self.visible && !self.entries.is_empty()
    }

    /// Hide the panel. Entries are kept and reappear with the next fault.
    pub fn dismiss(&mut self) {
        self.visible = false;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub expires: Instant,
}

/// Short-lived toasts. Oldest are dropped once the limit is exceeded.
#[derive(Debug, Clone)]
pub struct Notifications {
    queue: VecDeque<Notification>,
    next_id: u64,
    limit: usize,
    lifetime: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(4, Duration::from_millis(3_500))
    }
}

impl Notifications {
    pub fn new(limit: usize, lifetime: Duration) -> Self {
        Self {
            queue: VecDeque::with_capacity(limit + 1),
            next_id: 0,
            limit: limit.max(1),
            lifetime,
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn push(&mut self, message: impl Into<String>, now: Instant) -> &Notification {
        let id = self.next_id;
        self.next_id += 1;
        self.queue.push_back(Notification {
            id,
            message: message.into(),
            expires: now + self.lifetime,
        });
        while self.queue.len() > self.limit {
            self.queue.pop_front();
        }
        &self.queue[self.queue.len() - 1]
    }

    /// Drop everything past its lifetime. Returns how many were removed.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.queue.len();
        self.queue.retain(|n| n.expires > now);
        before - self.queue.len()
    }

    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.queue.iter()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_log_dismiss() {
        let mut log = ErrorLog::new();
        assert!(!log.is_visible());
        log.push("Preview", "x is not defined");
        assert!(log.is_visible());
        log.dismiss();
        assert!(!log.is_visible());
        assert_eq!(log.len(), 1);
        log.push("Auto Save", "quota");
        assert!(log.is_visible());
        assert_eq!(log.entries()[1].context, "Auto Save");
    }

    #[test]
    fn test_notifications_capped() {
        let mut n = Notifications::default();
        let now = Instant::now();
        for i in 0..6 {
            n.push(format!("n{i}"), now);
        }
        let messages: Vec<_> = n.visible().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, ["n2", "n3", "n4", "n5"]);
    }

    #[test]
    fn test_notifications_expire() {
        let mut n = Notifications::default();
        let now = Instant::now();
        n.push("a", now);
        n.push("b", now + Duration::from_secs(2));
        assert_eq!(n.expire(now + Duration::from_millis(3_500)), 1);
        assert_eq!(n.visible().next().unwrap().message, "b");
        assert_eq!(n.expire(now + Duration::from_secs(10)), 1);
        assert!(n.is_empty());
    }
}
