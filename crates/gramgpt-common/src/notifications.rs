//! Transient, non-blocking notices (the chat's "toasts").

use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: Instant,
    pub ttl: Duration,
}

impl NotificationLevel {
    /// How long a notice of this level stays visible.
    pub fn ttl(self) -> Duration {
        match self {
            NotificationLevel::Info => Duration::from_secs(3),
            NotificationLevel::Warning => Duration::from_secs(5),
            NotificationLevel::Error => Duration::from_secs(8),
        }
    }
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            created_at: Instant::now(),
            ttl: level.ttl(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.ttl
    }
}

/// Bounded queue that drops expired notices and, when full, the oldest one.
#[derive(Debug)]
pub struct NotificationQueue {
    items: VecDeque<Notification>,
    capacity: usize,
}

impl NotificationQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, notification: Notification) {
        self.evict_expired();
        if self.items.len() >= self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(notification);
    }

    /// Removes and returns every non-expired notification, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.evict_expired();
        self.items.drain(..).collect()
    }

    fn evict_expired(&mut self) {
        self.items.retain(|n| !n.is_expired());
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(message: &str) -> Notification {
        Notification::new(NotificationLevel::Info, message)
    }

    fn messages(queue: &mut NotificationQueue) -> Vec<String> {
        queue.drain().into_iter().map(|n| n.message).collect()
    }

    #[test]
    fn ttl_grows_with_severity() {
        let warn = Notification::new(NotificationLevel::Warning, "Could not get suggestions.");
        assert_eq!(warn.ttl, Duration::from_secs(5));
        assert!(NotificationLevel::Info.ttl() < warn.ttl);
        assert!(NotificationLevel::Error.ttl() > warn.ttl);
    }

    #[test]
    fn push_evicts_oldest_at_capacity() {
        let mut queue = NotificationQueue::new(2);
        queue.push(note("one"));
        queue.push(note("two"));
        queue.push(note("three"));

        assert_eq!(messages(&mut queue), ["two", "three"]);
    }

    #[test]
    fn expired_notifications_are_dropped() {
        let mut queue = NotificationQueue::default();
        let mut stale = note("stale");
        stale.ttl = Duration::ZERO;
        queue.push(stale);
        queue.push(note("fresh"));

        assert_eq!(messages(&mut queue), ["fresh"]);
    }

    #[test]
    fn drain_empties_queue() {
        let mut queue = NotificationQueue::default();
        queue.push(note("a"));
        queue.push(Notification::new(NotificationLevel::Error, "b"));

        assert_eq!(messages(&mut queue), ["a", "b"]);
        assert!(queue.drain().is_empty());
    }
}
