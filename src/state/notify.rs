/// Transient user-facing notifications (toasts)
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Normal,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn normal(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Normal,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.severity == Severity::Destructive
    }
}

#[derive(Debug, Clone)]
struct Toast {
    id: u64,
    notification: Notification,
    expires_at: Instant,
}

/// Stack of visible toasts, oldest first
#[derive(Debug)]
pub struct Toasts {
    items: Vec<Toast>,
    lifetime: Duration,
    next_id: u64,
}

impl Toasts {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            items: Vec::new(),
            lifetime,
            next_id: 0,
        }
    }

    /// Show a notification, returning its toast id
    pub fn push(&mut self, notification: Notification, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Toast {
            id,
            notification,
            expires_at: now + self.lifetime,
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|toast| toast.id != id);
    }

    /// Drop expired toasts
    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|toast| toast.expires_at > now);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &Notification)> {
        self.items.iter().map(|toast| (toast.id, &toast.notification))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_expire() {
        let start = Instant::now();
        let mut toasts = Toasts::new(Duration::from_secs(5));
        toasts.push(Notification::normal("a", "first"), start);
        toasts.push(
            Notification::destructive("b", "second"),
            start + Duration::from_secs(3),
        );

        toasts.prune(start + Duration::from_secs(4));
        assert_eq!(toasts.iter().count(), 2);

        toasts.prune(start + Duration::from_secs(6));
        let remaining: Vec<_> = toasts.iter().map(|(_, n)| n.title.clone()).collect();
        assert_eq!(remaining, vec!["b".to_string()]);

        toasts.prune(start + Duration::from_secs(9));
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_dismiss_by_id() {
        let now = Instant::now();
        let mut toasts = Toasts::new(Duration::from_secs(5));
        let first = toasts.push(Notification::normal("a", ""), now);
        let second = toasts.push(Notification::normal("b", ""), now);
        assert_ne!(first, second);

        toasts.dismiss(first);
        let ids: Vec<u64> = toasts.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![second]);
    }
}
