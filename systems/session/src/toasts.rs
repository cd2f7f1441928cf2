//! Transient notifications. They expire on simulated frame time and never feed
//! back into the world.

use std::{collections::VecDeque, time::Duration};

/// Lifetime of a single notification.
pub const TOAST_LIFETIME: Duration = Duration::from_millis(1_400);

#[derive(Clone, Debug, PartialEq)]
struct Toast {
    text: String,
    remaining: Duration,
}

/// Queue of live notifications, oldest first.
#[derive(Clone, Debug, Default)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
}

impl ToastQueue {
    /// Queues a notification with the full lifetime.
    pub fn push(&mut self, text: impl Into<String>) {
        self.toasts.push_back(Toast {
            text: text.into(),
            remaining: TOAST_LIFETIME,
        });
    }

    /// Ages every notification by `dt` and drops the expired ones.
    pub fn advance(&mut self, dt: Duration) {
        for toast in &mut self.toasts {
            toast.remaining = toast.remaining.saturating_sub(dt);
        }
        self.toasts.retain(|toast| !toast.remaining.is_zero());
    }

    /// Texts of the live notifications, oldest first.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.toasts.iter().map(|toast| toast.text.as_str())
    }

    /// Number of live notifications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    /// Reports whether no notification is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire_after_their_lifetime() {
        let mut queue = ToastQueue::default();
        queue.push("+10 XP");
        queue.advance(Duration::from_millis(1_000));
        queue.push("Item: Dorm Key");
        assert_eq!(queue.len(), 2);

        queue.advance(Duration::from_millis(400));
        assert_eq!(queue.texts().collect::<Vec<_>>(), vec!["Item: Dorm Key"]);

        queue.advance(Duration::from_millis(1_000));
        assert!(queue.is_empty());
    }
}
