//! Transient user-facing messages.
//!
//! Collaborator failures never leave the panel as errors alone: each one is
//! also queued here as an error notification for the host to display.

use std::collections::VecDeque;

use serde::Serialize;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// One message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.level {
            NotificationLevel::Success => write!(f, "{}", self.message),
            NotificationLevel::Error => write!(f, "error: {}", self.message),
        }
    }
}

/// FIFO queue of pending notifications.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    queue: VecDeque<Notification>,
}

impl Notifications {
    pub fn success(&mut self, message: impl Into<String>) {
        self.queue.push_back(Notification {
            level: NotificationLevel::Success,
            message: message.into(),
        });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.queue.push_back(Notification {
            level: NotificationLevel::Error,
            message: message.into(),
        });
    }

    /// Take every pending notification, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.queue.drain(..).collect()
    }

    /// Pending notifications without consuming them.
    pub fn pending(&self) -> impl Iterator<Item = &Notification> {
        self.queue.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_in_order_and_empties() {
        let mut n = Notifications::default();
        n.success("Filters applied");
        n.error("delete records failed: offline");
        let drained = n.drain();
        assert_eq!(drained.len(), 2);
        assert!(!drained[0].is_error());
        assert_eq!(drained[1].to_string(), "error: delete records failed: offline");
        assert!(n.drain().is_empty());
    }
}
