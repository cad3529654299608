//! Toast notifications

use std::fmt;
use std::time::{Duration, Instant};

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl Severity {
    /// Background class of the toast
    pub fn class(self) -> &'static str {
        match self {
            Severity::Success => "bg-success",
            Severity::Error => "bg-danger",
            Severity::Warning => "bg-warning",
            Severity::Info => "bg-info",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Severity::Success => "bi-check-circle-fill",
            Severity::Error => "bi-exclamation-triangle-fill",
            Severity::Warning => "bi-exclamation-circle-fill",
            Severity::Info => "bi-info-circle-fill",
        }
    }

    /// Console glyph standing in for the icon
    pub fn symbol(self) -> &'static str {
        match self {
            Severity::Success => "✔",
            Severity::Error => "✖",
            Severity::Warning => "!",
            Severity::Info => "i",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub severity: Severity,
    pub message: String,
    expires_at: Instant,
}

/// Container of live toasts, oldest first
#[derive(Debug)]
pub struct NotificationCenter {
    delay: Duration,
    next_id: u64,
    toasts: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_id: 1,
            toasts: Vec::new(),
        }
    }

    /// Queue a toast that dismisses itself after the configured delay
    pub fn show(&mut self, message: impl Into<String>, severity: Severity, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        let message = message.into();
        tracing::debug!(id, %severity, %message, "Notification shown");

        self.toasts.push(Notification {
            id,
            severity,
            message,
            expires_at: now + self.delay,
        });
        id
    }

    /// Remove a toast; returns false if it was already gone
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// Drop every toast whose delay has elapsed, returning how many went
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.expires_at > now);
        before - self.toasts.len()
    }

    pub fn active(&self) -> &[Notification] {
        &self.toasts
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.toasts.last()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire_after_delay() {
        let start = Instant::now();
        let mut center = NotificationCenter::new(Duration::from_millis(4000));
        center.show("first", Severity::Success, start);
        center.show("second", Severity::Error, start + Duration::from_secs(2));

        assert_eq!(center.expire(start + Duration::from_secs(3)), 0);
        assert_eq!(center.expire(start + Duration::from_secs(4)), 1);
        assert_eq!(center.active().len(), 1);
        assert_eq!(center.active()[0].message, "second");
        assert_eq!(center.expire(start + Duration::from_secs(7)), 1);
        assert!(center.is_empty());
    }

    #[test]
    fn dismiss_removes_only_that_toast() {
        let now = Instant::now();
        let mut center = NotificationCenter::new(Duration::from_secs(4));
        let a = center.show("a", Severity::Info, now);
        let b = center.show("b", Severity::Warning, now);

        assert!(center.dismiss(a));
        assert!(!center.dismiss(a));
        assert_eq!(center.latest().map(|t| t.id), Some(b));
    }

    #[test]
    fn severity_treatments() {
        assert_eq!(Severity::default(), Severity::Info);
        assert_eq!(Severity::Info.to_string(), "info");
        assert_eq!(Severity::Error.class(), "bg-danger");
        assert_eq!(Severity::Warning.icon(), "bi-exclamation-circle-fill");
    }
}
