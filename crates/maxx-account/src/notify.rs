use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// How long a notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

static TOAST_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Warning,
    Info,
}

/// A user-facing outcome produced by a flow, not yet placed on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: ToastLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Warning,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Info,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToastMessage {
    pub id: u64,
    pub level: ToastLevel,
    pub text: String,
    pub created_at: Instant,
}

impl ToastMessage {
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) > NOTICE_TTL
    }
}

/// Ephemeral, non-blocking notices in arrival order.
#[derive(Debug, Default, Clone)]
pub struct Toasts {
    items: Vec<ToastMessage>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) -> u64 {
        let id = TOAST_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.items.push(ToastMessage {
            id,
            level: notice.level,
            text: notice.text,
            created_at: Instant::now(),
        });
        id
    }

    pub fn clear_expired(&mut self) {
        self.clear_expired_at(Instant::now());
    }

    pub fn clear_expired_at(&mut self, now: Instant) {
        self.items.retain(|t| !t.is_expired_at(now));
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToastMessage> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn last(&self) -> Option<&ToastMessage> {
        self.items.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_expire_after_ttl() {
        let mut toasts = Toasts::new();
        toasts.push(Notice::success("Profile updated successfully!"));
        toasts.push(Notice::error("Failed to update profile. Please try again."));
        assert_eq!(toasts.len(), 2);

        let created = toasts.last().unwrap().created_at;
        toasts.clear_expired_at(created + Duration::from_secs(4));
        assert_eq!(toasts.len(), 2);

        toasts.clear_expired_at(created + NOTICE_TTL + Duration::from_millis(1));
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut toasts = Toasts::new();
        let a = toasts.push(Notice::info("a"));
        let b = toasts.push(Notice::info("b"));
        assert_ne!(a, b);
    }
}
