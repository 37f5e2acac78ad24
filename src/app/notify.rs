use crate::ui::renderer::StatusTone;
use std::time::{Duration, Instant};

const SUCCESS_TTL: Duration = Duration::from_secs(2);
const ERROR_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
struct Notice {
    message: String,
    tone: StatusTone,
    expires_at: Instant,
}

/// One page-level notification at a time, newest wins; expiry is polled
/// from the app tick.
#[derive(Debug, Default)]
pub struct Notifications {
    current: Option<Notice>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message, StatusTone::Success, SUCCESS_TTL);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, StatusTone::Error, ERROR_TTL);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message, StatusTone::Info, SUCCESS_TTL);
    }

    fn push(&mut self, message: impl Into<String>, tone: StatusTone, ttl: Duration) {
        self.current = Some(Notice {
            message: message.into(),
            tone,
            expires_at: Instant::now() + ttl,
        });
    }

    pub fn current(&self) -> Option<(&str, StatusTone)> {
        self.current.as_ref().map(|n| (n.message.as_str(), n.tone))
    }

    /// Drop an expired notice; true when the display changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match &self.current {
            Some(notice) if now >= notice.expires_at => {
                self.current = None;
                true
            }
            _ => false,
        }
    }
}
