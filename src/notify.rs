//! Non-blocking user notifications.
//!
//! Fetch failures never interrupt a page; they raise a toast that the CLI
//! prints to stderr on its next pass and that expires on its own.
//!
//! # Example
//! ```ignore
//! notifier.error("Error loading artists", "Using demo data instead.");
//! for toast in notifier.drain() {
//!     eprintln!("{toast}");
//! }
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Duration before toasts auto-dismiss
pub const TOAST_DURATION: Duration = Duration::from_secs(4);

/// Maximum number of queued toasts; older ones are dropped first
pub const MAX_VISIBLE_TOASTS: usize = 5;

/// Toast severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastLevel {
    fn marker(self) -> &'static str {
        match self {
            ToastLevel::Success => "✓",
            ToastLevel::Error => "✗",
            ToastLevel::Warning => "!",
            ToastLevel::Info => "i",
        }
    }
}

/// A single notification
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub title: String,
    pub description: String,
    created_at: Instant,
}

impl Toast {
    fn new(level: ToastLevel, title: impl Into<String>, description: impl Into<String>) -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        Self {
            id: COUNTER.fetch_add(1, Ordering::Relaxed),
            level,
            title: title.into(),
            description: description.into(),
            created_at: Instant::now(),
        }
    }

    fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= TOAST_DURATION
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{} {}", self.level.marker(), self.title)
        } else {
            write!(f, "{} {} - {}", self.level.marker(), self.title, self.description)
        }
    }
}

/// Shared notification queue. Cloning shares the queue.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    toasts: Arc<Mutex<VecDeque<Toast>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, level: ToastLevel, title: impl Into<String>, description: impl Into<String>) {
        let toast = Toast::new(level, title, description);
        match level {
            ToastLevel::Error => tracing::warn!("{}", toast),
            _ => tracing::debug!("{}", toast),
        }

        let mut toasts = self.toasts.lock();
        toasts.push_back(toast);
        while toasts.len() > MAX_VISIBLE_TOASTS {
            toasts.pop_front();
        }
    }

    pub fn success(&self, title: impl Into<String>, description: impl Into<String>) {
        self.push(ToastLevel::Success, title, description);
    }

    pub fn error(&self, title: impl Into<String>, description: impl Into<String>) {
        self.push(ToastLevel::Error, title, description);
    }

    pub fn warning(&self, title: impl Into<String>, description: impl Into<String>) {
        self.push(ToastLevel::Warning, title, description);
    }

    pub fn info(&self, title: impl Into<String>, description: impl Into<String>) {
        self.push(ToastLevel::Info, title, description);
    }

    /// Take every pending toast that hasn't expired yet.
    pub fn drain(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .drain(..)
            .filter(|t| !t.is_expired())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.toasts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
