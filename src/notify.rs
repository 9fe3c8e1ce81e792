//! Toast notifications: the transient feedback every mutation ends with.

use std::sync::Mutex;

use console::style;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }
}

/// Sink for toasts. The terminal implementation prints them; tests record them.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Prints toasts to stderr with a coloured marker.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, toast: Toast) {
        let marker = match toast.level {
            ToastLevel::Success => style("✔").green().bold(),
            ToastLevel::Info => style("ℹ").cyan().bold(),
            ToastLevel::Warning => style("!").yellow().bold(),
            ToastLevel::Error => style("✘").red().bold(),
        };
        eprintln!("{} {}", marker, toast.message);
    }
}

/// Keeps every toast in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().map(|t| t.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Toast> {
        self.toasts.lock().ok().and_then(|t| t.last().cloned())
    }

    pub fn count(&self, level: ToastLevel) -> usize {
        self.toasts
            .lock()
            .map(|t| t.iter().filter(|toast| toast.level == level).count())
            .unwrap_or(0)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) {
        if let Ok(mut toasts) = self.toasts.lock() {
            toasts.push(toast);
        }
    }
}
