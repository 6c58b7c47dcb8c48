//! Fire-and-forget user notifications.

use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// Where success and error messages go. Nothing is returned to the caller.
pub trait Toast {
    fn success(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// Keeps notifications in order, for printing after a command or in tests.
/// Each one is also logged.
#[derive(Debug, Default)]
pub struct RecordingToast {
    pub messages: Vec<(ToastKind, String)>,
}

impl RecordingToast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&(ToastKind, String)> {
        self.messages.last()
    }
}

impl Toast for RecordingToast {
    fn success(&mut self, message: &str) {
        info!(toast = "success", "{}", message);
        self.messages.push((ToastKind::Success, message.to_string()));
    }

    fn error(&mut self, message: &str) {
        warn!(toast = "error", "{}", message);
        self.messages.push((ToastKind::Error, message.to_string()));
    }
}
