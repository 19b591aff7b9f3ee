//! One-line notifications printed to stderr, the terminal stand-in for UI toasts.

use std::fmt;

use weatherlist_core::ListError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: Kind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: Kind::Success, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { kind: Kind::Info, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: Kind::Error, message: message.into() }
    }

    pub fn show(&self) {
        eprintln!("{self}");
    }
}

impl From<&ListError> for Toast {
    fn from(err: &ListError) -> Self {
        tracing::debug!(error = %err, "list operation failed");
        Toast::error(err.user_message())
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.kind {
            Kind::Success => "✓",
            Kind::Info => "•",
            Kind::Error => "✗",
        };
        write!(f, "{marker} {}", self.message)
    }
}
