//! User-facing notifications raised by glossary operations.

use std::time::Instant;

use owo_colors::AnsiColors;

use crate::enum_display_fromstr;
use crate::error::TermbaseError;

/// Severity level of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

enum_display_fromstr!(
    Severity,
    TermbaseError::invalid_severity,
    {
        Info => "info",
        Warn => "warn",
        Error => "error",
    }
);

impl Severity {
    /// Style class applied to the message. Informational messages are
    /// unstyled; warnings and errors share the danger style.
    pub fn display_class(self) -> &'static str {
        match self {
            Severity::Info => "",
            Severity::Warn | Severity::Error => "danger",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warn | Severity::Error => "warning",
        }
    }

    /// Terminal color for the CLI
    pub fn color(self) -> AnsiColors {
        match self {
            Severity::Info => AnsiColors::Cyan,
            Severity::Warn => AnsiColors::Yellow,
            Severity::Error => AnsiColors::Red,
        }
    }
}

/// A message shown to the user
#[derive(Debug, Clone)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    /// Optional longer explanation, e.g. the server's error text
    pub detail: Option<String>,
    pub timestamp: Instant,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            detail: None,
            timestamp: Instant::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(Severity::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Notification for a failed operation. Remote failures are errors with
    /// the server's message as detail; local precondition failures are
    /// warnings.
    pub fn from_error(error: &TermbaseError) -> Self {
        match error {
            TermbaseError::FetchFailure(detail) => {
                Self::error("Error loading glossary term.").with_detail(detail.clone())
            }
            TermbaseError::SaveFailure(detail) => {
                Self::error("Error saving glossary term.").with_detail(detail.clone())
            }
            TermbaseError::DeleteFailure(id, detail) => {
                Self::error(format!("Error deleting glossary term '{id}'."))
                    .with_detail(detail.clone())
            }
            TermbaseError::ImportFailure(detail) => {
                Self::error("Error importing glossary file.").with_detail(detail.clone())
            }
            TermbaseError::Http(e) => Self::error("Glossary server request failed.")
                .with_detail(e.to_string()),
            other => Self::warn(other.to_string()),
        }
    }
}
