//! Error responses from the glossary server.

use std::fmt;

use reqwest::StatusCode;

use crate::error::TermbaseError;
use crate::types::EntryId;

/// Longest server error body kept in a message
const MAX_BODY_LEN: usize = 500;

/// Kind of request that failed, deciding which error it becomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Save,
    Delete(EntryId),
    Import,
}

/// A failed request: either a non-success status or a transport error
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code, if a response arrived
    pub status: Option<StatusCode>,
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Build from an unsuccessful response, keeping a bounded excerpt of the
    /// body for context.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let body = body.trim();
        let reason = status.canonical_reason().unwrap_or("Unknown");

        let message = if body.is_empty() {
            format!("{} {}", status.as_u16(), reason)
        } else {
            let excerpt: String = body.chars().take(MAX_BODY_LEN).collect();
            format!("{} {}: {}", status.as_u16(), reason, excerpt)
        };
        Self::with_status(message, status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(StatusCode::NOT_FOUND)
    }

    pub fn into_error(self, operation: Operation) -> TermbaseError {
        match operation {
            Operation::Fetch => TermbaseError::FetchFailure(self.message),
            Operation::Save => TermbaseError::SaveFailure(self.message),
            Operation::Delete(id) => TermbaseError::DeleteFailure(id.to_string(), self.message),
            Operation::Import => TermbaseError::ImportFailure(self.message),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            format!("could not connect to glossary server: {err}")
        } else if err.is_decode() {
            format!("unexpected response from glossary server: {err}")
        } else {
            err.to_string()
        };
        Self {
            status: err.status(),
            message,
        }
    }
}
