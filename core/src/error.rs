//! Error taxonomy for remote calls and client-side validation.

use crate::model::TodoId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors surfaced by fetch and mutation operations
///
/// The pure pipeline functions never return these; they are produced by the
/// [`TodoApi`](crate::environment::TodoApi) boundary and by input validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// Non-2xx response or transport failure
    #[error("Network error{}: {message}", status_suffix(.status))]
    Network {
        /// HTTP status, absent for transport failures
        status: Option<u16>,
        /// Human readable cause
        message: String,
    },

    /// The todo does not exist on the server
    #[error("Todo {id} not found")]
    NotFound {
        /// The id that was requested
        id: TodoId,
    },

    /// Input rejected before any remote call
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Anything else
    #[error("Unknown error: {0}")]
    Unknown(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl TodoError {
    /// Builds a [`TodoError::Network`] for an HTTP status
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Network {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Builds a [`TodoError::Network`] for a transport failure
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Network {
            status: None,
            message: message.into(),
        }
    }

    /// Stable code for this error
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Network { .. } => ErrorCode::Network,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Validation(_) => ErrorCode::Validation,
            Self::Unknown(_) => ErrorCode::Unknown,
        }
    }

    /// Converts into the observable error record
    #[must_use]
    pub fn to_info(&self, timestamp: DateTime<Utc>) -> ErrorInfo {
        ErrorInfo {
            code: self.code(),
            message: self.to_string(),
            timestamp,
        }
    }
}

/// Stable error codes exposed to the presentation layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// `NETWORK_ERROR`
    #[serde(rename = "NETWORK_ERROR")]
    Network,
    /// `NOT_FOUND`
    #[serde(rename = "NOT_FOUND")]
    NotFound,
    /// `VALIDATION_ERROR`
    #[serde(rename = "VALIDATION_ERROR")]
    Validation,
    /// `UNKNOWN_ERROR`
    #[serde(rename = "UNKNOWN_ERROR")]
    Unknown,
}

impl ErrorCode {
    /// Wire form of the code
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Validation => "VALIDATION_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error record held in observable state
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error code
    pub code: ErrorCode,
    /// Human readable message
    pub message: String,
    /// When the error was recorded
    pub timestamp: DateTime<Utc>,
}
