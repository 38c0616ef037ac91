//! Error types for the lock run.
//!
//! [`TrackerError`] is produced by the issue tracker port and is serializable
//! so that failures survive cassette recording and replay. [`LockifyError`]
//! is what a run ultimately fails with.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A failed call against the remote issue tracker.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrackerError {
    /// The server answered with a non-success status.
    #[error("{method} {url} failed with HTTP {status}: {message}")]
    Http {
        /// HTTP method of the failed request.
        method: String,
        /// The requested URL.
        url: String,
        /// Response status code.
        status: u16,
        /// Server-provided message, or the raw body when none was given.
        message: String,
    },

    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("{method} {url} failed: {message}")]
    Transport {
        /// HTTP method of the failed request.
        method: String,
        /// The requested URL.
        url: String,
        /// Underlying client error.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response from {url}: {message}")]
    Decode {
        /// The requested URL.
        url: String,
        /// Decoder error.
        message: String,
    },
}

impl TrackerError {
    /// The HTTP status, when the failure came from a server response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Decode { .. } => None,
        }
    }
}

/// Errors that end a lock run.
#[derive(Debug, Error)]
pub enum LockifyError {
    /// A fetch or lock call failed. Never retried.
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// Owner or repository could not be determined.
    #[error("{0}")]
    Usage(String),

    /// The configured API root is not a usable base URL.
    #[error("invalid API URL {url}: {message}")]
    InvalidApiUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        message: String,
    },

    /// Writing the report to the output stream failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
