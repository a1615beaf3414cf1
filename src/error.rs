//! Error types for the notify-zammad plugin.
//!
//! This module defines `NotifyError`, the unified error type used throughout
//! the plugin. The variants follow the failure classes a notification run can
//! hit: configuration problems, transport failures, authentication rejections,
//! protocol errors from the Zammad API, and domain errors in the notification
//! handling itself.
//!
//! No error is retried internally. Every variant is fatal and propagates to
//! the binary, which prints a single diagnostic line and exits non-zero.
//! Icinga re-sends notifications for unresolved problems, so retrying inside
//! the plugin would only risk duplicate articles.

use std::time::Duration;
use thiserror::Error;

/// Unified error type for all plugin operations.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Configuration error - missing or contradictory flags, unreadable
    /// TLS material, malformed credentials.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP client initialization failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// The request never produced a response (connection refused, DNS
    /// failure, TLS handshake error). Carries the failing URL.
    #[error("could not reach {url}: {source}")]
    Transport {
        /// The URL the request was sent to.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// Zammad rejected the credentials (HTTP 401/403).
    #[error("authentication failed for {host}")]
    Authentication {
        /// The Zammad host that rejected the request.
        host: String,
    },

    /// Zammad answered with an unexpected status code. The response body is
    /// included for diagnosis.
    #[error("unexpected response from {url}: HTTP {status} - {body}")]
    HttpStatus {
        /// The HTTP status code returned.
        status: reqwest::StatusCode,
        /// The URL of the failed request.
        url: String,
        /// The response body, potentially containing error details.
        body: String,
    },

    /// The response body could not be decoded as the expected JSON shape.
    #[error("unable to parse search results: {0}")]
    ParseResponse(#[source] serde_json::Error),

    /// The whole dispatch (or a single request) exceeded the deadline.
    #[error("timed out after {duration:?} - Zammad may be slow or unreachable")]
    Timeout {
        /// How long we waited before giving up.
        duration: Duration,
    },

    /// Input validation failed before any network call was made.
    #[error("validation error: {0}")]
    Validation(String),

    /// The notification type is not one of the supported Icinga types.
    #[error("unsupported notification type: {0}")]
    UnsupportedNotificationType(String),

    /// An acknowledgement arrived but no open or new ticket exists.
    #[error("no open or new ticket found to add acknowledgement article to")]
    NoTicketToAcknowledge,
}

impl NotifyError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        NotifyError::Config(message.into())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        NotifyError::Validation(message.into())
    }

    /// Returns true if the error was raised before any network call.
    ///
    /// Used to decide whether a failed run can have left partial state in
    /// Zammad behind.
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            NotifyError::Config(_)
                | NotifyError::Validation(_)
                | NotifyError::UnsupportedNotificationType(_)
                | NotifyError::HttpClient(_)
        )
    }
}
