// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types for a sync run.
//!
//! Every variant is fatal: the pipeline aborts on the first error and the
//! remote service's raw response body is carried along for diagnostics.

use crate::config::ConfigError;

/// Error raised by any stage of the sync pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Failed to acquire access token: {}", http_detail(.status, .body))]
    Auth { status: Option<u16>, body: String },

    #[error("Failed to retrieve {resource}: {}", http_detail(.status, .body))]
    Retrieval {
        resource: &'static str,
        status: Option<u16>,
        body: String,
    },

    #[error("Failed to publish sprint capacity: {}", http_detail(.status, .body))]
    Publish { status: Option<u16>, body: String },

    #[error("Iteration has {related} related iterations; expected exactly one previous sprint")]
    MissingPreviousIteration { related: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

fn http_detail(status: &Option<u16>, body: &str) -> String {
    match status {
        Some(code) => format!("HTTP {code}: {body}"),
        None => body.to_string(),
    }
}

impl SyncError {
    /// Raw response body (or transport error text) attached to a remote failure.
    pub fn body(&self) -> Option<&str> {
        match self {
            SyncError::Auth { body, .. }
            | SyncError::Retrieval { body, .. }
            | SyncError::Publish { body, .. } => Some(body),
            SyncError::MissingPreviousIteration { .. }
            | SyncError::Config(_)
            | SyncError::HttpClient(_) => None,
        }
    }

    /// HTTP status of the failing call, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            SyncError::Auth { status, .. }
            | SyncError::Retrieval { status, .. }
            | SyncError::Publish { status, .. } => *status,
            SyncError::MissingPreviousIteration { .. }
            | SyncError::Config(_)
            | SyncError::HttpClient(_) => None,
        }
    }
}

/// Result type alias for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;
