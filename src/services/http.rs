// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared HTTP plumbing for the remote clients.

use crate::config::Config;
use serde::de::DeserializeOwned;

/// Build the single HTTP client shared by every remote call in a run.
pub fn build_http_client(config: &Config) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.http_timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// A response that did not come back as expected.
///
/// `status` is `None` for transport failures, where `body` holds the
/// transport error text instead of a response body.
#[derive(Debug)]
pub struct HttpFailure {
    pub status: Option<u16>,
    pub body: String,
}

impl From<reqwest::Error> for HttpFailure {
    fn from(err: reqwest::Error) -> Self {
        Self {
            status: err.status().map(|s| s.as_u16()),
            body: err.to_string(),
        }
    }
}

/// Check response status and return the raw body on success.
///
/// The body is read as text first so it can be attached to errors verbatim.
pub async fn check_response(response: reqwest::Response) -> Result<String, HttpFailure> {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if status.is_success() {
        return Ok(body);
    }

    if status.as_u16() == 429 {
        tracing::warn!("Remote rate limit hit (429)");
    }

    Err(HttpFailure {
        status: Some(status.as_u16()),
        body,
    })
}

/// Check response and parse JSON body.
pub async fn check_response_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, HttpFailure> {
    let status = response.status().as_u16();
    let body = check_response(response).await?;
    serde_json::from_str(&body).map_err(|e| HttpFailure {
        status: Some(status),
        body: format!("JSON parse error: {e}; body: {body}"),
    })
}
