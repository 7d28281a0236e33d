// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Azure AD client-credentials token acquisition for Microsoft Graph.

use super::http::{check_response_json, HttpFailure};
use crate::config::Config;
use crate::error::SyncError;
use serde::Deserialize;

/// Bearer token for Graph calls.
#[derive(Clone)]
pub struct AccessToken {
    secret: String,
    /// Lifetime in seconds as reported by the identity provider
    pub expires_in: Option<u64>,
}

impl AccessToken {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expires_in: None,
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Token response from the v2.0 token endpoint.
#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Identity provider client (application credentials, no user).
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    scope: String,
}

impl IdentityClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            token_url: format!(
                "{}/{}/oauth2/v2.0/token",
                config.authority_host, config.tenant_id
            ),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scope: config.graph_scope.clone(),
        }
    }

    /// Exchange the application credentials for a Graph bearer token.
    pub async fn acquire_token(&self) -> Result<AccessToken, SyncError> {
        tracing::debug!(url = %self.token_url, scope = %self.scope, "Requesting access token");

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", self.scope.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await
            .map_err(|e| auth_error(e.into()))?;

        let token: TokenResponse = check_response_json(response).await.map_err(auth_error)?;

        tracing::info!(expires_in = ?token.expires_in, "Access token acquired");
        Ok(AccessToken {
            secret: token.access_token,
            expires_in: token.expires_in,
        })
    }
}

fn auth_error(failure: HttpFailure) -> SyncError {
    SyncError::Auth {
        status: failure.status,
        body: failure.body,
    }
}
