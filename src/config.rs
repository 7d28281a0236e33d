// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Run configuration loaded from environment variables.
//!
//! Every identifier and credential is required; only endpoint hosts and a
//! few tuning knobs carry documented defaults. The struct is built once at
//! startup and handed to each component by reference.

use crate::services::merge::DEFAULT_ABSENCE_HOURS_PER_DAY;
use std::env;
use std::time::Duration;

const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";
const DEFAULT_GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";
const DEFAULT_DEVOPS_API_VERSION: &str = "6.0";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// How appointments are turned into the capacity that gets published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicyKind {
    /// Adjust an existing capacity baseline row by row.
    Override,
    /// Publish one fresh capacity item per appointment.
    Direct,
}

impl MergePolicyKind {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "override" => Some(Self::Override),
            "direct" => Some(Self::Direct),
            _ => None,
        }
    }
}

/// Which iteration the capacity baseline is copied from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineIteration {
    /// The single related (previous) iteration linked from the target sprint.
    Previous,
    /// The target sprint itself.
    Current,
}

impl BaselineIteration {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "previous" => Some(Self::Previous),
            "current" => Some(Self::Current),
            _ => None,
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Clone)]
pub struct Config {
    // --- Identity provider ---
    /// Azure AD application (client) ID
    pub client_id: String,
    /// Azure AD application client secret
    pub client_secret: String,
    /// Azure AD tenant ID
    pub tenant_id: String,
    /// Identity provider host, without tenant path
    pub authority_host: String,
    /// Scope requested for the Graph token
    pub graph_scope: String,

    // --- Azure DevOps ---
    /// Organization/project base URI, e.g. `https://dev.azure.com/org/project`
    pub devops_base_uri: String,
    /// Personal access token
    pub devops_pat: String,
    pub team_id: String,
    pub iteration_id: String,
    pub devops_api_version: String,

    // --- Microsoft Teams / Graph ---
    pub graph_base_url: String,
    pub teams_group_id: String,
    pub teams_channel_id: String,

    // --- Behaviour ---
    pub merge_policy: MergePolicyKind,
    pub baseline_iteration: BaselineIteration,
    /// Capacity-per-day placeholder used by the direct policy
    pub absence_hours_per_day: f64,
    pub http_timeout: Duration,
    /// Skip the final publish and only report what would be posted
    pub dry_run: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("tenant_id", &self.tenant_id)
            .field("authority_host", &self.authority_host)
            .field("graph_scope", &self.graph_scope)
            .field("devops_base_uri", &self.devops_base_uri)
            .field("devops_pat", &"<redacted>")
            .field("team_id", &self.team_id)
            .field("iteration_id", &self.iteration_id)
            .field("devops_api_version", &self.devops_api_version)
            .field("graph_base_url", &self.graph_base_url)
            .field("teams_group_id", &self.teams_group_id)
            .field("teams_channel_id", &self.teams_channel_id)
            .field("merge_policy", &self.merge_policy)
            .field("baseline_iteration", &self.baseline_iteration)
            .field("absence_hours_per_day", &self.absence_hours_per_day)
            .field("http_timeout", &self.http_timeout)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Used by `from_env` and by tests that must not touch process state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let optional = |name: &'static str| -> Option<String> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let merge_policy = {
            let raw = required("MERGE_POLICY")?;
            MergePolicyKind::parse(&raw).ok_or_else(|| {
                ConfigError::invalid(
                    "MERGE_POLICY",
                    format!("expected 'override' or 'direct', got '{raw}'"),
                )
            })?
        };

        let baseline_iteration = match optional("BASELINE_ITERATION") {
            None => BaselineIteration::Previous,
            Some(raw) => BaselineIteration::parse(&raw).ok_or_else(|| {
                ConfigError::invalid(
                    "BASELINE_ITERATION",
                    format!("expected 'previous' or 'current', got '{raw}'"),
                )
            })?,
        };

        let absence_hours_per_day = match optional("ABSENCE_HOURS_PER_DAY") {
            None => DEFAULT_ABSENCE_HOURS_PER_DAY,
            Some(raw) => match raw.parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 0.0 => v,
                _ => {
                    return Err(ConfigError::invalid(
                        "ABSENCE_HOURS_PER_DAY",
                        format!("expected a non-negative number, got '{raw}'"),
                    ))
                }
            },
        };

        let http_timeout = match optional("HTTP_TIMEOUT_SECS") {
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::invalid(
                        "HTTP_TIMEOUT_SECS",
                        format!("expected a positive number of seconds, got '{raw}'"),
                    ))
                }
            },
        };

        let dry_run = match optional("DRY_RUN") {
            None => false,
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                ConfigError::invalid("DRY_RUN", format!("expected true/false, got '{raw}'"))
            })?,
        };

        Ok(Self {
            client_id: required("AZURE_CLIENT_ID")?,
            client_secret: required("AZURE_CLIENT_SECRET")?,
            tenant_id: required("AZURE_TENANT_ID")?,
            authority_host: base_url(
                "AZURE_AUTHORITY_HOST",
                optional("AZURE_AUTHORITY_HOST")
                    .unwrap_or_else(|| DEFAULT_AUTHORITY_HOST.to_string()),
            )?,
            graph_scope: optional("GRAPH_SCOPE").unwrap_or_else(|| DEFAULT_GRAPH_SCOPE.to_string()),
            devops_base_uri: base_url("DEVOPS_BASE_URI", required("DEVOPS_BASE_URI")?)?,
            devops_pat: required("DEVOPS_PAT")?,
            team_id: required("DEVOPS_TEAM_ID")?,
            iteration_id: required("DEVOPS_ITERATION_ID")?,
            devops_api_version: optional("DEVOPS_API_VERSION")
                .unwrap_or_else(|| DEFAULT_DEVOPS_API_VERSION.to_string()),
            graph_base_url: base_url(
                "GRAPH_BASE_URL",
                optional("GRAPH_BASE_URL").unwrap_or_else(|| DEFAULT_GRAPH_BASE_URL.to_string()),
            )?,
            teams_group_id: required("TEAMS_GROUP_ID")?,
            teams_channel_id: required("TEAMS_CHANNEL_ID")?,
            merge_policy,
            baseline_iteration,
            absence_hours_per_day,
            http_timeout,
            dry_run,
        })
    }

    /// Config for testing only. Every endpoint points at `base_url`.
    pub fn test_default(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            client_id: "test_client_id".to_string(),
            client_secret: "test_client_secret".to_string(),
            tenant_id: "test-tenant".to_string(),
            authority_host: base_url.clone(),
            graph_scope: DEFAULT_GRAPH_SCOPE.to_string(),
            devops_base_uri: base_url.clone(),
            devops_pat: "test_pat".to_string(),
            team_id: "team-1".to_string(),
            iteration_id: "sprint-42".to_string(),
            devops_api_version: DEFAULT_DEVOPS_API_VERSION.to_string(),
            graph_base_url: base_url,
            teams_group_id: "group-1".to_string(),
            teams_channel_id: "channel-1".to_string(),
            merge_policy: MergePolicyKind::Override,
            baseline_iteration: BaselineIteration::Previous,
            absence_hours_per_day: DEFAULT_ABSENCE_HOURS_PER_DAY,
            http_timeout: Duration::from_secs(5),
            dry_run: false,
        }
    }
}

/// Validate an absolute http(s) URL and strip any trailing slash.
fn base_url(var: &'static str, raw: String) -> Result<String, ConfigError> {
    let parsed = reqwest::Url::parse(&raw)
        .map_err(|e| ConfigError::invalid(var, format!("not a valid URL: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(
            var,
            format!("unsupported scheme '{}'", parsed.scheme()),
        ));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(var: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            reason: reason.into(),
        }
    }
}
