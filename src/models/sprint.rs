// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Sprint (iteration) metadata from Azure DevOps team settings.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A sprint as returned by `teamsettings/iterations/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    /// Iteration ID (GUID). Not always echoed back by the service.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub attributes: SprintAttributes,
    /// Links to related iterations
    #[serde(default)]
    pub relations: Vec<IterationRelation>,
}

/// Sprint date range (inclusive calendar range).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintAttributes {
    #[serde(with = "crate::time_utils::lenient_timestamp")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "crate::time_utils::lenient_timestamp")]
    pub finish_date: DateTime<Utc>,
}

/// Link from one iteration to another.
#[derive(Debug, Clone, Deserialize)]
pub struct IterationRelation {
    pub id: String,
    #[serde(default)]
    pub rel: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Sprint {
    pub fn start_date(&self) -> DateTime<Utc> {
        self.attributes.start_date
    }

    pub fn finish_date(&self) -> DateTime<Utc> {
        self.attributes.finish_date
    }

    /// ID of the previous sprint, taken from the single related-iteration link.
    ///
    /// Returns `None` unless exactly one relation is present.
    pub fn previous_iteration_id(&self) -> Option<&str> {
        match self.relations.as_slice() {
            [only] => Some(only.id.as_str()),
            _ => None,
        }
    }
}
