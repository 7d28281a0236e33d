// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Azure DevOps work-tracking client.
//!
//! Handles:
//! - Sprint (iteration) metadata reads
//! - Capacity reads for any iteration
//! - Capacity publish (full replacement, no patching)

use super::http::{check_response, check_response_json, HttpFailure};
use crate::config::Config;
use crate::error::SyncError;
use crate::models::capacity::CapacityListResponse;
use crate::models::{CapacityPlan, CapacityRecord, Sprint};

/// Azure DevOps API client authenticated with a personal access token.
#[derive(Clone)]
pub struct DevOpsClient {
    http: reqwest::Client,
    base_uri: String,
    pat: String,
    api_version: String,
}

impl DevOpsClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            base_uri: config.devops_base_uri.clone(),
            pat: config.devops_pat.clone(),
            api_version: config.devops_api_version.clone(),
        }
    }

    fn iteration_url(&self, team_id: &str, iteration_id: &str) -> String {
        format!(
            "{}/{}/_apis/work/teamsettings/iterations/{}",
            self.base_uri, team_id, iteration_id
        )
    }

    fn capacities_url(&self, team_id: &str, iteration_id: &str) -> String {
        format!("{}/capacities", self.iteration_url(team_id, iteration_id))
    }

    /// Get sprint dates (and related-iteration links) for an iteration.
    pub async fn get_iteration(
        &self,
        team_id: &str,
        iteration_id: &str,
    ) -> Result<Sprint, SyncError> {
        let url = self.iteration_url(team_id, iteration_id);
        let mut sprint: Sprint = self
            .get_json(&url)
            .await
            .map_err(|f| retrieval_error("sprint iteration", f))?;

        if sprint.id.is_empty() {
            sprint.id = iteration_id.to_string();
        }

        tracing::info!(
            iteration_id,
            start = %sprint.start_date(),
            finish = %sprint.finish_date(),
            related = sprint.relations.len(),
            "Sprint dates retrieved"
        );
        Ok(sprint)
    }

    /// Get the stored capacity rows of an iteration.
    pub async fn get_capacities(
        &self,
        team_id: &str,
        iteration_id: &str,
    ) -> Result<Vec<CapacityRecord>, SyncError> {
        let url = self.capacities_url(team_id, iteration_id);
        let response: CapacityListResponse = self
            .get_json(&url)
            .await
            .map_err(|f| retrieval_error("sprint capacity", f))?;

        let records = response.into_records();
        tracing::info!(iteration_id, count = records.len(), "Capacity retrieved");
        Ok(records)
    }

    /// Replace the iteration's capacity with `plan`.
    pub async fn replace_capacities(
        &self,
        team_id: &str,
        iteration_id: &str,
        plan: &CapacityPlan,
    ) -> Result<(), SyncError> {
        let url = self.capacities_url(team_id, iteration_id);
        tracing::debug!(url = %url, count = plan.len(), "Posting capacity");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.pat)
            .query(&[("api-version", self.api_version.as_str())])
            .json(plan)
            .send()
            .await
            .map_err(|e| publish_error(e.into()))?;

        check_response(response).await.map_err(publish_error)?;
        tracing::info!(iteration_id, count = plan.len(), "Capacity published");
        Ok(())
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, HttpFailure> {
        tracing::debug!(url, "GET");
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.pat)
            .query(&[("api-version", self.api_version.as_str())])
            .send()
            .await?;

        check_response_json(response).await
    }
}

fn retrieval_error(resource: &'static str, failure: HttpFailure) -> SyncError {
    SyncError::Retrieval {
        resource,
        status: failure.status,
        body: failure.body,
    }
}

fn publish_error(failure: HttpFailure) -> SyncError {
    SyncError::Publish {
        status: failure.status,
        body: failure.body,
    }
}
