// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sync pipeline: calendar absences into sprint capacity.
//!
//! Stages and their inputs:
//! 1. Graph token and sprint metadata (independent, fetched together)
//! 2. Appointments (token + sprint dates) and baseline capacity (sprint
//!    links; override policy only), fetched together
//! 3. Merge (appointments + baseline)
//! 4. Publish (merged plan), skipped on dry runs
//!
//! Any error aborts the run before the publish stage.

use super::devops::DevOpsClient;
use super::graph::GraphClient;
use super::http::build_http_client;
use super::identity::IdentityClient;
use super::merge::{merge_absences, MergePolicy, MergeScope};
use crate::config::{BaselineIteration, Config};
use crate::error::{Result, SyncError};
use crate::models::{CapacityPlan, CapacityRecord, Sprint};
use chrono::{DateTime, Utc};

/// What a run did.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub iteration_id: String,
    pub sprint_start: DateTime<Utc>,
    pub sprint_finish: DateTime<Utc>,
    pub policy: &'static str,
    /// Iteration the baseline capacity was copied from, if one was read
    pub baseline_iteration_id: Option<String>,
    pub appointments: usize,
    pub adjusted: usize,
    pub unmatched_members: Vec<String>,
    /// The capacity that was (or, on a dry run, would have been) posted
    pub plan: CapacityPlan,
    pub published: bool,
}

/// One configured sync run.
pub struct SyncPipeline {
    config: Config,
    policy: MergePolicy,
    identity: IdentityClient,
    devops: DevOpsClient,
    graph: GraphClient,
}

impl SyncPipeline {
    /// Build the pipeline and its HTTP clients from configuration.
    pub fn new(config: Config) -> Result<Self> {
        let http = build_http_client(&config)?;
        Ok(Self {
            policy: MergePolicy::from_config(&config),
            identity: IdentityClient::new(http.clone(), &config),
            devops: DevOpsClient::new(http.clone(), &config),
            graph: GraphClient::new(http, &config),
            config,
        })
    }

    /// Run every stage once.
    pub async fn run(&self) -> Result<SyncReport> {
        let team_id = self.config.team_id.as_str();
        let iteration_id = self.config.iteration_id.as_str();
        tracing::info!(
            team_id,
            iteration_id,
            policy = self.policy.name(),
            "Starting capacity sync"
        );

        // Stage 1
        let (token, sprint) = tokio::try_join!(
            self.identity.acquire_token(),
            self.devops.get_iteration(team_id, iteration_id)
        )?;

        // Stage 2
        let baseline_iteration_id = self.baseline_iteration_id(&sprint)?;
        let (appointments, baseline) = tokio::try_join!(
            self.graph
                .calendar_view(&token, sprint.start_date(), sprint.finish_date()),
            self.fetch_baseline(baseline_iteration_id.as_deref())
        )?;

        // Stage 3
        let outcome = merge_absences(
            self.policy,
            baseline,
            &appointments,
            MergeScope {
                team_id,
                iteration_id,
            },
        );
        for member in &outcome.unmatched_members {
            tracing::warn!(
                member = %member,
                "Absent member has no baseline capacity row; not published"
            );
        }
        tracing::info!(
            records = outcome.plan.len(),
            adjusted = outcome.adjusted,
            "Capacity merged"
        );

        // Stage 4
        let published = if self.config.dry_run {
            tracing::info!("Dry run: skipping capacity publish");
            false
        } else {
            self.devops
                .replace_capacities(team_id, iteration_id, &outcome.plan)
                .await?;
            true
        };

        Ok(SyncReport {
            iteration_id: iteration_id.to_string(),
            sprint_start: sprint.start_date(),
            sprint_finish: sprint.finish_date(),
            policy: self.policy.name(),
            baseline_iteration_id,
            appointments: appointments.len(),
            adjusted: outcome.adjusted,
            unmatched_members: outcome.unmatched_members,
            plan: outcome.plan,
            published,
        })
    }

    /// Which iteration to copy baseline capacity from, if the policy needs one.
    fn baseline_iteration_id(&self, sprint: &Sprint) -> Result<Option<String>> {
        if !self.policy.needs_baseline() {
            return Ok(None);
        }
        match self.config.baseline_iteration {
            BaselineIteration::Current => Ok(Some(self.config.iteration_id.clone())),
            BaselineIteration::Previous => sprint
                .previous_iteration_id()
                .map(|id| Some(id.to_string()))
                .ok_or(SyncError::MissingPreviousIteration {
                    related: sprint.relations.len(),
                }),
        }
    }

    async fn fetch_baseline(&self, iteration_id: Option<&str>) -> Result<Vec<CapacityRecord>> {
        match iteration_id {
            Some(id) => self.devops.get_capacities(&self.config.team_id, id).await,
            None => Ok(Vec::new()),
        }
    }
}
