// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sprint Absence Sync
//!
//! One-shot run: reads absences from a Teams channel calendar and posts
//! the resulting capacity to an Azure DevOps sprint.

use anyhow::Context;
use sprint_absence_sync::{config::Config, SyncPipeline};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Structured JSON logs on stderr; stdout carries the result only
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!(config = ?config, "Configuration loaded");

    let pipeline = SyncPipeline::new(config).context("Failed to initialize sync pipeline")?;

    let report = match pipeline.run().await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, "Capacity sync failed");
            return Err(e.into());
        }
    };

    tracing::info!(
        iteration_id = %report.iteration_id,
        policy = report.policy,
        appointments = report.appointments,
        records = report.plan.len(),
        adjusted = report.adjusted,
        unmatched = report.unmatched_members.len(),
        "Capacity sync finished"
    );

    if report.published {
        println!("Capacity posted to Azure DevOps sprint successfully.");
    } else {
        let payload =
            serde_json::to_string_pretty(&report.plan).context("Failed to render capacity plan")?;
        println!("{payload}");
        println!("Dry run: capacity was not posted.");
    }
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true)
        .with_writer(std::io::stderr);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sprint_absence_sync=debug"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
