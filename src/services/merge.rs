// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Absence/capacity merge engine.
//!
//! Two policies turn the sprint's appointments into the capacity that gets
//! published:
//! - `OverrideMatching` adjusts a baseline capacity list. Each baseline row
//!   whose member has an absence is relabelled `Absence`, zeroed (activity
//!   list included), and spread over the full days of the *first* matching
//!   appointment. Other rows pass
//!   through untouched, and absences with no baseline row are not published.
//! - `DirectConstruction` ignores any baseline and emits one capacity item
//!   per appointment, named after its subject, with a fixed hours-per-day
//!   placeholder.

use crate::config::{Config, MergePolicyKind};
use crate::models::{
    AbsenceInterval, ActivityCapacity, Appointment, CapacityItem, CapacityPlan, CapacityRecord,
};
use crate::time_utils::{end_of_day_inclusive, start_of_day};

/// Hours-per-day written by the direct policy unless configured otherwise.
pub const DEFAULT_ABSENCE_HOURS_PER_DAY: f64 = 8.0;

/// Selected merge strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MergePolicy {
    /// Adjust existing capacity rows (first matching absence wins).
    OverrideMatching,
    /// Replace capacity with one item per appointment.
    DirectConstruction { hours_per_day: f64 },
}

impl MergePolicy {
    pub fn from_config(config: &Config) -> Self {
        match config.merge_policy {
            MergePolicyKind::Override => MergePolicy::OverrideMatching,
            MergePolicyKind::Direct => MergePolicy::DirectConstruction {
                hours_per_day: config.absence_hours_per_day,
            },
        }
    }

    /// Whether this policy reads a baseline capacity list.
    pub fn needs_baseline(&self) -> bool {
        matches!(self, MergePolicy::OverrideMatching)
    }

    pub fn name(&self) -> &'static str {
        match self {
            MergePolicy::OverrideMatching => "override",
            MergePolicy::DirectConstruction { .. } => "direct",
        }
    }
}

/// Team and iteration the merged capacity belongs to.
#[derive(Debug, Clone, Copy)]
pub struct MergeScope<'a> {
    pub team_id: &'a str,
    pub iteration_id: &'a str,
}

/// Result of a merge: the plan to publish plus bookkeeping for the report.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub plan: CapacityPlan,
    /// Baseline rows rewritten as absences (override policy only)
    pub adjusted: usize,
    /// Members with absences but no baseline row, in first-seen order
    pub unmatched_members: Vec<String>,
}

/// Merge appointments into capacity according to `policy`.
///
/// `baseline` is ignored by the direct policy.
pub fn merge_absences(
    policy: MergePolicy,
    baseline: Vec<CapacityRecord>,
    appointments: &[Appointment],
    scope: MergeScope<'_>,
) -> MergeOutcome {
    match policy {
        MergePolicy::OverrideMatching => {
            let absences =
                AbsenceInterval::from_appointments(scope.team_id, scope.iteration_id, appointments);
            let unmatched_members = members_without_baseline(&baseline, &absences);
            let (records, adjusted) = apply_absences(baseline, &absences);
            MergeOutcome {
                plan: CapacityPlan::Adjusted(records),
                adjusted,
                unmatched_members,
            }
        }
        MergePolicy::DirectConstruction { hours_per_day } => {
            let items = build_absence_items(appointments, scope, hours_per_day);
            MergeOutcome {
                plan: CapacityPlan::AbsenceOnly(items),
                adjusted: 0,
                unmatched_members: Vec::new(),
            }
        }
    }
}

/// Apply absences to baseline rows, keeping row order.
///
/// Returns the rows and how many of them matched an absence.
pub fn apply_absences(
    mut baseline: Vec<CapacityRecord>,
    absences: &[AbsenceInterval],
) -> (Vec<CapacityRecord>, usize) {
    let mut adjusted = 0;
    for record in &mut baseline {
        // First match only; later absences for the same member are ignored.
        let Some(absence) = absences
            .iter()
            .find(|a| a.team_member_email == record.team_member_email)
        else {
            continue;
        };

        record.mark_absent();
        record.start_date = Some(start_of_day(absence.start));
        record.end_date = Some(end_of_day_inclusive(absence.end));
        adjusted += 1;
    }
    (baseline, adjusted)
}

/// One capacity item per appointment; duplicates per organizer are kept.
pub fn build_absence_items(
    appointments: &[Appointment],
    scope: MergeScope<'_>,
    hours_per_day: f64,
) -> Vec<CapacityItem> {
    appointments
        .iter()
        .map(|appointment| CapacityItem {
            team_id: scope.team_id.to_string(),
            iteration_id: scope.iteration_id.to_string(),
            team_member_email: appointment.organizer_email.clone(),
            activities: vec![ActivityCapacity {
                name: appointment.subject.clone(),
                capacity_per_day: hours_per_day,
            }],
        })
        .collect()
}

fn members_without_baseline(
    baseline: &[CapacityRecord],
    absences: &[AbsenceInterval],
) -> Vec<String> {
    let mut missing: Vec<String> = Vec::new();
    for absence in absences {
        let email = &absence.team_member_email;
        let in_baseline = baseline.iter().any(|r| &r.team_member_email == email);
        if !in_baseline && !missing.contains(email) {
            missing.push(email.clone());
        }
    }
    missing
}
