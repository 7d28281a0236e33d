// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Sprint capacity models for Azure DevOps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Activity label written on rows adjusted for an absence.
pub const ABSENCE_ACTIVITY: &str = "Absence";

/// Per-member, per-activity capacity row.
///
/// The service reports activity either as flat `activity`/`capacityPerDay`
/// fields or as an `activities` list; whichever is present is kept, and
/// absent ones stay absent on the way back out. Fields this crate does not
/// interpret are kept in `extra` and posted back unchanged, since publishing
/// replaces the stored capacity wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityRecord {
    pub team_member_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_per_day: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<ActivityCapacity>>,
    #[serde(
        default,
        with = "crate::time_utils::capacity_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "crate::time_utils::capacity_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CapacityRecord {
    pub fn new(
        team_member_email: impl Into<String>,
        activity: impl Into<String>,
        capacity_per_day: f64,
    ) -> Self {
        Self {
            team_member_email: team_member_email.into(),
            activity: Some(activity.into()),
            capacity_per_day: Some(capacity_per_day),
            activities: None,
            start_date: None,
            end_date: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_dates(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Relabel as an absence: zero capacity under the `Absence` activity,
    /// in both the flat fields and the activity list when one is present.
    pub fn mark_absent(&mut self) {
        self.activity = Some(ABSENCE_ACTIVITY.to_string());
        self.capacity_per_day = Some(0.0);
        if let Some(activities) = self.activities.as_mut() {
            *activities = vec![ActivityCapacity {
                name: ABSENCE_ACTIVITY.to_string(),
                capacity_per_day: 0.0,
            }];
        }
    }
}

/// Capacity list as returned by the capacities endpoint.
///
/// Older API versions return a bare array; newer ones wrap it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CapacityListResponse {
    List(Vec<CapacityRecord>),
    Wrapped {
        #[serde(alias = "value")]
        capacities: Vec<CapacityRecord>,
    },
}

impl CapacityListResponse {
    pub fn into_records(self) -> Vec<CapacityRecord> {
        match self {
            CapacityListResponse::List(records) => records,
            CapacityListResponse::Wrapped { capacities } => capacities,
        }
    }
}

/// Capacity for one named activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityCapacity {
    pub name: String,
    pub capacity_per_day: f64,
}

/// Freshly constructed capacity entry, keyed by team, iteration and member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityItem {
    pub team_id: String,
    pub iteration_id: String,
    pub team_member_email: String,
    pub activities: Vec<ActivityCapacity>,
}

/// Final capacity set handed to the publisher. Serializes as a JSON list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CapacityPlan {
    /// Baseline rows with absences applied
    Adjusted(Vec<CapacityRecord>),
    /// One item per appointment, no baseline
    AbsenceOnly(Vec<CapacityItem>),
}

impl CapacityPlan {
    pub fn len(&self) -> usize {
        match self {
            CapacityPlan::Adjusted(records) => records.len(),
            CapacityPlan::AbsenceOnly(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_bare_and_wrapped_lists() {
        let bare = json!([
            {"teamMemberEmail": "a@x.com", "activity": "Development", "capacityPerDay": 6}
        ]);
        let wrapped = json!({
            "capacities": [
                {"teamMemberEmail": "a@x.com", "activity": "Development", "capacityPerDay": 6}
            ]
        });
        let value = json!({
            "value": [
                {"teamMemberEmail": "a@x.com", "activity": "Development", "capacityPerDay": 6}
            ]
        });

        for body in [bare, wrapped, value] {
            let records = serde_json::from_value::<CapacityListResponse>(body)
                .unwrap()
                .into_records();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].team_member_email, "a@x.com");
            assert_eq!(records[0].capacity_per_day, Some(6.0));
            assert!(records[0].start_date.is_none());
        }
    }

    #[test]
    fn test_unknown_fields_survive_reserialization() {
        let body = json!({
            "teamMemberEmail": "a@x.com",
            "activity": "Development",
            "capacityPerDay": 6.0,
            "startDate": "2024-01-01T00:00:00Z",
            "endDate": "2024-01-14T00:00:00Z",
            "daysOff": [{"start": "2024-01-08T00:00:00Z", "end": "2024-01-08T00:00:00Z"}],
            "teamMember": {"displayName": "A"}
        });

        let record: CapacityRecord = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(record.extra.len(), 2);
        assert_eq!(serde_json::to_value(&record).unwrap(), body);
    }

    #[test]
    fn test_activity_list_row_roundtrips_without_flat_fields() {
        let body = json!({
            "teamMember": {"uniqueName": "c@x.com"},
            "teamMemberEmail": "c@x.com",
            "activities": [{"name": "Design", "capacityPerDay": 5.0}],
            "daysOff": []
        });

        let record: CapacityRecord = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(record.activity, None);
        assert_eq!(record.capacity_per_day, None);
        assert_eq!(record.activities.as_ref().map(Vec::len), Some(1));
        assert_eq!(serde_json::to_value(&record).unwrap(), body);
    }

    #[test]
    fn test_mark_absent_zeroes_activity_list() {
        let mut record: CapacityRecord = serde_json::from_value(json!({
            "teamMemberEmail": "a@x.com",
            "activities": [
                {"name": "Development", "capacityPerDay": 6},
                {"name": "Testing", "capacityPerDay": 2}
            ]
        }))
        .unwrap();
        record.mark_absent();

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["activity"], "Absence");
        assert_eq!(value["capacityPerDay"], 0.0);
        assert_eq!(
            value["activities"],
            json!([{"name": "Absence", "capacityPerDay": 0.0}])
        );
    }

    #[test]
    fn test_plan_serializes_as_list() {
        let plan = CapacityPlan::AbsenceOnly(vec![CapacityItem {
            team_id: "team".to_string(),
            iteration_id: "it".to_string(),
            team_member_email: "b@x.com".to_string(),
            activities: vec![ActivityCapacity {
                name: "Vacation".to_string(),
                capacity_per_day: 8.0,
            }],
        }]);

        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value[0]["teamMemberEmail"], "b@x.com");
        assert_eq!(value[0]["activities"][0]["name"], "Vacation");
        assert_eq!(value[0]["activities"][0]["capacityPerDay"], 8.0);
        assert_eq!(plan.len(), 1);
    }
}
