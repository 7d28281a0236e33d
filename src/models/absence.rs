// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Absence intervals derived from appointments.

use super::Appointment;
use chrono::{DateTime, Utc};

/// A period a team member is unavailable during a sprint.
///
/// Built one per appointment and only used as input to the capacity merge.
#[derive(Debug, Clone, PartialEq)]
pub struct AbsenceInterval {
    pub team_id: String,
    pub iteration_id: String,
    pub team_member_email: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl AbsenceInterval {
    pub fn from_appointment(team_id: &str, iteration_id: &str, appointment: &Appointment) -> Self {
        Self {
            team_id: team_id.to_string(),
            iteration_id: iteration_id.to_string(),
            team_member_email: appointment.organizer_email.clone(),
            start: appointment.start,
            end: appointment.end,
        }
    }

    /// One interval per appointment, in appointment order.
    pub fn from_appointments(
        team_id: &str,
        iteration_id: &str,
        appointments: &[Appointment],
    ) -> Vec<Self> {
        appointments
            .iter()
            .map(|a| Self::from_appointment(team_id, iteration_id, a))
            .collect()
    }
}
