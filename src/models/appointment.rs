// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar appointments from a Teams channel calendar (Microsoft Graph).

use crate::time_utils::{resolve_zoned_timestamp, ZonedTimestampError};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One calendar event, reduced to what the capacity merge needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    /// Organizer email address (the absent team member)
    pub organizer_email: String,
    /// Event subject/title
    pub subject: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// `calendarView` response page.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphEventsResponse {
    #[serde(default)]
    pub value: Vec<GraphEvent>,
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

/// Raw Graph event as returned by `calendarView`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub organizer: Option<GraphRecipient>,
    pub start: GraphDateTime,
    pub end: GraphDateTime,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphRecipient {
    pub email_address: GraphEmailAddress,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphEmailAddress {
    #[serde(default)]
    pub address: Option<String>,
}

/// Graph timestamp: a naive local time plus the zone it is expressed in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDateTime {
    pub date_time: String,
    #[serde(default)]
    pub time_zone: Option<String>,
}

impl GraphDateTime {
    pub fn to_utc(&self) -> Result<DateTime<Utc>, ZonedTimestampError> {
        resolve_zoned_timestamp(&self.date_time, self.time_zone.as_deref())
    }
}

impl GraphEvent {
    /// Organizer address, trimmed; `None` when missing or blank.
    pub fn organizer_email(&self) -> Option<&str> {
        self.organizer
            .as_ref()
            .and_then(|o| o.email_address.address.as_deref())
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }

    /// Convert to an [`Appointment`] with UTC times.
    ///
    /// `Ok(None)` for events with no organizer address, which cannot be
    /// attributed to a team member.
    pub fn into_appointment(self) -> Result<Option<Appointment>, ZonedTimestampError> {
        let Some(organizer_email) = self.organizer_email().map(str::to_string) else {
            return Ok(None);
        };
        Ok(Some(Appointment {
            organizer_email,
            subject: self.subject.unwrap_or_default(),
            start: self.start.to_utc()?,
            end: self.end.to_utc()?,
        }))
    }
}
