// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Microsoft Graph client for the Teams channel calendar.

use super::http::{check_response_json, HttpFailure};
use super::identity::AccessToken;
use crate::config::Config;
use crate::error::SyncError;
use crate::models::appointment::GraphEventsResponse;
use crate::models::Appointment;
use crate::time_utils::format_utc_query;
use chrono::{DateTime, Utc};

/// Ask Graph to express event times in UTC.
const OUTLOOK_TIMEZONE_HEADER: &str = r#"outlook.timezone="UTC""#;

/// Graph API client scoped to one Teams channel.
#[derive(Clone)]
pub struct GraphClient {
    http: reqwest::Client,
    base_url: String,
    group_id: String,
    channel_id: String,
}

impl GraphClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            base_url: config.graph_base_url.clone(),
            group_id: config.teams_group_id.clone(),
            channel_id: config.teams_channel_id.clone(),
        }
    }

    fn calendar_view_url(&self) -> String {
        format!(
            "{}/groups/{}/channels/{}/calendarView",
            self.base_url, self.group_id, self.channel_id
        )
    }

    /// Appointments occurring within `[start, end]`.
    ///
    /// Only the first page is read; a `@odata.nextLink` is logged, not followed.
    pub async fn calendar_view(
        &self,
        token: &AccessToken,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, SyncError> {
        let url = self.calendar_view_url();
        let start_param = format_utc_query(start);
        let end_param = format_utc_query(end);
        tracing::debug!(
            url = %url,
            start = %start_param,
            end = %end_param,
            "Fetching calendar view"
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(token.secret())
            .header("Prefer", OUTLOOK_TIMEZONE_HEADER)
            .query(&[("startDateTime", start_param), ("endDateTime", end_param)])
            .send()
            .await
            .map_err(|e| calendar_error(e.into()))?;

        let status = response.status().as_u16();
        let page: GraphEventsResponse = check_response_json(response)
            .await
            .map_err(calendar_error)?;

        if page.next_link.is_some() {
            tracing::warn!("Calendar view is paginated; only the first page is used");
        }

        let total = page.value.len();
        let mut appointments = Vec::with_capacity(total);
        for event in page.value {
            let id = event.id.clone();
            match event.into_appointment() {
                Ok(Some(appointment)) => appointments.push(appointment),
                Ok(None) => {
                    tracing::warn!(event_id = ?id, "Skipping event without organizer address");
                }
                Err(e) => {
                    return Err(calendar_error(HttpFailure {
                        status: Some(status),
                        body: format!("event {}: {e}", id.as_deref().unwrap_or("<no id>")),
                    }));
                }
            }
        }

        tracing::info!(
            events = total,
            appointments = appointments.len(),
            "Calendar appointments retrieved"
        );
        Ok(appointments)
    }
}

fn calendar_error(failure: HttpFailure) -> SyncError {
    SyncError::Retrieval {
        resource: "channel calendar",
        status: failure.status,
        body: failure.body,
    }
}
