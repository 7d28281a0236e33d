// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared fixtures: a mock server standing in for Azure AD, Graph and
//! Azure DevOps, plus canned response bodies.

use serde_json::{json, Value};
use sprint_absence_sync::config::Config;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "graph-token-123";
#[allow(dead_code)]
pub const PAT: &str = "test_pat";

pub const TOKEN_PATH: &str = "/test-tenant/oauth2/v2.0/token";
pub const CALENDAR_PATH: &str = "/groups/group-1/channels/channel-1/calendarView";

pub fn iteration_path(iteration_id: &str) -> String {
    format!("/team-1/_apis/work/teamsettings/iterations/{iteration_id}")
}

pub fn capacities_path(iteration_id: &str) -> String {
    format!("{}/capacities", iteration_path(iteration_id))
}

/// Config whose every endpoint points at the mock server.
pub fn test_config(server: &MockServer) -> Config {
    Config::test_default(&server.uri())
}

pub fn iteration_body(relations: Value) -> Value {
    json!({
        "id": "sprint-42",
        "name": "Sprint 42",
        "attributes": {
            "startDate": "2024-01-01T00:00:00Z",
            "finishDate": "2024-01-14T00:00:00Z"
        },
        "relations": relations
    })
}

pub fn previous_relation() -> Value {
    json!([{"id": "sprint-41", "rel": "previous", "url": "https://dev.azure.com/x/sprint-41"}])
}

fn event(email: &str, subject: &str, start: &str, end: &str) -> Value {
    json!({
        "subject": subject,
        "organizer": {"emailAddress": {"name": email, "address": email}},
        "start": {"dateTime": start, "timeZone": "UTC"},
        "end": {"dateTime": end, "timeZone": "UTC"}
    })
}

pub fn calendar_body() -> Value {
    json!({
        "value": [
            event("a@x.com", "Vacation", "2024-01-03T09:00:00", "2024-01-05T17:00:00"),
            event("a@x.com", "Conference", "2024-01-09T09:00:00", "2024-01-10T17:00:00"),
            event("ghost@x.com", "Sick", "2024-01-04T00:00:00", "2024-01-04T23:00:00")
        ]
    })
}

pub fn capacity_body() -> Value {
    json!({
        "capacities": [
            {
                "teamMemberEmail": "a@x.com",
                "activity": "Development",
                "capacityPerDay": 6,
                "startDate": "2024-01-01T00:00:00Z",
                "endDate": "2024-01-14T00:00:00Z",
                "daysOff": []
            },
            {
                "teamMemberEmail": "c@x.com",
                "activity": "Design",
                "capacityPerDay": 5,
                "startDate": "2024-01-01T00:00:00Z",
                "endDate": "2024-01-14T00:00:00Z"
            }
        ]
    })
}

/// Capacity rows in the `activities` list form, with no flat activity fields.
#[allow(dead_code)]
pub fn activities_capacity_body() -> Value {
    json!([
        {
            "teamMember": {"displayName": "A", "uniqueName": "a@x.com"},
            "teamMemberEmail": "a@x.com",
            "activities": [
                {"name": "Development", "capacityPerDay": 6.0},
                {"name": "Testing", "capacityPerDay": 2.0}
            ],
            "daysOff": []
        },
        {
            "teamMember": {"displayName": "C", "uniqueName": "c@x.com"},
            "teamMemberEmail": "c@x.com",
            "activities": [{"name": "Design", "capacityPerDay": 5.0}],
            "daysOff": [{"start": "2024-01-08T00:00:00Z", "end": "2024-01-08T00:00:00Z"}]
        }
    ])
}

pub async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": TOKEN
        })))
        .mount(server)
        .await;
}

pub async fn mount_iteration(server: &MockServer, relations: Value) {
    Mock::given(method("GET"))
        .and(path(iteration_path("sprint-42")))
        .respond_with(ResponseTemplate::new(200).set_body_json(iteration_body(relations)))
        .mount(server)
        .await;
}

pub async fn mount_calendar(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(CALENDAR_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(calendar_body()))
        .mount(server)
        .await;
}

pub async fn mount_capacities(server: &MockServer, iteration_id: &str) {
    mount_capacities_body(server, iteration_id, capacity_body()).await;
}

pub async fn mount_capacities_body(server: &MockServer, iteration_id: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(capacities_path(iteration_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Accept the capacity POST and require it to happen `times` times.
pub async fn expect_publish(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path(capacities_path("sprint-42")))
        .respond_with(ResponseTemplate::new(200))
        .expect(times)
        .mount(server)
        .await;
}

/// Body of the capacity POST, if one was received.
#[allow(dead_code)]
pub async fn posted_capacity(server: &MockServer) -> Option<Value> {
    let requests = server.received_requests().await.unwrap_or_default();
    requests
        .iter()
        .find(|r| r.method.as_str() == "POST" && r.url.path() == capacities_path("sprint-42"))
        .map(|r| serde_json::from_slice(&r.body).expect("posted body should be JSON"))
}
