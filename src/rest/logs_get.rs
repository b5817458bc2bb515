// Exercise Tracker
// Copyright 2025 The exercise-tracker Authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! API to query a user's exercise log.

use crate::driver::Driver;
use crate::model::{format_date, parse_date, ExerciseLog, UserId, Username};
use crate::rest::{blank_to_none, parse_user_id, EmptyBody, RestResult};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Message of the query parameters accepted by this API.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Default, serde::Serialize))]
pub(crate) struct LogsGetRequest {
    /// Lower bound of the date filter in `yyyy-mm-dd` form, inclusive.
    from: Option<String>,

    /// Upper bound of the date filter in `yyyy-mm-dd` form, inclusive.
    to: Option<String>,

    /// Maximum number of entries to return; zero or absent means no limit.
    limit: Option<u64>,
}

/// A single entry in the log returned by this API.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
pub(crate) struct LogsGetEntry {
    /// Free-form description of the exercise.
    description: Option<String>,

    /// Duration of the exercise in minutes.
    duration: Option<i64>,

    /// Calendar date of the exercise in human-readable form.
    date: String,
}

/// Message of the response returned by this API.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
pub(crate) struct LogsGetResponse {
    /// Identifier of the owning user.
    #[serde(rename = "_id")]
    id: UserId,

    /// Name of the owning user.
    username: Username,

    /// Total number of exercises that matched the date filter, before truncation.
    count: usize,

    /// The matching exercises, possibly truncated.
    log: Vec<LogsGetEntry>,
}

impl From<ExerciseLog> for LogsGetResponse {
    fn from(log: ExerciseLog) -> Self {
        let entries = log
            .exercises()
            .iter()
            .map(|exercise| LogsGetEntry {
                description: exercise.description().clone(),
                duration: *exercise.duration(),
                date: format_date(*exercise.date()),
            })
            .collect();
        Self {
            id: *log.user().id(),
            username: log.user().username().clone(),
            count: *log.count(),
            log: entries,
        }
    }
}

/// GET handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(user_id): Path<String>,
    Query(request): Query<LogsGetRequest>,
    _body: EmptyBody,
) -> RestResult<Json<LogsGetResponse>> {
    let user_id = parse_user_id(user_id)?;

    let from = match blank_to_none(request.from) {
        Some(raw) => Some(parse_date(&raw)?),
        None => None,
    };
    let to = match blank_to_none(request.to) {
        Some(raw) => Some(parse_date(&raw)?),
        None => None,
    };

    let log = driver.get_log(user_id, from, to, request.limit).await?;
    Ok(Json(LogsGetResponse::from(log)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use axum::http;
    use time::macros::{date, datetime};

    /// Returns the route under test for the user with `user_id`.
    fn route(user_id: &str) -> (http::Method, String) {
        (http::Method::GET, format!("/api/users/{}/logs", user_id))
    }

    #[tokio::test]
    async fn test_empty() {
        let context = TestContext::setup().await;

        let user = context.create_user("alice").await;

        let response: LogsGetResponse =
            OneShotBuilder::new(context.app(), route(&String::from(*user.id())))
                .send_empty()
                .await
                .expect_json()
                .await;
        assert_eq!(user.id(), &response.id);
        assert_eq!(user.username(), &response.username);
        assert_eq!(0, response.count);
        assert!(response.log.is_empty());
    }

    #[tokio::test]
    async fn test_entries_render_dates() {
        let context = TestContext::setup().await;

        let user = context.create_user("alice").await;
        context
            .create_exercise("alice", Some("run".to_owned()), Some(30), date!(2023 - 01 - 01))
            .await;

        let response: LogsGetResponse =
            OneShotBuilder::new(context.app(), route(&String::from(*user.id())))
                .send_empty()
                .await
                .expect_json()
                .await;
        assert_eq!(1, response.count);
        assert_eq!(
            vec![LogsGetEntry {
                description: Some("run".to_owned()),
                duration: Some(30),
                date: "Sun Jan 01 2023".to_owned(),
            }],
            response.log
        );
    }

    #[tokio::test]
    async fn test_date_filter() {
        let context = TestContext::setup().await;

        let user = context.create_user("alice").await;
        for day in [date!(2023 - 01 - 05), date!(2023 - 01 - 10), date!(2023 - 01 - 15)] {
            context.create_exercise("alice", None, None, day).await;
        }

        let request = LogsGetRequest {
            from: Some("2023-01-06".to_owned()),
            to: Some("2023-01-10".to_owned()),
            limit: None,
        };
        let response: LogsGetResponse =
            OneShotBuilder::new(context.app(), route(&String::from(*user.id())))
                .with_query(request)
                .send_empty()
                .await
                .expect_json()
                .await;
        assert_eq!(1, response.count);
        assert_eq!("Tue Jan 10 2023", response.log[0].date);
    }

    #[tokio::test]
    async fn test_to_defaults_to_today() {
        let context = TestContext::setup().await;
        context.clock().set(datetime!(2023-01-10 12:00:00 UTC));

        let user = context.create_user("alice").await;
        context.create_exercise("alice", None, None, date!(2023 - 01 - 10)).await;
        context.create_exercise("alice", None, None, date!(2023 - 01 - 11)).await;

        let response: LogsGetResponse =
            OneShotBuilder::new(context.app(), route(&String::from(*user.id())))
                .send_empty()
                .await
                .expect_json()
                .await;
        assert_eq!(1, response.count);
        assert_eq!("Tue Jan 10 2023", response.log[0].date);
    }

    #[tokio::test]
    async fn test_limit_truncates_but_count_does_not_shrink() {
        let context = TestContext::setup().await;

        let user = context.create_user("alice").await;
        for day in [date!(2023 - 01 - 05), date!(2023 - 01 - 10), date!(2023 - 01 - 15)] {
            context.create_exercise("alice", None, None, day).await;
        }

        let request = LogsGetRequest { limit: Some(1), ..Default::default() };
        let response: LogsGetResponse =
            OneShotBuilder::new(context.app(), route(&String::from(*user.id())))
                .with_query(request)
                .send_empty()
                .await
                .expect_json()
                .await;
        assert_eq!(3, response.count);
        assert_eq!(1, response.log.len());
    }

    #[tokio::test]
    async fn test_user_not_found_keeps_status_ok() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route("123"))
            .send_empty()
            .await
            .expect_error("User not found")
            .await;
    }

    #[tokio::test]
    async fn test_invalid_date_bound() {
        let context = TestContext::setup().await;

        let user = context.create_user("alice").await;

        let request = LogsGetRequest { from: Some("garbage".to_owned()), ..Default::default() };
        OneShotBuilder::new(context.app(), route(&String::from(*user.id())))
            .with_query(request)
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .take_body_as_text()
            .await;
    }

    #[tokio::test]
    async fn test_payload_must_be_empty() {
        let context = TestContext::setup().await;

        let user = context.create_user("alice").await;

        OneShotBuilder::new(context.app(), route(&String::from(*user.id())))
            .send_text("should not be here")
            .await
            .expect_status(http::StatusCode::PAYLOAD_TOO_LARGE)
            .expect_error("Content should be empty")
            .await;
    }
}
