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

//! API to record an exercise for a user.

use crate::driver::Driver;
use crate::model::{format_date, parse_date, Exercise, ExerciseId, Username};
use crate::rest::{blank_to_none, parse_user_id, RestError, RestResult};
use axum::extract::{Path, State};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

/// Message of the request required by this API.
///
/// All fields arrive as strings because HTML forms have no richer types, and blank values are
/// treated the same as absent ones.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Default, serde::Serialize))]
pub(crate) struct ExercisesPostRequest {
    /// Free-form description of the exercise.
    description: Option<String>,

    /// Duration of the exercise in minutes.
    duration: Option<String>,

    /// Calendar date of the exercise in `yyyy-mm-dd` form.
    date: Option<String>,
}

/// Message of the response returned by this API.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
pub(crate) struct ExercisesPostResponse {
    /// Identifier of the newly created exercise.
    #[serde(rename = "_id")]
    id: ExerciseId,

    /// Username of the owning user.
    username: Username,

    /// Free-form description of the exercise.
    description: Option<String>,

    /// Duration of the exercise in minutes.
    duration: Option<i64>,

    /// Calendar date of the exercise in human-readable form.
    date: String,
}

impl From<Exercise> for ExercisesPostResponse {
    fn from(exercise: Exercise) -> Self {
        Self {
            id: *exercise.id(),
            username: exercise.username().clone(),
            description: exercise.description().clone(),
            duration: *exercise.duration(),
            date: format_date(*exercise.date()),
        }
    }
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(user_id): Path<String>,
    Form(request): Form<ExercisesPostRequest>,
) -> RestResult<Json<ExercisesPostResponse>> {
    let user_id = parse_user_id(user_id)?;

    let description = blank_to_none(request.description);
    let duration = match blank_to_none(request.duration) {
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| RestError::InvalidRequest(format!("Invalid duration '{}'", raw)))?,
        ),
        None => None,
    };
    let date = match blank_to_none(request.date) {
        Some(raw) => Some(parse_date(&raw)?),
        None => None,
    };

    let exercise = driver.create_exercise(user_id, description, duration, date).await?;
    Ok(Json(ExercisesPostResponse::from(exercise)))
}
