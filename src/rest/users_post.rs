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

//! API to create a user.

use crate::driver::{Driver, DriverError};
use crate::model::{User, Username};
use crate::rest::{RestError, RestResult};
use axum::extract::State;
use axum::{Form, Json};
use serde::Deserialize;

/// Message of the request required by this API.
#[derive(Deserialize)]
#[cfg_attr(test, derive(serde::Serialize))]
pub(crate) struct UsersPostRequest {
    /// Name of the user to create.
    username: Username,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Form(request): Form<UsersPostRequest>,
) -> RestResult<Json<User>> {
    match driver.create_user(request.username).await {
        Ok(user) => Ok(Json(user)),
        Err(DriverError::BackendError(e)) => Err(RestError::CreationFailed(e)),
        Err(e) => Err(e.into()),
    }
}
