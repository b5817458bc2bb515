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

//! Entry point to the REST server.
//!
//! Every API is put in its own `.rs` file, using a name like `<entity>_<method>.rs`.  The
//! `tests` module within an API defines a `route` method that returns the HTTP method and the
//! API path under test, and all integration tests within the module rely on it.

use crate::driver::{Driver, DriverError};
use crate::model::{ModelError, UserId};
use async_trait::async_trait;
use axum::body::HttpBody;
use axum::extract::{FromRequest, Request};
use axum::http;
use axum::response::IntoResponse;
use axum::{Json, Router};
use log::error;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

mod exercises_post;
mod index_get;
mod logs_get;
#[cfg(test)]
mod testutils;
mod users_get;
mod users_post;

/// Frontend errors.  These are the errors that are visible to the user on failed requests.
#[derive(Debug, PartialEq, thiserror::Error)]
pub(crate) enum RestError {
    /// Indicates that the storage rejected the insertion of a user.
    #[error("Failed to create user")]
    CreationFailed(String),

    /// Catch-all error type for all unexpected errors.
    #[error("{0}")]
    InternalError(String),

    /// Indicates an error in the contents of the request.
    #[error("{0}")]
    InvalidRequest(String),

    /// Indicates that a requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Indicates that a request that should have empty content did not.
    #[error("Content should be empty")]
    PayloadNotEmpty,
}

impl From<DriverError> for RestError {
    fn from(e: DriverError) -> Self {
        match e {
            DriverError::BackendError(_) => RestError::InternalError(e.to_string()),
            DriverError::InvalidInput(_) => RestError::InvalidRequest(e.to_string()),
            DriverError::NotFound(_) => RestError::NotFound(e.to_string()),
        }
    }
}

impl From<ModelError> for RestError {
    fn from(e: ModelError) -> Self {
        RestError::InvalidRequest(e.to_string())
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            RestError::CreationFailed(e) => {
                error!("Failed to create user: {}", e);
                (http::StatusCode::INTERNAL_SERVER_ERROR, "Failed to create user".to_owned())
            }
            RestError::InternalError(e) => {
                error!("Request failed: {}", e);
                (http::StatusCode::INTERNAL_SERVER_ERROR, e)
            }
            RestError::InvalidRequest(e) => (http::StatusCode::BAD_REQUEST, e),
            // The API contract reports a missing user in the response body alone, so the
            // status code stays 200 on this path.
            RestError::NotFound(e) => (http::StatusCode::OK, e),
            RestError::PayloadNotEmpty => {
                (http::StatusCode::PAYLOAD_TOO_LARGE, "Content should be empty".to_owned())
            }
        };

        let response = ErrorResponse { error: message };
        (status, Json(response)).into_response()
    }
}

/// Result type for this module.
pub(crate) type RestResult<T> = Result<T, RestError>;

/// Representation of the details of an error response.
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct ErrorResponse {
    /// Textual representation of the error message.
    pub(crate) error: String,
}

/// A request body extractor that forbids any content.
///
/// Any API that doesn't expect a body should use this to ensure we don't get garbage data that
/// we don't care about.  This future-proofs the service.
pub(crate) struct EmptyBody {}

#[async_trait]
impl<S> FromRequest<S> for EmptyBody
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        if req.into_body().is_end_stream() {
            Ok(EmptyBody {})
        } else {
            Err(RestError::PayloadNotEmpty)
        }
    }
}

/// Converts the raw `user_id` path parameter into a typed identifier.
///
/// Identifiers are opaque to callers, so an id that cannot possibly resolve to a record is
/// reported the same way as a missing user.
pub(crate) fn parse_user_id(raw: String) -> RestResult<UserId> {
    UserId::try_from(raw).map_err(|_| RestError::NotFound("User not found".to_owned()))
}

/// Treats blank optional fields as absent, which is how HTML forms submit empty inputs.
pub(crate) fn blank_to_none(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::{get, post};
    Router::new()
        .route("/", get(index_get::handler))
        .route("/api/users", get(users_get::handler).post(users_post::handler))
        .route("/api/users/:user_id/exercises", post(exercises_post::handler))
        .route("/api/users/:user_id/logs", get(logs_get::handler))
        .layer(CorsLayer::permissive())
        .with_state(driver)
}
