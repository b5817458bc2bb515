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

//! Database abstraction in terms of the operations needed by the service.
//!
//! The PostgreSQL backend is for production use and the SQLite backend is primarily intended to
//! support unit tests.  Every operation is a single statement: the service performs no multi-step
//! transactions, so the abstraction hands out no transaction handles.

use crate::model::{Exercise, ModelError, NewExercise, User, UserId, Username};
use async_trait::async_trait;
use time::Date;

pub mod postgres;
pub mod sqlite;

/// Database errors.  Any unexpected errors that come from the database are classified as
/// `BackendError`, but errors we know about have more specific types.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DbError {
    /// Catch-all error type for unexpected database errors.
    #[error("Database error: {0}")]
    BackendError(String),

    /// Indicates a failure processing the data that already exists in the database.
    #[error("Data integrity error: {0}")]
    DataIntegrityError(String),

    /// Indicates that a requested entry does not exist.
    #[error("Entity not found")]
    NotFound,

    /// Indicates that the database is not available (maybe because of too many active concurrent
    /// connections).
    #[error("Unavailable")]
    Unavailable,
}

impl From<ModelError> for DbError {
    fn from(e: ModelError) -> Self {
        DbError::DataIntegrityError(e.to_string())
    }
}

/// Result type for this module.
pub type DbResult<T> = Result<T, DbError>;

/// Converts a calendar date into the Julian day number stored by the database.
///
/// Storing dates as plain integers keeps range comparisons expressible in SQL across all
/// supported database systems.
pub(crate) fn pack_date(date: Date) -> i64 {
    i64::from(date.to_julian_day())
}

/// Converts a Julian day number as extracted from the database into a calendar date.
pub(crate) fn build_date(julian_day: i64) -> DbResult<Date> {
    let julian_day = i32::try_from(julian_day)
        .map_err(|e| DbError::DataIntegrityError(format!("Date out of range: {}", e)))?;
    Date::from_julian_day(julian_day)
        .map_err(|e| DbError::DataIntegrityError(format!("Invalid date in database: {}", e)))
}

/// Abstraction over the database connection.
#[async_trait]
pub trait Db {
    /// Creates the tables needed by the service if they do not exist yet.
    async fn init_schema(&self) -> DbResult<()>;

    /// Inserts a new user with `username` and returns the created record.
    ///
    /// Usernames carry no uniqueness constraint, so duplicate insertions succeed and yield
    /// distinct records.
    async fn create_user(&self, username: &Username) -> DbResult<User>;

    /// Gets all existing users, in whatever order the database returns them.
    async fn list_users(&self) -> DbResult<Vec<User>>;

    /// Gets the user with the given `id`, or `DbError::NotFound` if it does not exist.
    async fn get_user(&self, id: UserId) -> DbResult<User>;

    /// Inserts a new exercise owned by `username` and returns the created record.
    async fn create_exercise(&self, username: &Username, exercise: &NewExercise)
        -> DbResult<Exercise>;

    /// Gets all exercises owned by `username` whose date falls within `[from, to]`, both bounds
    /// inclusive, in whatever order the database returns them.
    async fn list_exercises(&self, username: &Username, from: Date, to: Date)
        -> DbResult<Vec<Exercise>>;

    /// Closes the connection pool.
    async fn close(&self);
}
