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

//! High-level data types.

use derive_getters::Getters;
use derive_more::Constructor;
use serde::{Deserialize, Serialize};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::Date;

/// Errors that can arise during the creation of model types from untrusted input.
#[derive(Debug, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct ModelError(pub String);

/// Result type for this module.
pub type ModelResult<T> = Result<T, ModelError>;

/// Format in which callers supply calendar dates.
const DATE_INPUT_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Format in which responses render calendar dates, e.g. `Sun Jan 01 2023`.
const DATE_OUTPUT_FORMAT: &[FormatItem<'static>] =
    format_description!("[weekday repr:short] [month repr:short] [day] [year]");

/// Parses a `YYYY-MM-DD` string into a calendar date.
pub fn parse_date(s: &str) -> ModelResult<Date> {
    Date::parse(s, DATE_INPUT_FORMAT).map_err(|e| ModelError(format!("Invalid date '{}': {}", s, e)))
}

/// Renders a calendar date in the human-readable form used by all responses.
pub fn format_date(date: Date) -> String {
    date.format(DATE_OUTPUT_FORMAT).expect("Formatting with a well-formed description cannot fail")
}

/// Identifier of a user, assigned by the database on creation.
///
/// Identifiers are opaque to callers, so they travel as strings on the wire even though the
/// database assigns them from a 64-bit sequence.
#[derive(Clone, Constructor, Copy, Deserialize, Eq, PartialEq, Serialize)]
#[cfg_attr(test, derive(Debug))]
#[serde(into = "String", try_from = "String")]
pub struct UserId(i64);

impl UserId {
    /// Returns the identifier in the representation used by the database.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = ModelError;

    fn try_from(s: String) -> ModelResult<Self> {
        match s.parse::<i64>() {
            Ok(id) => Ok(UserId(id)),
            Err(_) => Err(ModelError(format!("Invalid user id '{}'", s))),
        }
    }
}

/// Identifier of an exercise, assigned by the database on creation.
#[derive(Clone, Constructor, Copy, Deserialize, Eq, PartialEq, Serialize)]
#[cfg_attr(test, derive(Debug))]
#[serde(into = "String", try_from = "String")]
pub struct ExerciseId(i64);

impl ExerciseId {
    /// Returns the identifier in the representation used by the database.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<ExerciseId> for String {
    fn from(id: ExerciseId) -> Self {
        id.0.to_string()
    }
}

impl TryFrom<String> for ExerciseId {
    type Error = ModelError;

    fn try_from(s: String) -> ModelResult<Self> {
        match s.parse::<i64>() {
            Ok(id) => Ok(ExerciseId(id)),
            Err(_) => Err(ModelError(format!("Invalid exercise id '{}'", s))),
        }
    }
}

/// Newtype pattern for usernames.
///
/// Usernames carry no validity constraints: the service enforces neither non-emptiness nor
/// uniqueness, so any string a caller supplies is preserved as-is.
#[derive(Clone, Constructor, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[cfg_attr(test, derive(Debug))]
pub struct Username(String);

impl Username {
    /// Returns a string view of the username.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A user record.
#[derive(Constructor, Getters, Serialize)]
#[cfg_attr(test, derive(Clone, Debug, Deserialize, PartialEq))]
pub struct User {
    /// Identifier assigned by the database.
    #[serde(rename = "_id")]
    id: UserId,

    /// The user's name, as supplied at creation time.
    username: Username,
}

/// An exercise entry as stored in the database.
///
/// Exercises reference their owner through the username captured at creation time, not through
/// the user's identifier.  A username change would orphan historical entries, but no rename
/// operation exists to expose the issue.
#[derive(Constructor, Getters)]
#[cfg_attr(test, derive(Clone, Debug, PartialEq))]
pub struct Exercise {
    /// Identifier assigned by the database.
    id: ExerciseId,

    /// Username of the owning user, denormalized at creation time.
    username: Username,

    /// Free-form description of the exercise.
    description: Option<String>,

    /// Duration of the exercise in minutes.
    duration: Option<i64>,

    /// Calendar date on which the exercise took place.
    date: Date,
}

/// The fields of an exercise that callers supply, after defaults have been applied.
#[derive(Constructor, Getters)]
pub struct NewExercise {
    /// Free-form description of the exercise.
    description: Option<String>,

    /// Duration of the exercise in minutes.
    duration: Option<i64>,

    /// Calendar date on which the exercise took place.
    date: Date,
}

/// The outcome of a log query: the owning user plus the filtered exercises.
///
/// `count` is the size of the filtered set before any truncation, so it may exceed
/// `exercises.len()` when a limit was applied.
#[derive(Constructor, Getters)]
#[cfg_attr(test, derive(Debug))]
pub struct ExerciseLog {
    /// The user that owns the log.
    user: User,

    /// Total number of exercises that matched the date filter.
    count: usize,

    /// The matching exercises, possibly truncated.
    exercises: Vec<Exercise>,
}
