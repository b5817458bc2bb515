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

//! Operations on a user's exercises.

use crate::db::DbError;
use crate::driver::{Driver, DriverError, DriverResult};
use crate::model::{Exercise, ExerciseLog, NewExercise, User, UserId};
use time::Date;

impl Driver {
    /// Looks up the user with `user_id`, translating a missing record into the error message
    /// mandated by the API contract.
    async fn get_owner(&self, user_id: UserId) -> DriverResult<User> {
        match self.db.get_user(user_id).await {
            Ok(user) => Ok(user),
            Err(DbError::NotFound) => Err(DriverError::NotFound("User not found".to_owned())),
            Err(e) => Err(e.into()),
        }
    }

    /// Creates a new exercise owned by the user with `user_id`.
    ///
    /// The exercise is linked to the owner through the username captured at this point, not
    /// through `user_id`.  When `date` is absent, the current date applies.
    pub(crate) async fn create_exercise(
        self,
        user_id: UserId,
        description: Option<String>,
        duration: Option<i64>,
        date: Option<Date>,
    ) -> DriverResult<Exercise> {
        let user = self.get_owner(user_id).await?;

        let date = date.unwrap_or_else(|| self.clock.now_utc().date());
        let exercise = self
            .db
            .create_exercise(user.username(), &NewExercise::new(description, duration, date))
            .await?;
        Ok(exercise)
    }

    /// Gets the exercises of the user with `user_id` whose date falls within `[from, to]`,
    /// both bounds inclusive.
    ///
    /// `from` defaults to the earliest representable date and `to` to the current date.  A
    /// `limit` greater than zero truncates the returned entries after the date filter has been
    /// applied, but the log's count always reflects the full filtered set.
    pub(crate) async fn get_log(
        self,
        user_id: UserId,
        from: Option<Date>,
        to: Option<Date>,
        limit: Option<u64>,
    ) -> DriverResult<ExerciseLog> {
        let user = self.get_owner(user_id).await?;

        let from = from.unwrap_or(Date::MIN);
        let to = to.unwrap_or_else(|| self.clock.now_utc().date());
        let mut exercises = self.db.list_exercises(user.username(), from, to).await?;

        let count = exercises.len();
        match limit {
            Some(limit) if limit > 0 => {
                // A limit that does not fit in usize cannot truncate anything anyway.
                exercises.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
            }
            _ => (),
        }

        Ok(ExerciseLog::new(user, count, exercises))
    }
}
