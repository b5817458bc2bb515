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

//! Test utilities for the business layer.

use crate::clocks::testutils::SettableClock;
use crate::db::{sqlite, Db};
use crate::driver::Driver;
use crate::model::{Exercise, NewExercise, User, Username};
use std::sync::Arc;
use time::macros::datetime;
use time::Date;

/// State of a running test.
pub(crate) struct TestContext {
    db: Arc<dyn Db + Send + Sync>,
    clock: Arc<SettableClock>,
    driver: Driver,
}

impl TestContext {
    /// Initializes a driver backed by an in-memory database and a settable clock.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> = Arc::from(sqlite::testutils::setup().await);
        let clock = Arc::from(SettableClock::new(datetime!(2023-06-15 12:00:00 UTC)));
        let driver = Driver::new(db.clone(), clock.clone());
        Self { db, clock, driver }
    }

    /// Returns direct access to the database to inspect or prepare state.
    pub(crate) fn db(&self) -> &dyn Db {
        self.db.as_ref()
    }

    /// Returns the clock that the driver under test observes.
    pub(crate) fn clock(&self) -> &SettableClock {
        &self.clock
    }

    /// Returns a driver instance for a single operation.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Inserts a user directly into the database.
    pub(crate) async fn create_user(&self, username: &str) -> User {
        self.db.create_user(&Username::new(username.to_owned())).await.unwrap()
    }

    /// Inserts an exercise directly into the database.
    pub(crate) async fn create_exercise(
        &self,
        username: &str,
        description: Option<String>,
        duration: Option<i64>,
        date: Date,
    ) -> Exercise {
        self.db
            .create_exercise(
                &Username::new(username.to_owned()),
                &NewExercise::new(description, duration, date),
            )
            .await
            .unwrap()
    }
}
