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

//! Operations on users.

use crate::driver::{Driver, DriverResult};
use crate::model::{User, Username};

impl Driver {
    /// Creates a new user named `username`.
    ///
    /// Usernames are not required to be unique: calling this twice with the same name yields
    /// two distinct records.
    pub(crate) async fn create_user(self, username: Username) -> DriverResult<User> {
        let user = self.db.create_user(&username).await?;
        Ok(user)
    }

    /// Gets a list of all existing users, in no particular order.
    pub(crate) async fn list_users(self) -> DriverResult<Vec<User>> {
        let users = self.db.list_users().await?;
        Ok(users)
    }
}
