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

//! Entry point to the exercise tracker service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use exercise_tracker::db::postgres::{self, PostgresOptions};
use exercise_tracker::db::Db;
use exercise_tracker::env::get_optional_var;
use exercise_tracker::serve;
use std::net::Ipv4Addr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    env_logger::init();

    let port: u16 = get_optional_var("TRACKER", "PORT").unwrap().unwrap_or(3000);
    let addr = (Ipv4Addr::UNSPECIFIED, port);

    let db_opts = PostgresOptions::from_env("TRACKER_PGSQL").unwrap();
    let db: Arc<dyn Db + Send + Sync> = Arc::from(postgres::connect(db_opts).unwrap());
    db.init_schema().await.unwrap();

    serve(addr, db).await.unwrap()
}
