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

//! Implementation of the database abstraction using PostgreSQL.

use crate::db::{build_date, pack_date, Db, DbError, DbResult};
use crate::env::{get_optional_var, get_required_var};
use crate::model::{Exercise, ExerciseId, NewExercise, User, UserId, Username};
use async_trait::async_trait;
use log::warn;
use sqlx::postgres::{PgConnectOptions, PgDatabaseError, PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use std::fmt;
use time::Date;

/// Schema to use to initialize the database.
const SCHEMA: &str = include_str!("postgres.sql");

/// Takes a raw SQLx error `e` and converts it to our generic error type.
pub fn map_sqlx_error(e: sqlx::Error) -> DbError {
    match e {
        sqlx::Error::ColumnDecode { source, .. } => DbError::DataIntegrityError(source.to_string()),
        sqlx::Error::Database(e) => match e.downcast_ref::<PgDatabaseError>().code() {
            "53300" /* too_many_connections */ => DbError::Unavailable,
            number => DbError::BackendError(format!("pgsql error {}: {}", number, e)),
        },
        sqlx::Error::PoolTimedOut => DbError::Unavailable,
        sqlx::Error::RowNotFound => DbError::NotFound,
        e => DbError::BackendError(e.to_string()),
    }
}

/// Options to establish a connection to a PostgreSQL database.
#[derive(Default)]
#[cfg_attr(test, derive(PartialEq))]
pub struct PostgresOptions {
    /// Host to connect to.
    pub host: String,

    /// Port to connect to (typically 5432).
    pub port: u16,

    /// Database name to connect to.
    pub database: String,

    /// Username to establish the connection with.
    pub username: String,

    /// Password to establish the connection with.
    pub password: String,

    /// Minimum number of connections to keep open against the database.
    pub min_connections: Option<u32>,

    /// Maximum number of connections to allow against the database.
    pub max_connections: Option<u32>,
}

impl fmt::Debug for PostgresOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresOptions")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("min_connections", &self.min_connections)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl PostgresOptions {
    /// Initializes a set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_HOST`, `<prefix>_PORT`, `<prefix>_DATABASE`,
    /// `<prefix>_USERNAME`, `<prefix>_PASSWORD`, `<prefix>_MIN_CONNECTIONS` and
    /// `<prefix>_MAX_CONNECTIONS`.
    pub fn from_env(prefix: &str) -> Result<PostgresOptions, String> {
        Ok(PostgresOptions {
            host: get_required_var::<String>(prefix, "HOST")?,
            port: get_required_var::<u16>(prefix, "PORT")?,
            database: get_required_var::<String>(prefix, "DATABASE")?,
            username: get_required_var::<String>(prefix, "USERNAME")?,
            password: get_required_var::<String>(prefix, "PASSWORD")?,
            min_connections: get_optional_var::<u32>(prefix, "MIN_CONNECTIONS")?,
            max_connections: get_optional_var::<u32>(prefix, "MAX_CONNECTIONS")?,
        })
    }
}

/// Creates a new connection to the PostgreSQL database described by `opts`.
///
/// The connection is lazy: the pool only reaches out to the server when the first operation
/// runs, so startup succeeds even if the database is temporarily unreachable.
pub fn connect(opts: PostgresOptions) -> DbResult<PostgresDb> {
    let mut pool_options = PgPoolOptions::new();
    if let Some(min_connections) = opts.min_connections {
        pool_options = pool_options.min_connections(min_connections);
    }
    if let Some(max_connections) = opts.max_connections {
        pool_options = pool_options.max_connections(max_connections);
    }

    let options = PgConnectOptions::new()
        .host(&opts.host)
        .port(opts.port)
        .database(&opts.database)
        .username(&opts.username)
        .password(&opts.password);

    let pool = pool_options.connect_lazy_with(options);
    Ok(PostgresDb { pool })
}

/// A database instance backed by a PostgreSQL database.
pub struct PostgresDb {
    /// Shared PostgreSQL connection pool.
    pool: PgPool,
}

impl Drop for PostgresDb {
    fn drop(&mut self) {
        if !self.pool.is_closed() {
            warn!("Dropping connection without having called close() first");
        }
    }
}

/// Rebuilds a user record from a row with `id` and `username` columns.
fn user_from_row(row: &PgRow) -> DbResult<User> {
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let username: String = row.try_get("username").map_err(map_sqlx_error)?;
    Ok(User::new(UserId::new(id), Username::new(username)))
}

/// Rebuilds an exercise record from a row with all the `exercises` columns.
fn exercise_from_row(row: &PgRow) -> DbResult<Exercise> {
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let username: String = row.try_get("username").map_err(map_sqlx_error)?;
    let description: Option<String> = row.try_get("description").map_err(map_sqlx_error)?;
    let duration: Option<i64> = row.try_get("duration").map_err(map_sqlx_error)?;
    let date: i64 = row.try_get("date").map_err(map_sqlx_error)?;
    Ok(Exercise::new(
        ExerciseId::new(id),
        Username::new(username),
        description,
        duration,
        build_date(date)?,
    ))
}

#[async_trait]
impl Db for PostgresDb {
    async fn init_schema(&self) -> DbResult<()> {
        for query_str in SCHEMA.split(';') {
            let query_str = query_str.trim();
            if query_str.is_empty() {
                continue;
            }
            sqlx::query(query_str).execute(&self.pool).await.map_err(map_sqlx_error)?;
        }
        Ok(())
    }

    async fn create_user(&self, username: &Username) -> DbResult<User> {
        let query_str = "INSERT INTO users (username) VALUES ($1) RETURNING id";
        let row = sqlx::query(query_str)
            .bind(username.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
        Ok(User::new(UserId::new(id), username.clone()))
    }

    async fn list_users(&self) -> DbResult<Vec<User>> {
        let query_str = "SELECT id, username FROM users";
        let rows = sqlx::query(query_str).fetch_all(&self.pool).await.map_err(map_sqlx_error)?;
        rows.iter().map(user_from_row).collect()
    }

    async fn get_user(&self, id: UserId) -> DbResult<User> {
        let query_str = "SELECT id, username FROM users WHERE id = $1";
        let row = sqlx::query(query_str)
            .bind(id.as_i64())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        user_from_row(&row)
    }

    async fn create_exercise(
        &self,
        username: &Username,
        exercise: &NewExercise,
    ) -> DbResult<Exercise> {
        let query_str = "
            INSERT INTO exercises (username, description, duration, date)
            VALUES ($1, $2, $3, $4)
            RETURNING id
        ";
        let row = sqlx::query(query_str)
            .bind(username.as_str())
            .bind(exercise.description().as_deref())
            .bind(*exercise.duration())
            .bind(pack_date(*exercise.date()))
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
        Ok(Exercise::new(
            ExerciseId::new(id),
            username.clone(),
            exercise.description().clone(),
            *exercise.duration(),
            *exercise.date(),
        ))
    }

    async fn list_exercises(
        &self,
        username: &Username,
        from: Date,
        to: Date,
    ) -> DbResult<Vec<Exercise>> {
        let query_str = "
            SELECT id, username, description, duration, date FROM exercises
            WHERE username = $1 AND date >= $2 AND date <= $3
        ";
        let rows = sqlx::query(query_str)
            .bind(username.as_str())
            .bind(pack_date(from))
            .bind(pack_date(to))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        rows.iter().map(exercise_from_row).collect()
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Test utilities for the PostgreSQL connection.
#[cfg(test)]
pub(crate) mod testutils {
    use super::*;

    /// Creates a new connection to the test database and initializes it.
    ///
    /// This sets up the database to use the `pg_temp` schema by default so that any tables
    /// created during the test are deleted at disconnection time.  Note that for this to work,
    /// the connection pool must maintain a single connection open at all times, but not more.
    ///
    /// Given that this is for testing purposes only, any errors will panic.
    pub(crate) async fn setup() -> PostgresDb {
        let _can_fail = env_logger::builder().is_test(true).try_init();

        let mut opts = PostgresOptions::from_env("TRACKER_PGSQL_TEST").unwrap();
        opts.min_connections = Some(1);
        opts.max_connections = Some(1);
        let db = connect(opts).unwrap();

        sqlx::query("SET search_path TO pg_temp").execute(&db.pool).await.unwrap();
        db.init_schema().await.unwrap();
        db
    }
}
