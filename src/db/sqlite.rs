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

//! Implementation of the database abstraction using SQLite.

use crate::db::{build_date, pack_date, Db, DbError, DbResult};
use crate::model::{Exercise, ExerciseId, NewExercise, User, UserId, Username};
use async_trait::async_trait;
use log::warn;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use time::Date;

/// Schema to use to initialize the database.
const SCHEMA: &str = include_str!("sqlite.sql");

/// Takes a raw SQLx error `e` and converts it to our generic error type.
pub fn map_sqlx_error(e: sqlx::Error) -> DbError {
    match e {
        sqlx::Error::ColumnDecode { source, .. } => DbError::DataIntegrityError(source.to_string()),
        sqlx::Error::RowNotFound => DbError::NotFound,
        sqlx::Error::PoolTimedOut => DbError::Unavailable,
        e => DbError::BackendError(e.to_string()),
    }
}

/// Creates a new connection to the SQLite database at `conn_str`.
///
/// The pool is pinned to a single long-lived connection: an in-memory database exists
/// per-connection, so handing out more than one connection would expose disjoint data sets.
pub async fn connect(conn_str: &str) -> DbResult<SqliteDb> {
    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect(conn_str)
        .await
        .map_err(map_sqlx_error)?;
    Ok(SqliteDb { pool })
}

/// A database instance backed by a SQLite database.
pub struct SqliteDb {
    /// Shared SQLite connection pool.
    pool: SqlitePool,
}

impl Drop for SqliteDb {
    fn drop(&mut self) {
        if !self.pool.is_closed() {
            warn!("Dropping connection without having called close() first");
        }
    }
}

/// Rebuilds a user record from a row with `id` and `username` columns.
fn user_from_row(row: &SqliteRow) -> DbResult<User> {
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let username: String = row.try_get("username").map_err(map_sqlx_error)?;
    Ok(User::new(UserId::new(id), Username::new(username)))
}

/// Rebuilds an exercise record from a row with all the `exercises` columns.
fn exercise_from_row(row: &SqliteRow) -> DbResult<Exercise> {
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
impl Db for SqliteDb {
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
        let query_str = "INSERT INTO users (username) VALUES (?)";
        let done = sqlx::query(query_str)
            .bind(username.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(User::new(UserId::new(done.last_insert_rowid()), username.clone()))
    }

    async fn list_users(&self) -> DbResult<Vec<User>> {
        let query_str = "SELECT id, username FROM users";
        let rows = sqlx::query(query_str).fetch_all(&self.pool).await.map_err(map_sqlx_error)?;
        rows.iter().map(user_from_row).collect()
    }

    async fn get_user(&self, id: UserId) -> DbResult<User> {
        let query_str = "SELECT id, username FROM users WHERE id = ?";
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
        let query_str =
            "INSERT INTO exercises (username, description, duration, date) VALUES (?, ?, ?, ?)";
        let done = sqlx::query(query_str)
            .bind(username.as_str())
            .bind(exercise.description().as_deref())
            .bind(*exercise.duration())
            .bind(pack_date(*exercise.date()))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Exercise::new(
            ExerciseId::new(done.last_insert_rowid()),
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
            WHERE username = ? AND date >= ? AND date <= ?
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


#[cfg(test)]
mod tests {
    use super::testutils::*;
    use crate::db::tests::generate_db_tests;

    generate_db_tests!(setup().await);
}
