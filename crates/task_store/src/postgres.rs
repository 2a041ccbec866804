//! PostgreSQL task store.
//!
//! Expects an existing table:
//!
//! ```sql
//! CREATE TABLE tasks (
//!     id        TEXT PRIMARY KEY,
//!     user_id   TEXT,
//!     body      TEXT,
//!     completed BOOLEAN NOT NULL DEFAULT FALSE,
//!     parent    TEXT,
//!     reminder  TEXT
//! );
//! ```

use async_trait::async_trait;
use entities::Task;
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};

use crate::{TaskStore, TaskStoreError, TaskStoreResult};

/// Connection settings for the relational store.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Login user.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Database name.
    pub database: String,
    /// Maximum pooled connections.
    pub max_connections: u32,
}

impl PostgresConfig {
    /// Creates a configuration with the default port and pool size.
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: 5432,
            username: username.into(),
            password: password.into(),
            database: database.into(),
            max_connections: 5,
        }
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the pool size.
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}

/// Database row for Task.
#[derive(Debug, FromRow)]
struct TaskRow {
    id: String,
    user_id: Option<String>,
    body: Option<String>,
    completed: bool,
    parent: Option<String>,
    reminder: Option<String>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.id,
            user_id: row.user_id.unwrap_or_default(),
            body: row.body.unwrap_or_default(),
            completed: row.completed,
            parent: row.parent,
            reminder: row.reminder,
        }
    }
}

/// Relational store backend over a PostgreSQL `tasks` table.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: PgPool,
}

impl PostgresTaskStore {
    /// Creates a store from an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool.
    pub async fn connect(config: &PostgresConfig) -> TaskStoreResult<Self> {
        let options = sqlx::postgres::PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.username)
            .password(&config.password)
            .database(&config.database);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl TaskStore for PostgresTaskStore {
    async fn list_tasks(&self) -> TaskStoreResult<Vec<Task>> {
        let rows: Vec<TaskRow> = sqlx::query_as(
            "SELECT id, user_id, body, completed, parent, reminder FROM tasks",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn get_task(&self, id: &str) -> TaskStoreResult<Option<Task>> {
        let row: Option<TaskRow> = sqlx::query_as(
            "SELECT id, user_id, body, completed, parent, reminder FROM tasks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Task::from))
    }

    async fn list_tasks_by_user(&self, user_id: &str) -> TaskStoreResult<Vec<Task>> {
        let rows: Vec<TaskRow> = sqlx::query_as(
            "SELECT id, user_id, body, completed, parent, reminder FROM tasks WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn create_task(&self, task: &Task) -> TaskStoreResult<()> {
        sqlx::query(
            "INSERT INTO tasks (id, user_id, body, completed, parent, reminder)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&task.id)
        .bind(&task.user_id)
        .bind(&task.body)
        .bind(task.completed)
        .bind(&task.parent)
        .bind(&task.reminder)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return TaskStoreError::already_exists("Task", task.id.clone());
                }
            }
            TaskStoreError::from(e)
        })?;

        Ok(())
    }

    async fn update_task(&self, task: &Task) -> TaskStoreResult<()> {
        let result = sqlx::query(
            "UPDATE tasks
             SET user_id = $2, body = $3, completed = $4, parent = $5, reminder = $6
             WHERE id = $1",
        )
        .bind(&task.id)
        .bind(&task.user_id)
        .bind(&task.body)
        .bind(task.completed)
        .bind(&task.parent)
        .bind(&task.reminder)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(TaskStoreError::not_found("Task", task.id.clone()));
        }
        Ok(())
    }

    async fn delete_task(&self, id: &str) -> TaskStoreResult<()> {
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
