use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// A todo item as stored in the database and returned by the API.
///
/// `completed_at` holds epoch milliseconds and is non-null exactly when
/// `completed` is true; the store logic maintains that, not a constraint.
/// JSON bodies use camelCase keys (`completedAt`, `creatorId`).
#[derive(Debug, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub completed_at: Option<i64>,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a todo.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TodoInput {
    #[validate(length(min = 1))]
    pub text: String,
}

/// Partial update for a todo. Absent fields leave the stored value
/// unchanged.
#[derive(Debug, Serialize, Deserialize)]
pub struct TodoPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

/// Any id that does not resolve to a row owned by the caller reports the
/// same way: a malformed id, an absent row, and someone else's todo are
/// indistinguishable to the client.
fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound("todo not found".into()))
}

impl Todo {
    /// Inserts a new, uncompleted todo. Text is trimmed; empty or
    /// whitespace-only text is rejected.
    pub async fn create(pool: &PgPool, text: &str, creator_id: Uuid) -> Result<Todo, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::ValidationError("text must not be empty".into()));
        }

        let todo = sqlx::query_as::<_, Todo>(
            "INSERT INTO todos (id, text, creator_id) VALUES ($1, $2, $3) \
             RETURNING id, text, completed, completed_at, creator_id, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(text)
        .bind(creator_id)
        .fetch_one(pool)
        .await?;

        Ok(todo)
    }

    /// All todos created by the given user, oldest first.
    pub async fn find_all_for(pool: &PgPool, creator_id: Uuid) -> Result<Vec<Todo>, AppError> {
        let todos = sqlx::query_as::<_, Todo>(
            "SELECT id, text, completed, completed_at, creator_id, created_at \
             FROM todos WHERE creator_id = $1 ORDER BY created_at",
        )
        .bind(creator_id)
        .fetch_all(pool)
        .await?;

        Ok(todos)
    }

    /// A single todo by id, only if the given user created it.
    pub async fn find_one_for(pool: &PgPool, id: &str, creator_id: Uuid) -> Result<Todo, AppError> {
        let id = parse_id(id)?;

        let todo = sqlx::query_as::<_, Todo>(
            "SELECT id, text, completed, completed_at, creator_id, created_at \
             FROM todos WHERE id = $1 AND creator_id = $2",
        )
        .bind(id)
        .bind(creator_id)
        .fetch_optional(pool)
        .await?;

        todo.ok_or_else(|| AppError::NotFound("todo not found".into()))
    }

    /// Applies a patch to a todo the given user created.
    ///
    /// Setting `completed: true` stamps `completed_at` with the current
    /// epoch millis; `completed: false` clears it to null. A patched text
    /// is trimmed and must stay non-empty.
    pub async fn update_for(
        pool: &PgPool,
        id: &str,
        creator_id: Uuid,
        patch: &TodoPatch,
    ) -> Result<Todo, AppError> {
        let current = Self::find_one_for(pool, id, creator_id).await?;

        let text = match &patch.text {
            Some(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(AppError::ValidationError("text must not be empty".into()));
                }
                text.to_string()
            }
            None => current.text,
        };

        let (completed, completed_at) = match patch.completed {
            Some(true) => (true, Some(Utc::now().timestamp_millis())),
            Some(false) => (false, None),
            None => (current.completed, current.completed_at),
        };

        let todo = sqlx::query_as::<_, Todo>(
            "UPDATE todos SET text = $1, completed = $2, completed_at = $3 \
             WHERE id = $4 AND creator_id = $5 \
             RETURNING id, text, completed, completed_at, creator_id, created_at",
        )
        .bind(text)
        .bind(completed)
        .bind(completed_at)
        .bind(current.id)
        .bind(creator_id)
        .fetch_optional(pool)
        .await?;

        todo.ok_or_else(|| AppError::NotFound("todo not found".into()))
    }

    /// Deletes a todo the given user created and returns the deleted row.
    pub async fn delete_for(pool: &PgPool, id: &str, creator_id: Uuid) -> Result<Todo, AppError> {
        let id = parse_id(id)?;

        let todo = sqlx::query_as::<_, Todo>(
            "DELETE FROM todos WHERE id = $1 AND creator_id = $2 \
             RETURNING id, text, completed, completed_at, creator_id, created_at",
        )
        .bind(id)
        .bind(creator_id)
        .fetch_optional(pool)
        .await?;

        todo.ok_or_else(|| AppError::NotFound("todo not found".into()))
    }
}
