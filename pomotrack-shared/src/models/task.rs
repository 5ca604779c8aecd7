/// Task model and owner-scoped database operations
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_priority AS ENUM ('high', 'medium', 'low');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     priority task_priority NOT NULL DEFAULT 'medium',
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     due_date TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Every accessor below takes the owner's user id and carries it in the SQL
/// predicate. A lookup that matches no row, whether the id does not exist
/// or the row belongs to someone else, returns `None`, so the two cases
/// are indistinguishable to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task priority level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Urgent work
    High,

    /// Normal work (the default)
    #[default]
    Medium,

    /// Backlog
    Low,
}

impl TaskPriority {
    /// Priority as its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::High => "high",
            TaskPriority::Medium => "medium",
            TaskPriority::Low => "low",
        }
    }
}

/// Task owned by a single user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task id
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Title (non-empty)
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Priority, defaults to medium
    pub priority: TaskPriority,

    /// Whether the task is done
    pub completed: bool,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
///
/// Carries no owner field: the owner is always the resolved request
/// identity, supplied separately to [`Task::create`].
#[derive(Debug, Clone)]
pub struct NewTask {
    /// Title (validated non-empty before this point)
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Priority (already defaulted to medium when omitted)
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial update for a task
///
/// Only present fields are written. `id`, `user_id` and `created_at` have
/// no counterpart here, so they cannot be modified through an update.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New completion state
    pub completed: Option<bool>,

    /// New due date
    pub due_date: Option<DateTime<Utc>>,
}

impl UpdateTask {
    /// True when no field would be written
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.completed.is_none()
            && self.due_date.is_none()
    }
}

impl Task {
    /// Creates a task owned by `owner`
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use pomotrack_shared::models::task::{NewTask, Task, TaskPriority};
    /// # use sqlx::PgPool;
    /// # use uuid::Uuid;
    /// # async fn example(pool: PgPool, owner: Uuid) -> Result<(), sqlx::Error> {
    /// let task = Task::create(&pool, owner, NewTask {
    ///     title: "Write the quarterly report".to_string(),
    ///     description: None,
    ///     priority: TaskPriority::High,
    ///     due_date: None,
    /// })
    /// .await?;
    /// assert!(!task.completed);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(pool: &PgPool, owner: Uuid, data: NewTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, description, priority, due_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, description, priority, completed, due_date,
                      created_at, updated_at
            "#,
        )
        .bind(owner)
        .bind(data.title)
        .bind(data.description)
        .bind(data.priority)
        .bind(data.due_date)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by id, scoped to its owner
    pub async fn find_by_id_for_owner(
        pool: &PgPool,
        id: Uuid,
        owner: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, priority, completed, due_date,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists the owner's tasks, newest first, optionally filtered by
    /// completion state
    pub async fn list_for_owner(
        pool: &PgPool,
        owner: Uuid,
        completed: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = match completed {
            Some(completed) => {
                sqlx::query_as::<_, Task>(
                    r#"
                    SELECT id, user_id, title, description, priority, completed, due_date,
                           created_at, updated_at
                    FROM tasks
                    WHERE user_id = $1 AND completed = $2
                    ORDER BY created_at DESC
                    LIMIT $3 OFFSET $4
                    "#,
                )
                .bind(owner)
                .bind(completed)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Task>(
                    r#"
                    SELECT id, user_id, title, description, priority, completed, due_date,
                           created_at, updated_at
                    FROM tasks
                    WHERE user_id = $1
                    ORDER BY created_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(owner)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
            }
        };

        Ok(tasks)
    }

    /// Counts the owner's tasks under the same filter as [`Self::list_for_owner`]
    pub async fn count_for_owner(
        pool: &PgPool,
        owner: Uuid,
        completed: Option<bool>,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = match completed {
            Some(completed) => {
                sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE user_id = $1 AND completed = $2")
                    .bind(owner)
                    .bind(completed)
                    .fetch_one(pool)
                    .await?
            }
            None => {
                sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE user_id = $1")
                    .bind(owner)
                    .fetch_one(pool)
                    .await?
            }
        };

        Ok(count)
    }

    /// Applies a partial update to an owned task
    ///
    /// Builds the SET clause from the fields that are present. Returns
    /// `None` without writing anything when the scoped lookup matches no
    /// row.
    pub async fn update_for_owner(
        pool: &PgPool,
        id: Uuid,
        owner: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.completed.is_some() {
            bind_count += 1;
            query.push_str(&format!(", completed = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 AND user_id = $2 \
             RETURNING id, user_id, title, description, priority, completed, due_date, \
             created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id).bind(owner);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(completed) = data.completed {
            q = q.bind(completed);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes an owned task
    ///
    /// Single conditional statement, no pre-lookup: a nonexistent id and a
    /// foreign-owned id both report zero rows affected. Related pomodoros
    /// go with it via CASCADE.
    pub async fn delete_for_owner(pool: &PgPool, id: Uuid, owner: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_as_str() {
        assert_eq!(TaskPriority::High.as_str(), "high");
        assert_eq!(TaskPriority::Medium.as_str(), "medium");
        assert_eq!(TaskPriority::Low.as_str(), "low");
    }

    #[test]
    fn test_priority_default_is_medium() {
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn test_priority_serde_lowercase() {
        assert_eq!(serde_json::to_string(&TaskPriority::High).unwrap(), "\"high\"");
        let parsed: TaskPriority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(parsed, TaskPriority::Low);
    }

    #[test]
    fn test_update_task_is_empty() {
        assert!(UpdateTask::default().is_empty());
        assert!(!UpdateTask {
            completed: Some(true),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Write report".to_string(),
            description: None,
            priority: TaskPriority::Medium,
            completed: false,
            due_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(task).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("dueDate").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("user_id").is_none());
    }
}
