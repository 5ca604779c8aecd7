/// Pomodoro model, owner-scoped operations and aggregates
///
/// A pomodoro is a focus session recorded against one of the owner's tasks.
///
/// # State machine
///
/// ```text
/// running → completed
///         → interrupted
/// ```
///
/// # Schema
///
/// ```sql
/// CREATE TYPE pomodoro_status AS ENUM ('running', 'completed', 'interrupted');
///
/// CREATE TABLE pomodoros (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     start_time TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     expected_end_time TIMESTAMPTZ NOT NULL,
///     end_time TIMESTAMPTZ,
///     status pomodoro_status NOT NULL DEFAULT 'running',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Standard pomodoro session length in minutes
pub const SESSION_MINUTES: i32 = 25;

/// Pomodoro session state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "pomodoro_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PomodoroStatus {
    /// Session in progress (the initial state)
    #[default]
    Running,

    /// Session finished by an explicit completion
    Completed,

    /// Session abandoned before completion
    Interrupted,
}

impl PomodoroStatus {
    /// Status as its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            PomodoroStatus::Running => "running",
            PomodoroStatus::Completed => "completed",
            PomodoroStatus::Interrupted => "interrupted",
        }
    }

    /// True once the session can no longer change state
    pub fn is_terminal(&self) -> bool {
        matches!(self, PomodoroStatus::Completed | PomodoroStatus::Interrupted)
    }
}

/// Recorded pomodoro session
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Pomodoro {
    /// Unique session id
    pub id: Uuid,

    /// Task this session was worked against
    pub task_id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// When the session started
    pub start_time: DateTime<Utc>,

    /// start_time plus the standard session length
    pub expected_end_time: DateTime<Utc>,

    /// Actual end (None while running)
    pub end_time: Option<DateTime<Utc>>,

    /// Current state
    pub status: PomodoroStatus,

    /// When the row was created
    pub created_at: DateTime<Utc>,
}

impl Pomodoro {
    /// Actual session length in whole minutes, once ended
    pub fn duration_minutes(&self) -> Option<i64> {
        self.end_time.map(|end| (end - self.start_time).num_minutes())
    }

    /// Starts a session against a task
    ///
    /// The caller must have already confirmed the task belongs to `owner`.
    /// Start and expected end come from the same statement clock, so the
    /// expected end is exactly the session length after the start.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use pomotrack_shared::models::pomodoro::Pomodoro;
    /// # use sqlx::PgPool;
    /// # use uuid::Uuid;
    /// # async fn example(pool: PgPool, owner: Uuid, task_id: Uuid) -> Result<(), sqlx::Error> {
    /// let pomodoro = Pomodoro::start(&pool, owner, task_id).await?;
    /// assert_eq!(
    ///     pomodoro.expected_end_time - pomodoro.start_time,
    ///     chrono::Duration::minutes(25),
    /// );
    /// # Ok(())
    /// # }
    /// ```
    pub async fn start(pool: &PgPool, owner: Uuid, task_id: Uuid) -> Result<Self, sqlx::Error> {
        let pomodoro = sqlx::query_as::<_, Pomodoro>(
            r#"
            INSERT INTO pomodoros (task_id, user_id, start_time, expected_end_time)
            VALUES ($1, $2, NOW(), NOW() + make_interval(mins => $3))
            RETURNING id, task_id, user_id, start_time, expected_end_time, end_time,
                      status, created_at
            "#,
        )
        .bind(task_id)
        .bind(owner)
        .bind(SESSION_MINUTES)
        .fetch_one(pool)
        .await?;

        Ok(pomodoro)
    }

    /// Finds a session by id, scoped to its owner
    pub async fn find_by_id_for_owner(
        pool: &PgPool,
        id: Uuid,
        owner: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let pomodoro = sqlx::query_as::<_, Pomodoro>(
            r#"
            SELECT id, task_id, user_id, start_time, expected_end_time, end_time,
                   status, created_at
            FROM pomodoros
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(pool)
        .await?;

        Ok(pomodoro)
    }

    /// Completes a running session
    ///
    /// Conditional on `status = 'running'`, so the first completion wins:
    /// a session that is already terminal is left untouched and `None` is
    /// returned. Callers distinguish "already finished" from "absent" with
    /// a scoped re-read.
    pub async fn complete_for_owner(
        pool: &PgPool,
        id: Uuid,
        owner: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let pomodoro = sqlx::query_as::<_, Pomodoro>(
            r#"
            UPDATE pomodoros
            SET end_time = NOW(), status = 'completed'
            WHERE id = $1 AND user_id = $2 AND status = 'running'
            RETURNING id, task_id, user_id, start_time, expected_end_time, end_time,
                      status, created_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(pool)
        .await?;

        Ok(pomodoro)
    }

    /// Lists the owner's sessions, newest start first, optionally filtered
    /// to one task
    pub async fn list_for_owner(
        pool: &PgPool,
        owner: Uuid,
        task_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let pomodoros = match task_id {
            Some(task_id) => {
                sqlx::query_as::<_, Pomodoro>(
                    r#"
                    SELECT id, task_id, user_id, start_time, expected_end_time, end_time,
                           status, created_at
                    FROM pomodoros
                    WHERE user_id = $1 AND task_id = $2
                    ORDER BY start_time DESC
                    LIMIT $3 OFFSET $4
                    "#,
                )
                .bind(owner)
                .bind(task_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Pomodoro>(
                    r#"
                    SELECT id, task_id, user_id, start_time, expected_end_time, end_time,
                           status, created_at
                    FROM pomodoros
                    WHERE user_id = $1
                    ORDER BY start_time DESC
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

        Ok(pomodoros)
    }

    /// Counts the owner's sessions under the same filter as
    /// [`Self::list_for_owner`]
    pub async fn count_for_owner(
        pool: &PgPool,
        owner: Uuid,
        task_id: Option<Uuid>,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = match task_id {
            Some(task_id) => {
                sqlx::query_as("SELECT COUNT(*) FROM pomodoros WHERE user_id = $1 AND task_id = $2")
                    .bind(owner)
                    .bind(task_id)
                    .fetch_one(pool)
                    .await?
            }
            None => {
                sqlx::query_as("SELECT COUNT(*) FROM pomodoros WHERE user_id = $1")
                    .bind(owner)
                    .fetch_one(pool)
                    .await?
            }
        };

        Ok(count)
    }

    /// Counts the owner's completed sessions started since `since`
    pub async fn completed_count_since(
        pool: &PgPool,
        owner: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM pomodoros
            WHERE user_id = $1 AND status = 'completed' AND start_time >= $2
            "#,
        )
        .bind(owner)
        .bind(since)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Sums the focused minutes of the owner's completed sessions started
    /// since `since`
    ///
    /// Sessions without an end time contribute nothing.
    pub async fn completed_minutes_since(
        pool: &PgPool,
        owner: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error> {
        let (minutes,): (i64,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(EXTRACT(EPOCH FROM (end_time - start_time)) / 60), 0)::BIGINT
            FROM pomodoros
            WHERE user_id = $1 AND status = 'completed'
              AND start_time >= $2 AND end_time IS NOT NULL
            "#,
        )
        .bind(owner)
        .bind(since)
        .fetch_one(pool)
        .await?;

        Ok(minutes)
    }

    /// Per-day completed counts for the owner since `since`, ascending by
    /// date
    pub async fn daily_completed_since(
        pool: &PgPool,
        owner: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailyCount>, sqlx::Error> {
        let rows = sqlx::query_as::<_, DailyCount>(
            r#"
            SELECT to_char(start_time AT TIME ZONE 'UTC', 'YYYY-MM-DD') AS date,
                   COUNT(*) AS count
            FROM pomodoros
            WHERE user_id = $1 AND status = 'completed' AND start_time >= $2
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(owner)
        .bind(since)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}

/// One day's completed-session count
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyCount {
    /// Day as `YYYY-MM-DD` (UTC)
    pub date: String,

    /// Completed sessions started that day
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_pomodoro(end_offset_minutes: Option<i64>) -> Pomodoro {
        let start = Utc::now();
        Pomodoro {
            id: Uuid::new_v4(),
            task_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            start_time: start,
            expected_end_time: start + Duration::minutes(SESSION_MINUTES as i64),
            end_time: end_offset_minutes.map(|m| start + Duration::minutes(m)),
            status: if end_offset_minutes.is_some() {
                PomodoroStatus::Completed
            } else {
                PomodoroStatus::Running
            },
            created_at: start,
        }
    }

    #[test]
    fn test_status_as_str() {
        assert_eq!(PomodoroStatus::Running.as_str(), "running");
        assert_eq!(PomodoroStatus::Completed.as_str(), "completed");
        assert_eq!(PomodoroStatus::Interrupted.as_str(), "interrupted");
    }

    #[test]
    fn test_status_default_is_running() {
        assert_eq!(PomodoroStatus::default(), PomodoroStatus::Running);
    }

    #[test]
    fn test_status_terminal() {
        assert!(!PomodoroStatus::Running.is_terminal());
        assert!(PomodoroStatus::Completed.is_terminal());
        assert!(PomodoroStatus::Interrupted.is_terminal());
    }

    #[test]
    fn test_duration_minutes_open_session() {
        assert_eq!(sample_pomodoro(None).duration_minutes(), None);
    }

    #[test]
    fn test_duration_minutes_finished_session() {
        assert_eq!(sample_pomodoro(Some(25)).duration_minutes(), Some(25));
    }

    #[test]
    fn test_expected_end_is_session_length_after_start() {
        let p = sample_pomodoro(None);
        assert_eq!(
            p.expected_end_time - p.start_time,
            Duration::minutes(SESSION_MINUTES as i64)
        );
    }

    #[test]
    fn test_pomodoro_serializes_camel_case() {
        let json = serde_json::to_value(sample_pomodoro(Some(25))).unwrap();
        assert!(json.get("taskId").is_some());
        assert!(json.get("startTime").is_some());
        assert!(json.get("expectedEndTime").is_some());
        assert!(json.get("endTime").is_some());
        assert!(json.get("task_id").is_none());
    }
}
