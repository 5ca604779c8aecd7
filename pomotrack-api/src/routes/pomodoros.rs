/// Pomodoro endpoints
///
/// # Endpoints
///
/// - `POST /v1/pomodoros` - Start a session against an owned task
/// - `POST /v1/pomodoros/:id/complete` - Complete a running session
/// - `GET  /v1/pomodoros` - Paginated list, optional `taskId` filter
/// - `GET  /v1/pomodoros/stats` - Aggregates over a lookback window
///
/// Starting a session validates the referenced task through the same
/// owner-scoped lookup as every other access, so a task id belonging to
/// another user is indistinguishable from one that does not exist.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{Duration, Utc};
use pomotrack_shared::{
    auth::middleware::AuthContext,
    models::{
        pagination::{PageParams, Pagination},
        pomodoro::{DailyCount, Pomodoro},
        task::Task,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default statistics lookback window in days
pub const DEFAULT_STATS_DAYS: i64 = 7;

/// Start-session request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartPomodoroRequest {
    /// Task to work against; must be owned by the caller
    pub task_id: Uuid,
}

/// Query parameters for the session list
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPomodorosQuery {
    /// Restrict to sessions of one task
    pub task_id: Option<Uuid>,

    /// 1-based page number
    pub page: Option<i64>,

    /// Rows per page
    pub page_size: Option<i64>,
}

/// Session list response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroListResponse {
    /// Sessions on this page, newest start first
    pub pomodoros: Vec<Pomodoro>,

    /// Pagination summary
    pub pagination: Pagination,
}

/// Query parameters for statistics
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    /// Lookback window in days; missing or non-positive falls back to 7
    pub days: Option<i64>,
}

/// Statistics response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Completed sessions started inside the window
    pub completed_count: i64,

    /// Focused minutes across those sessions (open sessions excluded)
    pub total_minutes: i64,

    /// Per-day completed counts, ascending by date
    pub daily_stats: Vec<DailyCount>,

    /// Window length in days that was applied
    pub period: i64,
}

/// Sanitizes the lookback window
fn lookback_days(days: Option<i64>) -> i64 {
    match days {
        Some(d) if d >= 1 => d,
        _ => DEFAULT_STATS_DAYS,
    }
}

/// Starts a pomodoro against one of the caller's tasks
pub async fn start_pomodoro(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<StartPomodoroRequest>,
) -> ApiResult<(StatusCode, Json<Pomodoro>)> {
    // The task must exist under this owner before a session may reference it
    Task::find_by_id_for_owner(&state.db, req.task_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let pomodoro = Pomodoro::start(&state.db, auth.user_id, req.task_id).await?;

    Ok((StatusCode::CREATED, Json(pomodoro)))
}

/// Completes a running pomodoro
///
/// First completion wins: a session that is already finished comes back
/// unchanged with its original end time.
pub async fn complete_pomodoro(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Pomodoro>> {
    if let Some(pomodoro) = Pomodoro::complete_for_owner(&state.db, id, auth.user_id).await? {
        return Ok(Json(pomodoro));
    }

    // Nothing transitioned: either the session is already terminal
    // (idempotent success) or it is absent/foreign (404).
    let pomodoro = Pomodoro::find_by_id_for_owner(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Pomodoro not found".to_string()))?;

    Ok(Json(pomodoro))
}

/// Lists the caller's pomodoros
pub async fn list_pomodoros(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListPomodorosQuery>,
) -> ApiResult<Json<PomodoroListResponse>> {
    let params = PageParams::new(query.page, query.page_size);

    let total = Pomodoro::count_for_owner(&state.db, auth.user_id, query.task_id).await?;
    let pomodoros = Pomodoro::list_for_owner(
        &state.db,
        auth.user_id,
        query.task_id,
        params.limit(),
        params.offset(),
    )
    .await?;

    Ok(Json(PomodoroListResponse {
        pomodoros,
        pagination: Pagination::new(params, total),
    }))
}

/// Reports aggregates over the caller's pomodoro history
pub async fn pomodoro_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<StatsQuery>,
) -> ApiResult<Json<StatsResponse>> {
    let days = lookback_days(query.days);
    let since = Utc::now() - Duration::days(days);

    let completed_count = Pomodoro::completed_count_since(&state.db, auth.user_id, since).await?;
    let total_minutes = Pomodoro::completed_minutes_since(&state.db, auth.user_id, since).await?;
    let daily_stats = Pomodoro::daily_completed_since(&state.db, auth.user_id, since).await?;

    Ok(Json(StatsResponse {
        completed_count,
        total_minutes,
        daily_stats,
        period: days,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookback_days_default() {
        assert_eq!(lookback_days(None), DEFAULT_STATS_DAYS);
    }

    #[test]
    fn test_lookback_days_rejects_non_positive() {
        assert_eq!(lookback_days(Some(0)), DEFAULT_STATS_DAYS);
        assert_eq!(lookback_days(Some(-5)), DEFAULT_STATS_DAYS);
    }

    #[test]
    fn test_lookback_days_accepts_positive() {
        assert_eq!(lookback_days(Some(1)), 1);
        assert_eq!(lookback_days(Some(30)), 30);
    }

    #[test]
    fn test_start_request_parses_camel_case() {
        let req: StartPomodoroRequest =
            serde_json::from_str(r#"{"taskId": "6f1c8a1e-9f33-4f6e-8d69-1fbb1e6a2b3c"}"#).unwrap();
        assert_eq!(
            req.task_id.to_string(),
            "6f1c8a1e-9f33-4f6e-8d69-1fbb1e6a2b3c"
        );
    }

    #[test]
    fn test_stats_response_serializes_camel_case() {
        let json = serde_json::to_value(StatsResponse {
            completed_count: 3,
            total_minutes: 75,
            daily_stats: vec![],
            period: 7,
        })
        .unwrap();

        assert!(json.get("completedCount").is_some());
        assert!(json.get("totalMinutes").is_some());
        assert!(json.get("dailyStats").is_some());
    }
}
