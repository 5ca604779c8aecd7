/// Task endpoints
///
/// # Endpoints
///
/// - `GET    /v1/tasks` - Paginated list, optional `completed` filter
/// - `POST   /v1/tasks` - Create a task
/// - `GET    /v1/tasks/:id` - Fetch one task
/// - `PUT    /v1/tasks/:id` - Partial update
/// - `DELETE /v1/tasks/:id` - Delete
///
/// All operations run through the owner-scoped accessors: the resolved
/// identity from the auth layer is the only owner these handlers can see.
/// The create handler forces ownership (there is no owner field a client
/// could spoof) and lookups of foreign-owned rows report plain 404.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use pomotrack_shared::{
    auth::middleware::AuthContext,
    models::{
        pagination::{PageParams, Pagination},
        task::{NewTask, Task, TaskPriority, UpdateTask},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Query parameters for the task list
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksQuery {
    /// Filter by completion state
    pub completed: Option<bool>,

    /// 1-based page number
    pub page: Option<i64>,

    /// Rows per page
    pub page_size: Option<i64>,
}

/// Task list response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListResponse {
    /// Tasks on this page, newest first
    pub tasks: Vec<Task>,

    /// Pagination summary
    pub pagination: Pagination,
}

/// Create-task request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Title, required and non-empty
    #[validate(length(min = 1, max = 255, message = "Title must not be empty"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Priority; defaults to medium when omitted
    pub priority: Option<TaskPriority>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,
}

/// Update-task request
///
/// Only present fields are applied. `id`, `userId` and `createdAt` are not
/// part of this type, so sending them has no effect.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    /// New title (non-empty when present)
    #[validate(length(min = 1, max = 255, message = "Title must not be empty"))]
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

/// Lists the caller's tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<TaskListResponse>> {
    let params = PageParams::new(query.page, query.page_size);

    let total = Task::count_for_owner(&state.db, auth.user_id, query.completed).await?;
    let tasks = Task::list_for_owner(
        &state.db,
        auth.user_id,
        query.completed,
        params.limit(),
        params.offset(),
    )
    .await?;

    Ok(Json(TaskListResponse {
        tasks,
        pagination: Pagination::new(params, total),
    }))
}

/// Creates a task owned by the caller
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    let task = Task::create(
        &state.db,
        auth.user_id,
        NewTask {
            title: req.title,
            description: req.description,
            priority: req.priority.unwrap_or_default(),
            due_date: req.due_date,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Fetches one of the caller's tasks
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = Task::find_by_id_for_owner(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Applies a partial update to one of the caller's tasks
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let update = UpdateTask {
        title: req.title,
        description: req.description,
        priority: req.priority,
        completed: req.completed,
        due_date: req.due_date,
    };

    let task = Task::update_for_owner(&state.db, id, auth.user_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Deletes one of the caller's tasks
///
/// Single conditional statement; zero rows affected, nonexistent or
/// foreign-owned alike, reports 404.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Task::delete_for_owner(&state.db, id, auth.user_id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
