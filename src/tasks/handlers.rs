use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CreateTaskRequest, UpdateTaskRequest},
    repo_types::Task,
};
use crate::{
    auth::{dto::MessageResponse, extractors::CurrentUser},
    error::AppResult,
    extractors::{AppJson, AppPath},
    state::AppState,
};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/:id", put(update_task).delete(delete_task))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_tasks(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<Task>>> {
    let tasks = state.tasks.list(user.id).await?;
    Ok(Json(tasks))
}

#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn create_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(body): AppJson<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<Task>)> {
    let task = state.tasks.create(user.id, &body.title).await?;
    info!(task_id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

#[instrument(skip(state, user, patch), fields(user_id = %user.id))]
pub async fn update_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(patch): AppJson<UpdateTaskRequest>,
) -> AppResult<Json<Task>> {
    let task = state.tasks.update(id, user.id, &patch).await?;
    Ok(Json(task))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.tasks.delete(id, user.id).await?;
    info!(task_id = %id, "task deleted");
    Ok(Json(MessageResponse {
        message: "Task deleted",
    }))
}
