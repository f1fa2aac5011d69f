//! Request handlers for the task endpoints.

use super::{
    dto::{
        ChecklistBody, CreateTaskBody, HealthResponse, MessageResponse, PrDescriptionResponse,
        TaskResponse, TransitionBody, UpdateTaskBody,
    },
    error::{ApiError, ErrorReason},
    router::AppState,
};
use crate::task::{
    domain::{ChecklistItem, ChecklistItemId, PrMetadata, PrMetadataFields, TaskId},
    ports::TaskRepository,
    services::{
        CreateTaskRequest, TransitionTaskRequest, UpdateTaskRequest, UpsertPrMetadataRequest,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use mockable::Clock;

type ApiResult<T> = Result<T, ApiError>;

fn parse_task_id(raw: &str) -> ApiResult<TaskId> {
    raw.parse()
        .map_err(|_| ApiError::validation("Invalid task id"))
}

fn parse_item_id(raw: &str) -> ApiResult<ChecklistItemId> {
    raw.parse()
        .map_err(|_| ApiError::validation("Invalid checklist item id"))
}

pub(super) async fn health<R, C>(
    State(state): State<AppState<R, C>>,
) -> Result<Json<HealthResponse>, ApiError>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    state.service.check_health().await.map_err(|err| {
        tracing::error!(error = %err, "health check failed");
        ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorReason::InternalError,
            "database unavailable",
        )
    })?;
    Ok(Json(HealthResponse {
        status: "ok".to_owned(),
    }))
}

pub(super) async fn list_tasks<R, C>(
    State(state): State<AppState<R, C>>,
) -> ApiResult<Json<Vec<TaskResponse>>>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let tasks = state.service.list_tasks().await?;
    Ok(Json(tasks.iter().map(TaskResponse::from).collect()))
}

pub(super) async fn create_task<R, C>(
    State(state): State<AppState<R, C>>,
    Json(body): Json<CreateTaskBody>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let (Some(title), Some(description)) = (body.title, body.description) else {
        return Err(ApiError::validation("Title and description are required"));
    };
    let request = CreateTaskRequest::new(title, description)
        .with_pr_metadata(body.pr_metadata.unwrap_or_default());
    let task = state.service.create_task(request).await?;
    Ok((StatusCode::CREATED, Json(TaskResponse::from(&task))))
}

pub(super) async fn get_task<R, C>(
    State(state): State<AppState<R, C>>,
    Path(id): Path<String>,
) -> ApiResult<Json<TaskResponse>>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let task = state.service.get_task(parse_task_id(&id)?).await?;
    Ok(Json(TaskResponse::from(&task)))
}

pub(super) async fn update_task<R, C>(
    State(state): State<AppState<R, C>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateTaskBody>,
) -> ApiResult<Json<TaskResponse>>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let task_id = parse_task_id(&id)?;
    let (Some(title), Some(description)) = (body.title, body.description) else {
        return Err(ApiError::validation("Title and description are required"));
    };
    let task = state
        .service
        .update_task(UpdateTaskRequest::new(task_id, title, description))
        .await?;
    Ok(Json(TaskResponse::from(&task)))
}

pub(super) async fn delete_task<R, C>(
    State(state): State<AppState<R, C>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    state.service.delete_task(parse_task_id(&id)?).await?;
    Ok(Json(MessageResponse {
        message: "Task deleted successfully".to_owned(),
    }))
}

pub(super) async fn transition_task<R, C>(
    State(state): State<AppState<R, C>>,
    Path(id): Path<String>,
    Json(body): Json<TransitionBody>,
) -> ApiResult<Json<TaskResponse>>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let task_id = parse_task_id(&id)?;
    let request = TransitionTaskRequest::new(
        task_id,
        body.status.unwrap_or_default(),
        body.notes.unwrap_or_default(),
    )
    .with_mode(body.mode);
    let task = state.service.transition_task(request).await?;
    Ok(Json(TaskResponse::from(&task)))
}

pub(super) async fn set_checklist_item<R, C>(
    State(state): State<AppState<R, C>>,
    Path((id, item_id)): Path<(String, String)>,
    Json(body): Json<ChecklistBody>,
) -> ApiResult<Json<ChecklistItem>>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let task_id = parse_task_id(&id)?;
    let checklist_item_id = parse_item_id(&item_id)?;
    let Some(checked) = body.checked else {
        return Err(ApiError::validation("Checked status is required"));
    };
    let item = state
        .service
        .set_checklist_item(task_id, checklist_item_id, checked)
        .await?;
    Ok(Json(item))
}

pub(super) async fn get_pr_metadata<R, C>(
    State(state): State<AppState<R, C>>,
    Path(id): Path<String>,
) -> ApiResult<Json<PrMetadata>>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let metadata = state.service.get_pr_metadata(parse_task_id(&id)?).await?;
    Ok(Json(metadata))
}

pub(super) async fn upsert_pr_metadata<R, C>(
    State(state): State<AppState<R, C>>,
    Path(id): Path<String>,
    Json(fields): Json<PrMetadataFields>,
) -> ApiResult<Json<PrMetadata>>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let task_id = parse_task_id(&id)?;
    let metadata = state
        .service
        .upsert_pr_metadata(UpsertPrMetadataRequest::new(task_id, fields))
        .await?;
    Ok(Json(metadata))
}

pub(super) async fn pr_description<R, C>(
    State(state): State<AppState<R, C>>,
    Path(id): Path<String>,
) -> ApiResult<Json<PrDescriptionResponse>>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let markdown = state
        .service
        .render_pr_description(parse_task_id(&id)?)
        .await?;
    Ok(Json(PrDescriptionResponse { markdown }))
}
