use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::response::{ApiError, AppJson, AppQuery, DataEnvelope, ListEnvelope, ListMeta};
use crate::storage::models::{SortField, SortOrder, TaskQuery, TaskRecord, TaskStatus};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TaskBody {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ListTasksParams {
    pub limit: u64,
    pub page: u64,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
}

const TITLE_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 255;

impl TaskBody {
    /// Validate the body the way the original API did: all fields required,
    /// length caps on the text fields, status restricted to known values.
    fn validated(&self) -> Result<(&str, &str, TaskStatus), ApiError> {
        if self.title.is_empty() {
            return Err(ApiError::bad_request("title is required"));
        }
        if self.title.chars().count() > TITLE_MAX {
            return Err(ApiError::bad_request(format!(
                "title must be at most {TITLE_MAX} characters"
            )));
        }
        if self.description.is_empty() {
            return Err(ApiError::bad_request("description is required"));
        }
        if self.description.chars().count() > DESCRIPTION_MAX {
            return Err(ApiError::bad_request(format!(
                "description must be at most {DESCRIPTION_MAX} characters"
            )));
        }
        if self.status.is_empty() {
            return Err(ApiError::bad_request("status is required"));
        }
        let status = TaskStatus::parse(&self.status)
            .ok_or_else(|| ApiError::bad_request("Invalid status"))?;

        Ok((&self.title, &self.description, status))
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<ListTasksParams>,
) -> Result<Json<ListEnvelope<TaskResponse>>, ApiError> {
    if params.limit == 0 {
        return Err(ApiError::bad_request("limit must be greater than 0"));
    }
    if params.page == 0 {
        return Err(ApiError::bad_request("page must be greater than 0"));
    }

    let status = match params.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            TaskStatus::parse(raw).ok_or_else(|| ApiError::bad_request("Invalid status"))?,
        ),
        None => None,
    };

    // Unknown sort fields fall back to the default ordering, mirroring the
    // permissive behavior of the original API
    let sort_by = params.sort_by.as_deref().and_then(SortField::parse);
    let order = params.order.map(SortOrder::from_order);

    let query = TaskQuery {
        page: params.page,
        limit: params.limit,
        search: params.search.clone(),
        status,
        sort_by,
        order,
    };

    let (tasks, total) = state
        .db
        .list_tasks(&query)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let items: Vec<TaskResponse> = tasks.iter().map(task_to_response).collect();

    Ok(ListEnvelope::success(
        items,
        ListMeta {
            page: params.page,
            limit: params.limit,
            total,
        },
    ))
}

pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DataEnvelope<TaskResponse>>, ApiError> {
    let task = state
        .db
        .get_task(&id)
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("data not found"))?;

    Ok(DataEnvelope::success(task_to_response(&task)))
}

pub async fn create_task(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<TaskBody>,
) -> Result<(StatusCode, Json<DataEnvelope<TaskResponse>>), ApiError> {
    let (title, description, status) = body.validated()?;

    let now = Utc::now();
    let task = TaskRecord {
        id: uuid::Uuid::new_v4().to_string(),
        title: title.to_string(),
        description: description.to_string(),
        status,
        created_at: now,
        updated_at: now,
    };

    state
        .db
        .put_task(&task)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::debug!(task_id = %task.id, "Created task");

    Ok((
        StatusCode::CREATED,
        DataEnvelope::success(task_to_response(&task)),
    ))
}

pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AppJson(body): AppJson<TaskBody>,
) -> Result<Json<DataEnvelope<TaskResponse>>, ApiError> {
    let (title, description, status) = body.validated()?;

    let task = state
        .db
        .update_task(&id, title, description, status)
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("data not found"))?;

    tracing::debug!(task_id = %id, "Updated task");
    Ok(DataEnvelope::success(task_to_response(&task)))
}

pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state
        .db
        .delete_task(&id)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    if !deleted {
        return Err(ApiError::not_found("data not found"));
    }

    tracing::debug!(task_id = %id, "Deleted task");
    // The original API returns an empty object on delete
    Ok(Json(serde_json::json!({})))
}

// ============================================================================
// Helpers
// ============================================================================

fn task_to_response(task: &TaskRecord) -> TaskResponse {
    TaskResponse {
        id: task.id.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        status: task.status,
        created_at: task.created_at.to_rfc3339(),
    }
}
