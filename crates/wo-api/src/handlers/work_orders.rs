//! Work order handlers
//!
//! Progress arrives as a raw number and is clamped to an integer in
//! [0, 100] before persistence. Every progress change appends a log entry
//! to the order's audit trail. All paths resolve the owning package and
//! require the caller to own it.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Deserializer};
use wo_core::traits::Id;
use wo_db::{
    CreateWorkOrderDto, Repository, SubPackageRepository, UpdateWorkOrderDto,
    WorkOrderLogRepository, WorkOrderRepository,
};
use wo_import::normalize_os_number;
use wo_models::{clamp_progress, WorkOrder, WorkOrderLog, WorkOrderStatus};

use super::authorize_package;
use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthenticatedUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkOrderBody {
    pub title: String,
    pub sub_package_id: Option<Id>,
    pub task: Option<String>,
    pub status: Option<WorkOrderStatus>,
    pub progress: Option<f64>,
    pub office: Option<String>,
    pub os_number: Option<String>,
    pub tag: Option<String>,
    pub machine_name: Option<String>,
    pub responsible: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkOrderBody {
    /// Absent: leave alone. `null`: detach from the sub-package.
    #[serde(default, deserialize_with = "double_option")]
    pub sub_package_id: Option<Option<Id>>,
    pub title: Option<String>,
    pub task: Option<String>,
    pub status: Option<WorkOrderStatus>,
    pub progress: Option<f64>,
    pub office: Option<String>,
    pub os_number: Option<String>,
    pub tag: Option<String>,
    pub machine_name: Option<String>,
    pub responsible: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLogBody {
    pub message: String,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<Id>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Id>::deserialize(deserializer).map(Some)
}

/// Load a work order and require the caller to own its package.
async fn load_owned_order(
    state: &AppState,
    id: Id,
    user: &AuthenticatedUser,
) -> ApiResult<WorkOrder> {
    let repo = WorkOrderRepository::new(state.pool.clone());
    let order = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("WorkOrder", id))?;
    authorize_package(&state.pool, order.package_id, user).await?;
    Ok(order)
}

/// GET /packages/:id/work_orders
pub async fn list_by_package(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(package_id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    authorize_package(&state.pool, package_id, &user).await?;
    let repo = WorkOrderRepository::new(state.pool.clone());
    let orders = repo.list_by_package(package_id).await?;
    Ok(Json(orders))
}

/// GET /sub_packages/:id/work_orders
pub async fn list_by_sub_package(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(sub_package_id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let subs = SubPackageRepository::new(state.pool.clone());
    let sub = subs
        .find_by_id(sub_package_id)
        .await?
        .ok_or_else(|| ApiError::not_found("SubPackage", sub_package_id))?;
    authorize_package(&state.pool, sub.package_id, &user).await?;

    let repo = WorkOrderRepository::new(state.pool.clone());
    let orders = repo.list_by_sub_package(sub_package_id).await?;
    Ok(Json(orders))
}

/// GET /work_orders/summaries
pub async fn list_summaries(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let repo = WorkOrderRepository::new(state.pool.clone());
    let summaries = repo.list_summaries(user.id).await?;
    Ok(Json(summaries))
}

/// GET /work_orders/summaries/:os_number
pub async fn get_summary_by_os(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(os_number): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let normalized = normalize_os_number(&os_number)
        .ok_or_else(|| ApiError::NotFound(format!("O.S. {:?} not found", os_number)))?;

    let repo = WorkOrderRepository::new(state.pool.clone());
    let summary = repo
        .find_summary_by_os(user.id, &normalized)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("O.S. {} not found", os_number)))?;
    Ok(Json(summary))
}

/// GET /work_orders/:id
pub async fn get_work_order(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let order = load_owned_order(&state, id, &user).await?;
    Ok(Json(order))
}

/// POST /packages/:id/work_orders
pub async fn create_work_order(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(package_id): Path<Id>,
    Json(body): Json<CreateWorkOrderBody>,
) -> ApiResult<impl IntoResponse> {
    if body.title.trim().is_empty() {
        return Err(ApiError::validation("Work order title must not be empty"));
    }

    authorize_package(&state.pool, package_id, &user).await?;

    let repo = WorkOrderRepository::new(state.pool.clone());
    let order = repo
        .create(CreateWorkOrderDto {
            package_id,
            sub_package_id: body.sub_package_id,
            title: body.title,
            task: body.task,
            status: body.status.unwrap_or_default(),
            progress: clamp_progress(body.progress.unwrap_or(0.0)),
            office: body.office,
            os_number: body.os_number,
            tag: body.tag,
            machine_name: body.machine_name,
            responsible: body.responsible,
            source_row: None,
            import_order: None,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// PATCH /work_orders/:id
pub async fn update_work_order(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(body): Json<UpdateWorkOrderBody>,
) -> ApiResult<impl IntoResponse> {
    let existing = load_owned_order(&state, id, &user).await?;

    let repo = WorkOrderRepository::new(state.pool.clone());
    let progress = body.progress.map(clamp_progress);
    let order = repo
        .update(
            id,
            UpdateWorkOrderDto {
                sub_package_id: body.sub_package_id,
                title: body.title,
                task: body.task,
                status: body.status,
                progress,
                office: body.office,
                os_number: body.os_number,
                tag: body.tag,
                machine_name: body.machine_name,
                responsible: body.responsible,
            },
        )
        .await?;

    if let Some(new_progress) = progress {
        if new_progress != existing.progress {
            let logs = WorkOrderLogRepository::new(state.pool.clone());
            let entry = WorkOrderLog::progress_change(id, existing.progress, new_progress);
            logs.append(id, &entry.message).await?;
        }
    }

    Ok(Json(order))
}

/// DELETE /work_orders/:id
pub async fn delete_work_order(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    load_owned_order(&state, id, &user).await?;
    let repo = WorkOrderRepository::new(state.pool.clone());
    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /work_orders/:id/logs
pub async fn list_logs(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(work_order_id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    load_owned_order(&state, work_order_id, &user).await?;
    let repo = WorkOrderLogRepository::new(state.pool.clone());
    let logs = repo.list_by_work_order(work_order_id).await?;
    Ok(Json(logs))
}

/// POST /work_orders/:id/logs
pub async fn add_log(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(work_order_id): Path<Id>,
    Json(body): Json<AddLogBody>,
) -> ApiResult<impl IntoResponse> {
    if body.message.trim().is_empty() {
        return Err(ApiError::validation("Log message must not be empty"));
    }

    load_owned_order(&state, work_order_id, &user).await?;

    let repo = WorkOrderLogRepository::new(state.pool.clone());
    let log = repo.append(work_order_id, &body.message).await?;
    Ok((StatusCode::CREATED, Json(log)))
}
