//! Sub-package handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use wo_core::traits::Id;
use wo_db::{CreateSubPackageDto, Repository, SubPackageRepository, UpdateSubPackageDto};

use super::authorize_package;
use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthenticatedUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubPackageBody {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubPackageBody {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// GET /packages/:id/sub_packages
pub async fn list_sub_packages(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(package_id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    authorize_package(&state.pool, package_id, &user).await?;
    let repo = SubPackageRepository::new(state.pool.clone());
    let sub_packages = repo.list_by_package(package_id).await?;
    Ok(Json(sub_packages))
}

/// POST /packages/:id/sub_packages
pub async fn create_sub_package(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(package_id): Path<Id>,
    Json(body): Json<CreateSubPackageBody>,
) -> ApiResult<impl IntoResponse> {
    if body.name.trim().is_empty() {
        return Err(ApiError::validation("Sub-package name must not be empty"));
    }

    authorize_package(&state.pool, package_id, &user).await?;

    let repo = SubPackageRepository::new(state.pool.clone());
    let sub_package = repo
        .create(CreateSubPackageDto {
            package_id,
            name: body.name,
            description: body.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(sub_package)))
}

/// PATCH /sub_packages/:id
pub async fn update_sub_package(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(body): Json<UpdateSubPackageBody>,
) -> ApiResult<impl IntoResponse> {
    let repo = SubPackageRepository::new(state.pool.clone());
    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("SubPackage", id))?;
    authorize_package(&state.pool, existing.package_id, &user).await?;

    let sub_package = repo
        .update(
            id,
            UpdateSubPackageDto {
                name: body.name,
                description: body.description,
            },
        )
        .await?;
    Ok(Json(sub_package))
}

/// DELETE /sub_packages/:id
pub async fn delete_sub_package(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let repo = SubPackageRepository::new(state.pool.clone());
    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("SubPackage", id))?;
    authorize_package(&state.pool, existing.package_id, &user).await?;

    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
