//! Package handlers
//!
//! Reads and mutations of a specific package require ownership; packages
//! of other users read as absent. Deleting a package removes its
//! sub-packages, work orders, and logs in one pass (schema-level cascade).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use wo_core::traits::Id;
use wo_db::{CreatePackageDto, PackageRepository, Repository, UpdatePackageDto};
use wo_models::PackageStatus;

use super::authorize_package;
use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthenticatedUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePackageBody {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePackageBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<PackageStatus>,
}

/// GET /packages
pub async fn list_packages(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let repo = PackageRepository::new(state.pool.clone());
    let packages = repo.list_by_owner(user.id).await?;
    Ok(Json(packages))
}

/// GET /packages/:id
pub async fn get_package(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let package = authorize_package(&state.pool, id, &user).await?;
    Ok(Json(package))
}

/// POST /packages
pub async fn create_package(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreatePackageBody>,
) -> ApiResult<impl IntoResponse> {
    if body.name.trim().is_empty() {
        return Err(ApiError::validation("Package name must not be empty"));
    }

    let repo = PackageRepository::new(state.pool.clone());
    let package = repo
        .create(CreatePackageDto {
            name: body.name,
            description: body.description,
            owner_id: user.id,
        })
        .await?;

    tracing::info!(package_id = ?package.id, owner_id = user.id, "package created");
    Ok((StatusCode::CREATED, Json(package)))
}

/// PATCH /packages/:id
pub async fn update_package(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    Json(body): Json<UpdatePackageBody>,
) -> ApiResult<impl IntoResponse> {
    if let Some(name) = &body.name {
        if name.trim().is_empty() {
            return Err(ApiError::validation("Package name must not be empty"));
        }
    }

    authorize_package(&state.pool, id, &user).await?;
    let repo = PackageRepository::new(state.pool.clone());
    let package = repo
        .update(
            id,
            UpdatePackageDto {
                name: body.name,
                description: body.description,
                status: body.status,
            },
        )
        .await?;
    Ok(Json(package))
}

/// DELETE /packages/:id
pub async fn delete_package(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    authorize_package(&state.pool, id, &user).await?;
    let repo = PackageRepository::new(state.pool.clone());
    repo.delete(id).await?;
    tracing::info!(package_id = id, "package deleted with children");
    Ok(StatusCode::NO_CONTENT)
}
