//! API handlers
//!
//! Every package-scoped operation runs through [`authorize_package`]:
//! a package belonging to another user reads as absent, never as
//! forbidden.

pub mod imports;
pub mod packages;
pub mod sub_packages;
pub mod work_orders;

use sqlx::PgPool;
use wo_core::traits::Id;
use wo_db::{PackageRepository, Repository};
use wo_models::Package;

use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthenticatedUser;

/// Load a package and require the caller to own it.
pub(crate) async fn authorize_package(
    pool: &PgPool,
    package_id: Id,
    user: &AuthenticatedUser,
) -> ApiResult<Package> {
    let package = PackageRepository::new(pool.clone())
        .find_by_id(package_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Package", package_id))?;
    ensure_owner(package_id, &package, user.id)?;
    Ok(package)
}

pub(crate) fn ensure_owner(package_id: Id, package: &Package, user_id: Id) -> ApiResult<()> {
    if package.owner_id == user_id {
        return Ok(());
    }
    Err(ApiError::not_found("Package", package_id))
}
