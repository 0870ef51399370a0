//! Spreadsheet import handler
//!
//! `POST /packages/:id/imports` with a multipart `file` part runs the whole
//! pipeline: parse, reconcile against existing package state, write through
//! the repositories, and answer with the run summary.

use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use wo_core::traits::Id;
use wo_db::{SubPackageRepository, WorkOrderRepository};
use wo_import::{reconcile, ImportSummary, PgImportStore, SheetParser, TargetPackage};

use super::authorize_package;
use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthenticatedUser;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    #[serde(flatten)]
    pub summary: ImportSummary,
    pub message: String,
}

/// POST /packages/:id/imports
pub async fn import_spreadsheet(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(package_id): Path<Id>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let package = authorize_package(&state.pool, package_id, &user).await?;

    let mut file: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;
            file = Some(bytes.to_vec());
            break;
        }
    }
    let file = file.ok_or_else(|| ApiError::validation("Select a file to import."))?;
    if file.is_empty() {
        return Err(ApiError::validation("Uploaded file is empty."));
    }

    let parser = SheetParser::new(state.import.header_row);
    let rows = parser.parse_bytes(&file)?;

    let target = TargetPackage {
        id: package_id,
        name: package.name.clone(),
    };

    if rows.is_empty() {
        let summary = ImportSummary {
            parsed: 0,
            created: 0,
            skipped: 0,
            sub_packages_created: 0,
            package_name: package.name,
        };
        let message = summary.message();
        return Ok(Json(ImportResponse { summary, message }));
    }

    let work_orders = WorkOrderRepository::new(state.pool.clone());
    let sub_packages = SubPackageRepository::new(state.pool.clone());
    let existing_orders = work_orders.list_by_package(package_id).await?;
    let existing_subs = sub_packages.list_by_package(package_id).await?;

    let store = PgImportStore::new(state.pool.clone());
    let summary = reconcile(&rows, &target, &existing_orders, existing_subs, &store).await?;

    tracing::info!(
        package_id,
        user_id = user.id,
        created = summary.created,
        skipped = summary.skipped,
        "spreadsheet import finished"
    );

    let message = summary.message();
    Ok(Json(ImportResponse { summary, message }))
}
