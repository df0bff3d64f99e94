// src/web/operation_handlers.rs
use crate::{
    db::BlobStore,
    error::{AppError, AppResult},
    models::operation::{Operation, OperationPatch},
    services::operation_service,
};
use axum::{
    body::Bytes,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct ListParams {
    q: Option<String>,
}

/// GET /operations[?q=termo]
pub async fn list_operations(
    State(store): State<BlobStore>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Operation>>> {
    let operations = operation_service::list_operations(&store, params.q.as_deref()).await?;
    Ok(Json(operations))
}

/// GET /operations/{id}
pub async fn get_operation(
    State(store): State<BlobStore>,
    Path(id): Path<String>,
) -> AppResult<Json<Operation>> {
    Ok(Json(operation_service::find_operation(&store, &id).await?))
}

/// POST /operations
pub async fn create_operation(
    State(store): State<BlobStore>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<Operation>)> {
    let patch = parse_patch(&body)?;
    let created = operation_service::create_operation(&store, patch).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT|PATCH /operations/{id}
pub async fn update_operation(
    State(store): State<BlobStore>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<Json<Operation>> {
    let patch = parse_patch(&body)?;
    Ok(Json(operation_service::update_operation(&store, &id, patch).await?))
}

/// DELETE /operations/{id}
pub async fn delete_operation(
    State(store): State<BlobStore>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    operation_service::delete_operation(&store, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

pub async fn not_found() -> AppError {
    AppError::NotFound("rota".to_string())
}

// Corpo vazio equivale a `{}`; não exige Content-Type
fn parse_patch(body: &Bytes) -> AppResult<OperationPatch> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(OperationPatch::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(e.to_string()))
}
