use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared_types::{
    AppError, BlockQuery, Court, CourtBlock, CourtRequest, CreateBlockRequest, MessageResponse,
};
use uuid::Uuid;

use crate::auth::extractors::AdminRequired;
use crate::db::AppState;
use crate::error_convert::ValidateRequest;

fn checked_court(body: &CourtRequest) -> Result<CourtRequest, AppError> {
    body.validate_request()?;
    let court = body.normalized().map_err(AppError::bad_request)?;
    if court.name.is_empty() {
        return Err(AppError::bad_request("Court name is required"));
    }
    Ok(court)
}

// ---------------------------------------------------------------------------
// GET /api/courts
// ---------------------------------------------------------------------------

/// Active courts in display order.
#[utoipa::path(
    get,
    path = "/api/courts",
    responses(
        (status = 200, description = "Active courts", body = Vec<Court>)
    ),
    tag = "courts"
)]
pub async fn list_courts(State(state): State<AppState>) -> Result<Json<Vec<Court>>, AppError> {
    Ok(Json(state.store.list_courts(false).await?))
}

// ---------------------------------------------------------------------------
// GET /api/admin/courts
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/admin/courts",
    responses(
        (status = 200, description = "All courts, including inactive ones", body = Vec<Court>),
        (status = 403, description = "Admin access required", body = AppError)
    ),
    tag = "courts"
)]
pub async fn admin_list_courts(
    State(state): State<AppState>,
    AdminRequired(_admin): AdminRequired,
) -> Result<Json<Vec<Court>>, AppError> {
    Ok(Json(state.store.list_courts(true).await?))
}

// ---------------------------------------------------------------------------
// POST /api/admin/courts
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/admin/courts",
    request_body = CourtRequest,
    responses(
        (status = 201, description = "Court created", body = Court),
        (status = 400, description = "Invalid court", body = AppError),
        (status = 403, description = "Admin access required", body = AppError)
    ),
    tag = "courts"
)]
#[tracing::instrument(skip(state, admin, body), fields(admin_id = %admin.id))]
pub async fn create_court(
    State(state): State<AppState>,
    AdminRequired(admin): AdminRequired,
    Json(body): Json<CourtRequest>,
) -> Result<(StatusCode, Json<Court>), AppError> {
    let court = state.store.create_court(&checked_court(&body)?).await?;
    tracing::info!(court_id = %court.id, name = %court.name, "Court created");
    Ok((StatusCode::CREATED, Json(court)))
}

// ---------------------------------------------------------------------------
// PUT /api/admin/courts/{id}
// ---------------------------------------------------------------------------

#[utoipa::path(
    put,
    path = "/api/admin/courts/{id}",
    params(("id" = Uuid, Path, description = "Court UUID")),
    request_body = CourtRequest,
    responses(
        (status = 200, description = "Court updated", body = Court),
        (status = 400, description = "Invalid court", body = AppError),
        (status = 404, description = "Court not found", body = AppError)
    ),
    tag = "courts"
)]
#[tracing::instrument(skip(state, admin, body), fields(admin_id = %admin.id))]
pub async fn update_court(
    State(state): State<AppState>,
    AdminRequired(admin): AdminRequired,
    Path(id): Path<Uuid>,
    Json(body): Json<CourtRequest>,
) -> Result<Json<Court>, AppError> {
    state
        .store
        .update_court(id, &checked_court(&body)?)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Court not found"))
}

// ---------------------------------------------------------------------------
// GET /api/admin/courts/{id}/blocks
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/admin/courts/{id}/blocks",
    params(("id" = Uuid, Path, description = "Court UUID"), BlockQuery),
    responses(
        (status = 200, description = "Blocked ranges", body = Vec<CourtBlock>),
        (status = 404, description = "Court not found", body = AppError)
    ),
    tag = "courts"
)]
pub async fn list_blocks(
    State(state): State<AppState>,
    AdminRequired(_admin): AdminRequired,
    Path(court_id): Path<Uuid>,
    Query(query): Query<BlockQuery>,
) -> Result<Json<Vec<CourtBlock>>, AppError> {
    if state.store.find_court(court_id).await?.is_none() {
        return Err(AppError::not_found("Court not found"));
    }
    Ok(Json(state.store.list_blocks(court_id, query.date).await?))
}

// ---------------------------------------------------------------------------
// POST /api/admin/courts/{id}/blocks
// ---------------------------------------------------------------------------

/// Block a range on one court, e.g. for maintenance or a tournament.
#[utoipa::path(
    post,
    path = "/api/admin/courts/{id}/blocks",
    params(("id" = Uuid, Path, description = "Court UUID")),
    request_body = CreateBlockRequest,
    responses(
        (status = 201, description = "Block created", body = CourtBlock),
        (status = 400, description = "Invalid range", body = AppError),
        (status = 404, description = "Court not found", body = AppError)
    ),
    tag = "courts"
)]
#[tracing::instrument(skip(state, admin, body), fields(admin_id = %admin.id))]
pub async fn create_block(
    State(state): State<AppState>,
    AdminRequired(admin): AdminRequired,
    Path(court_id): Path<Uuid>,
    Json(body): Json<CreateBlockRequest>,
) -> Result<(StatusCode, Json<CourtBlock>), AppError> {
    if body.start_time >= body.end_time {
        return Err(AppError::bad_request("Block start must be before its end"));
    }
    if state.store.find_court(court_id).await?.is_none() {
        return Err(AppError::not_found("Court not found"));
    }

    let block = state.store.create_block(court_id, &body).await?;
    tracing::info!(block_id = %block.id, %court_id, date = %block.block_date, "Court block created");
    Ok((StatusCode::CREATED, Json(block)))
}

// ---------------------------------------------------------------------------
// DELETE /api/admin/blocks/{id}
// ---------------------------------------------------------------------------

#[utoipa::path(
    delete,
    path = "/api/admin/blocks/{id}",
    params(("id" = Uuid, Path, description = "Block UUID")),
    responses(
        (status = 200, description = "Block removed", body = MessageResponse),
        (status = 404, description = "Block not found", body = AppError)
    ),
    tag = "courts"
)]
pub async fn delete_block(
    State(state): State<AppState>,
    AdminRequired(_admin): AdminRequired,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.store.delete_block(id).await? {
        return Err(AppError::not_found("Block not found"));
    }
    Ok(Json(MessageResponse::new("Block removed")))
}
