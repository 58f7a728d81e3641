use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared_types::{
    AppError, ClubDay, ClubScheduleResponse, CreateExceptionRequest, MessageResponse,
    ScheduleException,
};
use uuid::Uuid;

use crate::auth::extractors::AdminRequired;
use crate::db::AppState;

// ---------------------------------------------------------------------------
// GET /api/club/schedule
// ---------------------------------------------------------------------------

/// Weekly opening hours plus exceptions from today on.
#[utoipa::path(
    get,
    path = "/api/club/schedule",
    responses(
        (status = 200, description = "Club schedule", body = ClubScheduleResponse)
    ),
    tag = "schedule"
)]
pub async fn get_schedule(
    State(state): State<AppState>,
) -> Result<Json<ClubScheduleResponse>, AppError> {
    let today = state.settings.local_today();
    let (weekly, exceptions) = tokio::try_join!(
        state.store.club_schedule(),
        state.store.list_exceptions(today),
    )?;

    Ok(Json(ClubScheduleResponse {
        timezone: state.settings.app.club.timezone.clone(),
        weekly,
        exceptions,
    }))
}

// ---------------------------------------------------------------------------
// PUT /api/admin/schedule
// ---------------------------------------------------------------------------

/// Replace the hours of one weekday.
#[utoipa::path(
    put,
    path = "/api/admin/schedule",
    request_body = ClubDay,
    responses(
        (status = 200, description = "Weekday saved", body = ClubDay),
        (status = 400, description = "Invalid hours", body = AppError),
        (status = 403, description = "Admin access required", body = AppError)
    ),
    tag = "schedule"
)]
#[tracing::instrument(skip(state, admin, body), fields(admin_id = %admin.id))]
pub async fn update_weekday(
    State(state): State<AppState>,
    AdminRequired(admin): AdminRequired,
    Json(body): Json<ClubDay>,
) -> Result<Json<ClubDay>, AppError> {
    body.validate().map_err(AppError::bad_request)?;
    let day = state.store.upsert_club_day(&body).await?;
    tracing::info!(weekday = day.weekday, is_open = day.is_open, "Club hours updated");
    Ok(Json(day))
}

// ---------------------------------------------------------------------------
// POST /api/admin/schedule/exceptions
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/admin/schedule/exceptions",
    request_body = CreateExceptionRequest,
    responses(
        (status = 201, description = "Exception created", body = ScheduleException),
        (status = 400, description = "Invalid hours", body = AppError),
        (status = 409, description = "Date already has an exception", body = AppError)
    ),
    tag = "schedule"
)]
#[tracing::instrument(skip(state, admin, body), fields(admin_id = %admin.id))]
pub async fn create_exception(
    State(state): State<AppState>,
    AdminRequired(admin): AdminRequired,
    Json(body): Json<CreateExceptionRequest>,
) -> Result<(StatusCode, Json<ScheduleException>), AppError> {
    body.validate().map_err(AppError::bad_request)?;
    let exception = state.store.create_exception(&body).await?;
    tracing::info!(date = %exception.exception_date, closed = exception.is_closed, "Schedule exception added");
    Ok((StatusCode::CREATED, Json(exception)))
}

// ---------------------------------------------------------------------------
// DELETE /api/admin/schedule/exceptions/{id}
// ---------------------------------------------------------------------------

#[utoipa::path(
    delete,
    path = "/api/admin/schedule/exceptions/{id}",
    params(("id" = Uuid, Path, description = "Exception UUID")),
    responses(
        (status = 200, description = "Exception removed", body = MessageResponse),
        (status = 404, description = "Exception not found", body = AppError)
    ),
    tag = "schedule"
)]
pub async fn delete_exception(
    State(state): State<AppState>,
    AdminRequired(_admin): AdminRequired,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.store.delete_exception(id).await? {
        return Err(AppError::not_found("Exception not found"));
    }
    Ok(Json(MessageResponse::new("Exception removed")))
}
