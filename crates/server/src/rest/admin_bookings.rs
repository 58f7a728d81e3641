use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use shared_types::{
    AdminBookingQuery, AdminCancelBookingRequest, AdminCreateBookingRequest, AppError, Booking,
    BookingActionRequest, BookingFilter, BookingStatus, BookingView, CancelBookingResponse,
    NewBooking,
};

use crate::auth::extractors::AdminRequired;
use crate::db::AppState;
use crate::slots;

/// Resolve listing filters. With no dates the listing covers today.
fn booking_filter(
    query: &AdminBookingQuery,
    today: chrono::NaiveDate,
) -> Result<BookingFilter, AppError> {
    let from = query.from.unwrap_or(today);
    let to = query.to.unwrap_or(from);
    if from > to {
        return Err(AppError::bad_request("'from' must not be after 'to'"));
    }

    let status = match query.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(BookingStatus::parse(raw).ok_or_else(|| {
            AppError::bad_request(format!(
                "Invalid status '{raw}'. Valid values: confirmed, cancelled, completed, no_show"
            ))
        })?),
        None => None,
    };

    Ok(BookingFilter {
        from,
        to,
        court_id: query.court_id,
        status,
    })
}

/// 404 for an unknown booking before any procedure runs.
async fn ensure_booking(state: &AppState, booking_id: uuid::Uuid) -> Result<(), AppError> {
    state
        .store
        .find_booking(booking_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::not_found("Booking not found"))
}

// ---------------------------------------------------------------------------
// GET /api/admin/bookings
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/admin/bookings",
    params(AdminBookingQuery),
    responses(
        (status = 200, description = "Bookings in range", body = Vec<BookingView>),
        (status = 400, description = "Invalid filter", body = AppError),
        (status = 403, description = "Admin access required", body = AppError)
    ),
    tag = "admin"
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    AdminRequired(_admin): AdminRequired,
    Query(query): Query<AdminBookingQuery>,
) -> Result<Json<Vec<BookingView>>, AppError> {
    let filter = booking_filter(&query, state.settings.local_today())?;
    Ok(Json(state.store.list_bookings(&filter).await?))
}

// ---------------------------------------------------------------------------
// POST /api/admin/bookings/create
// ---------------------------------------------------------------------------

/// Book on behalf of a user. No horizon or active-booking limit applies.
#[utoipa::path(
    post,
    path = "/api/admin/bookings/create",
    request_body = AdminCreateBookingRequest,
    responses(
        (status = 201, description = "Booking confirmed", body = Booking),
        (status = 400, description = "Invalid slot or insufficient balance", body = AppError),
        (status = 404, description = "User or court not found", body = AppError)
    ),
    tag = "admin"
)]
#[tracing::instrument(skip(state, admin, body), fields(admin_id = %admin.id))]
pub async fn create_booking(
    State(state): State<AppState>,
    AdminRequired(admin): AdminRequired,
    Json(body): Json<AdminCreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    if state.store.find_profile(body.user_id).await?.is_none() {
        return Err(AppError::not_found("User not found"));
    }

    let slot = slots::bookable_slot(&state, body.court_id, body.date, body.start_time).await?;
    let deposit_cents = if body.charge_deposit {
        state.settings.app.booking.deposit_cents
    } else {
        0
    };

    let booking = state
        .store
        .booking_pay_deposit(&NewBooking {
            user_id: body.user_id,
            court_id: body.court_id,
            booking_date: body.date,
            start_time: slot.start_time,
            end_time: slot.end_time,
            deposit_cents,
        })
        .await?;

    tracing::info!(booking_id = %booking.id, user_id = %body.user_id, deposit_cents, "Admin booking created");
    Ok((StatusCode::CREATED, Json(booking)))
}

// ---------------------------------------------------------------------------
// POST /api/admin/bookings/cancel
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/admin/bookings/cancel",
    request_body = AdminCancelBookingRequest,
    responses(
        (status = 200, description = "Booking cancelled", body = CancelBookingResponse),
        (status = 400, description = "Booking is not confirmed", body = AppError),
        (status = 404, description = "Booking not found", body = AppError)
    ),
    tag = "admin"
)]
#[tracing::instrument(skip(state, admin, body), fields(admin_id = %admin.id))]
pub async fn cancel_booking(
    State(state): State<AppState>,
    AdminRequired(admin): AdminRequired,
    Json(body): Json<AdminCancelBookingRequest>,
) -> Result<Json<CancelBookingResponse>, AppError> {
    ensure_booking(&state, body.booking_id).await?;
    let result = state
        .store
        .admin_cancel_booking(body.booking_id, body.refund_deposit, admin.id)
        .await?;
    tracing::info!(booking_id = %result.booking_id, refunded = result.refunded_cents, "Admin cancelled booking");
    Ok(Json(result))
}

// ---------------------------------------------------------------------------
// POST /api/admin/bookings/noshow
// ---------------------------------------------------------------------------

/// Mark a no-show: the deposit is kept and the configured penalty charged.
#[utoipa::path(
    post,
    path = "/api/admin/bookings/noshow",
    request_body = BookingActionRequest,
    responses(
        (status = 200, description = "Booking marked as no-show", body = Booking),
        (status = 400, description = "Booking is not confirmed", body = AppError),
        (status = 404, description = "Booking not found", body = AppError)
    ),
    tag = "admin"
)]
#[tracing::instrument(skip(state, admin, body), fields(admin_id = %admin.id))]
pub async fn mark_noshow(
    State(state): State<AppState>,
    AdminRequired(admin): AdminRequired,
    Json(body): Json<BookingActionRequest>,
) -> Result<Json<Booking>, AppError> {
    ensure_booking(&state, body.booking_id).await?;
    let penalty = state.settings.app.booking.noshow_penalty_cents;
    let booking = state
        .store
        .admin_mark_noshow(body.booking_id, penalty, admin.id)
        .await?;
    tracing::info!(booking_id = %booking.id, penalty, "Booking marked as no-show");
    Ok(Json(booking))
}

// ---------------------------------------------------------------------------
// POST /api/admin/bookings/complete
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/admin/bookings/complete",
    request_body = BookingActionRequest,
    responses(
        (status = 200, description = "Booking completed", body = Booking),
        (status = 400, description = "Booking is not confirmed", body = AppError),
        (status = 404, description = "Booking not found", body = AppError)
    ),
    tag = "admin"
)]
#[tracing::instrument(skip(state, admin, body), fields(admin_id = %admin.id))]
pub async fn complete_booking(
    State(state): State<AppState>,
    AdminRequired(admin): AdminRequired,
    Json(body): Json<BookingActionRequest>,
) -> Result<Json<Booking>, AppError> {
    ensure_booking(&state, body.booking_id).await?;
    let booking = state
        .store
        .admin_complete_booking(body.booking_id, admin.id)
        .await?;
    Ok(Json(booking))
}
