use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use shared_types::{
    AppError, AvailabilityQuery, AvailabilityResponse, Booking, BookingView, CancelBookingRequest,
    CancelBookingResponse, CreateBookingRequest, NewBooking,
};

use crate::auth::extractors::AuthRequired;
use crate::db::AppState;
use crate::slots;

// ---------------------------------------------------------------------------
// GET /api/bookings/availability
// ---------------------------------------------------------------------------

/// Free 90-minute slots for one court and date.
#[utoipa::path(
    get,
    path = "/api/bookings/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Free slots", body = AvailabilityResponse),
        (status = 404, description = "Court not found", body = AppError)
    ),
    tag = "bookings"
)]
pub async fn availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    slots::active_court(&state, query.court_id).await?;
    let slots = slots::free_slots(&state, query.court_id, query.date).await?;

    Ok(Json(AvailabilityResponse {
        court_id: query.court_id,
        date: query.date,
        slots,
    }))
}

// ---------------------------------------------------------------------------
// POST /api/bookings/create
// ---------------------------------------------------------------------------

/// Book a slot for the caller and charge the deposit from their wallet.
#[utoipa::path(
    post,
    path = "/api/bookings/create",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking confirmed", body = Booking),
        (status = 400, description = "Invalid slot, limit reached or insufficient balance", body = AppError),
        (status = 401, description = "Not signed in", body = AppError),
        (status = 404, description = "Court not found", body = AppError)
    ),
    tag = "bookings"
)]
#[tracing::instrument(skip(state, claims), fields(user_id = %claims.sub))]
pub async fn create_booking(
    State(state): State<AppState>,
    AuthRequired(claims): AuthRequired,
    Json(body): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let policy = &state.settings.app.booking;
    let now = state.settings.local_now();

    slots::check_booking_window(body.date, now.date(), policy.max_days_ahead)?;
    let slot = slots::bookable_slot(&state, body.court_id, body.date, body.start_time).await?;

    let active = state.store.count_active_bookings(claims.sub, now).await?;
    if active >= policy.max_active_bookings as i64 {
        return Err(AppError::bad_request(format!(
            "You already have {} upcoming bookings, the maximum allowed",
            policy.max_active_bookings
        )));
    }

    let booking = state
        .store
        .booking_pay_deposit(&NewBooking {
            user_id: claims.sub,
            court_id: body.court_id,
            booking_date: body.date,
            start_time: slot.start_time,
            end_time: slot.end_time,
            deposit_cents: policy.deposit_cents,
        })
        .await?;

    tracing::info!(booking_id = %booking.id, court_id = %booking.court_id, "Booking created");
    Ok((StatusCode::CREATED, Json(booking)))
}

// ---------------------------------------------------------------------------
// POST /api/bookings/cancel
// ---------------------------------------------------------------------------

/// Cancel one of the caller's upcoming bookings. The deposit comes back only
/// with enough notice.
#[utoipa::path(
    post,
    path = "/api/bookings/cancel",
    request_body = CancelBookingRequest,
    responses(
        (status = 200, description = "Booking cancelled", body = CancelBookingResponse),
        (status = 400, description = "Booking cannot be cancelled", body = AppError),
        (status = 401, description = "Not signed in", body = AppError),
        (status = 404, description = "Booking not found", body = AppError)
    ),
    tag = "bookings"
)]
#[tracing::instrument(skip(state, claims), fields(user_id = %claims.sub))]
pub async fn cancel_booking(
    State(state): State<AppState>,
    AuthRequired(claims): AuthRequired,
    Json(body): Json<CancelBookingRequest>,
) -> Result<Json<CancelBookingResponse>, AppError> {
    // Someone else's booking looks the same as a missing one.
    state
        .store
        .find_booking(body.booking_id)
        .await?
        .filter(|b| b.user_id == claims.sub)
        .ok_or_else(|| AppError::not_found("Booking not found"))?;

    let result = state
        .store
        .booking_cancel(
            claims.sub,
            body.booking_id,
            state.settings.app.booking.cancellation_notice_hours,
            &state.settings.app.club.timezone,
        )
        .await?;

    tracing::info!(booking_id = %result.booking_id, refunded = result.refunded_cents, "Booking cancelled");
    Ok(Json(result))
}

// ---------------------------------------------------------------------------
// GET /api/bookings/mine
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/bookings/mine",
    responses(
        (status = 200, description = "Caller's bookings, newest first", body = Vec<BookingView>),
        (status = 401, description = "Not signed in", body = AppError)
    ),
    tag = "bookings"
)]
pub async fn my_bookings(
    State(state): State<AppState>,
    AuthRequired(claims): AuthRequired,
) -> Result<Json<Vec<BookingView>>, AppError> {
    Ok(Json(state.store.user_bookings(claims.sub).await?))
}
