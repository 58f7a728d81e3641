use axum::{
    extract::{Query, State},
    Json,
};
use shared_types::{
    AppError, BookingStats, CourtOccupancy, DailyStats, DateRange, DateRangeQuery, StatsResponse,
};

use crate::auth::extractors::AdminRequired;
use crate::db::AppState;

fn resolve_range(state: &AppState, query: &DateRangeQuery) -> Result<DateRange, AppError> {
    query
        .resolve(state.settings.local_today())
        .map_err(AppError::bad_request)
}

fn envelope<T>(range: DateRange, data: T) -> Json<StatsResponse<T>> {
    Json(StatsResponse {
        from: range.from,
        to: range.to,
        data,
    })
}

// ---------------------------------------------------------------------------
// GET /api/admin/stats
// ---------------------------------------------------------------------------

/// Booking counts by status and money moved in the range.
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Summary", body = StatsResponse<BookingStats>),
        (status = 400, description = "Invalid range", body = AppError)
    ),
    tag = "stats"
)]
pub async fn booking_stats(
    State(state): State<AppState>,
    AdminRequired(_admin): AdminRequired,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<StatsResponse<BookingStats>>, AppError> {
    let range = resolve_range(&state, &query)?;
    let stats = state.store.booking_stats(range).await?;
    Ok(envelope(range, stats))
}

// ---------------------------------------------------------------------------
// GET /api/admin/stats/daily
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/admin/stats/daily",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "One row per day", body = StatsResponse<Vec<DailyStats>>),
        (status = 400, description = "Invalid range", body = AppError)
    ),
    tag = "stats"
)]
pub async fn daily_stats(
    State(state): State<AppState>,
    AdminRequired(_admin): AdminRequired,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<StatsResponse<Vec<DailyStats>>>, AppError> {
    let range = resolve_range(&state, &query)?;
    let days = state.store.daily_stats(range).await?;
    Ok(envelope(range, days))
}

// ---------------------------------------------------------------------------
// GET /api/admin/stats/courts
// ---------------------------------------------------------------------------

/// Share of each court's slots that were booked.
#[utoipa::path(
    get,
    path = "/api/admin/stats/courts",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Occupancy per court", body = StatsResponse<Vec<CourtOccupancy>>),
        (status = 400, description = "Invalid range", body = AppError)
    ),
    tag = "stats"
)]
pub async fn court_occupancy(
    State(state): State<AppState>,
    AdminRequired(_admin): AdminRequired,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<StatsResponse<Vec<CourtOccupancy>>>, AppError> {
    let range = resolve_range(&state, &query)?;
    let slots_per_day = state.settings.slot_starts.len() as i32;
    let courts = state.store.court_occupancy(range, slots_per_day).await?;
    Ok(envelope(range, courts))
}
