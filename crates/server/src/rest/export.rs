use axum::{
    extract::{Query, State},
    response::Response,
};
use shared_types::{format_cents, AppError, BookingFilter, DateRangeQuery};

use crate::auth::extractors::AdminRequired;
use crate::csv::{csv_response, CsvWriter};
use crate::db::AppState;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// GET /api/admin/export/bookings
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/admin/export/bookings",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Bookings CSV", body = String, content_type = "text/csv"),
        (status = 400, description = "Invalid range", body = AppError)
    ),
    tag = "export"
)]
pub async fn export_bookings(
    State(state): State<AppState>,
    AdminRequired(_admin): AdminRequired,
    Query(query): Query<DateRangeQuery>,
) -> Result<Response, AppError> {
    let range = query
        .resolve(state.settings.local_today())
        .map_err(AppError::bad_request)?;
    let bookings = state
        .store
        .list_bookings(&BookingFilter {
            from: range.from,
            to: range.to,
            court_id: None,
            status: None,
        })
        .await?;

    let mut csv = CsvWriter::new(&[
        "id", "date", "start", "end", "court", "user_email", "user_name", "status", "deposit",
        "created_at", "cancelled_at",
    ]);
    for b in &bookings {
        csv.row([
            b.id.to_string(),
            b.booking_date.to_string(),
            b.start_time.format("%H:%M").to_string(),
            b.end_time.format("%H:%M").to_string(),
            b.court_name.clone(),
            b.user_email.clone(),
            b.user_full_name.clone(),
            b.status.clone(),
            format_cents(b.deposit_cents),
            b.created_at.format(DATETIME_FORMAT).to_string(),
            b.cancelled_at
                .map(|t| t.format(DATETIME_FORMAT).to_string())
                .unwrap_or_default(),
        ]);
    }

    let filename = format!("bookings_{}_{}.csv", range.from, range.to);
    Ok(csv_response(&filename, csv.finish()))
}

// ---------------------------------------------------------------------------
// GET /api/admin/export/transactions
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/admin/export/transactions",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Transactions CSV", body = String, content_type = "text/csv"),
        (status = 400, description = "Invalid range", body = AppError)
    ),
    tag = "export"
)]
pub async fn export_transactions(
    State(state): State<AppState>,
    AdminRequired(_admin): AdminRequired,
    Query(query): Query<DateRangeQuery>,
) -> Result<Response, AppError> {
    let range = query
        .resolve(state.settings.local_today())
        .map_err(AppError::bad_request)?;
    let rows = state.store.transactions_between(range).await?;

    let mut csv = CsvWriter::new(&[
        "id", "created_at", "user_email", "kind", "amount", "description", "booking_id",
        "stripe_session_id",
    ]);
    for t in &rows {
        csv.row([
            t.id.to_string(),
            t.created_at.format(DATETIME_FORMAT).to_string(),
            t.user_email.clone(),
            t.kind.clone(),
            format_cents(t.amount_cents),
            t.description.clone(),
            t.booking_id.map(|id| id.to_string()).unwrap_or_default(),
            t.stripe_session_id.clone().unwrap_or_default(),
        ]);
    }

    let filename = format!("transactions_{}_{}.csv", range.from, range.to);
    Ok(csv_response(&filename, csv.finish()))
}

// ---------------------------------------------------------------------------
// GET /api/admin/export/users
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/admin/export/users",
    responses(
        (status = 200, description = "Users CSV", body = String, content_type = "text/csv"),
        (status = 403, description = "Admin access required", body = AppError)
    ),
    tag = "export"
)]
pub async fn export_users(
    State(state): State<AppState>,
    AdminRequired(_admin): AdminRequired,
) -> Result<Response, AppError> {
    let users = state.store.all_users().await?;

    let mut csv = CsvWriter::new(&[
        "id", "email", "full_name", "phone", "role", "balance", "created_at",
    ]);
    for u in &users {
        csv.row([
            u.id.to_string(),
            u.email.clone(),
            u.full_name.clone(),
            u.phone.clone().unwrap_or_default(),
            u.role.clone(),
            format_cents(u.balance_cents),
            u.created_at.format(DATETIME_FORMAT).to_string(),
        ]);
    }

    Ok(csv_response("users.csv", csv.finish()))
}
