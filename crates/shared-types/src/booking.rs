use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::availability::TimeRange;
use crate::common::hhmm;

/// Lifecycle states of a booking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}

impl BookingStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            "completed" => Some(BookingStatus::Completed),
            "no_show" | "noshow" => Some(BookingStatus::NoShow),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
            BookingStatus::NoShow => "no_show",
        }
    }

    /// Statuses that hold the court and therefore block the slot.
    pub fn occupies_court(&self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::Completed)
    }
}

/// Booking row from the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub court_id: Uuid,
    pub booking_date: NaiveDate,
    #[serde(with = "hhmm")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "18:00"))]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "19:30"))]
    pub end_time: NaiveTime,
    pub status: String,
    pub deposit_cents: i64,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Booking {
    pub fn status(&self) -> Option<BookingStatus> {
        BookingStatus::parse(&self.status)
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time)
    }
}

/// Booking joined with its court and owner, as listed to users and admins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct BookingView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub user_full_name: String,
    pub court_id: Uuid,
    pub court_name: String,
    pub booking_date: NaiveDate,
    #[serde(with = "hhmm")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "18:00"))]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "19:30"))]
    pub end_time: NaiveTime,
    pub status: String,
    pub deposit_cents: i64,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

/// Arguments for `booking_pay_deposit`. Built by the handlers after
/// validation; a zero deposit books without touching the wallet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub court_id: Uuid,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub deposit_cents: i64,
}

/// Query for `GET /api/bookings/availability`.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct AvailabilityQuery {
    pub court_id: Uuid,
    pub date: NaiveDate,
}

/// Free slots for one court and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AvailabilityResponse {
    pub court_id: Uuid,
    pub date: NaiveDate,
    pub slots: Vec<TimeRange>,
}

/// Customer booking request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateBookingRequest {
    pub court_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "18:00"))]
    pub start_time: NaiveTime,
}

/// Customer cancellation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CancelBookingRequest {
    pub booking_id: Uuid,
}

/// Result of any cancellation: how much went back to the wallet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct CancelBookingResponse {
    pub booking_id: Uuid,
    pub refunded_cents: i64,
}

/// Admin booking on behalf of a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AdminCreateBookingRequest {
    pub user_id: Uuid,
    pub court_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "18:00"))]
    pub start_time: NaiveTime,
    #[serde(default = "default_true")]
    pub charge_deposit: bool,
}

/// Admin cancellation, optionally refunding the deposit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AdminCancelBookingRequest {
    pub booking_id: Uuid,
    #[serde(default = "default_true")]
    pub refund_deposit: bool,
}

/// Body for the single-booking admin actions (no-show, complete).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingActionRequest {
    pub booking_id: Uuid,
}

/// Query for `GET /api/admin/bookings`.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct AdminBookingQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub court_id: Option<Uuid>,
    pub status: Option<String>,
}

/// Resolved listing filter handed to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingFilter {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub court_id: Option<Uuid>,
    pub status: Option<BookingStatus>,
}

impl BookingFilter {
    pub fn matches(&self, booking: &Booking) -> bool {
        booking.booking_date >= self.from
            && booking.booking_date <= self.to
            && self.court_id.map_or(true, |c| c == booking.court_id)
            && self.status.map_or(true, |s| booking.status() == Some(s))
    }
}

fn default_true() -> bool {
    true
}
