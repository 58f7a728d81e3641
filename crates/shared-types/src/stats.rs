use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default reporting window when the caller gives no range.
pub const DEFAULT_RANGE_DAYS: i64 = 30;

/// Longest range the reporting endpoints accept.
pub const MAX_RANGE_DAYS: i64 = 366;

/// `?from&to` for stats and exports. Both bounds are inclusive.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct DateRangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// A validated inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRangeQuery {
    /// Fill in the defaults (the last 30 days ending `today`) and reject
    /// reversed or oversized ranges.
    pub fn resolve(&self, today: NaiveDate) -> Result<DateRange, String> {
        let to = self.to.unwrap_or(today);
        let from = match self.from {
            Some(from) => from,
            None => to
                .checked_sub_signed(Duration::days(DEFAULT_RANGE_DAYS - 1))
                .ok_or_else(|| "Invalid date range".to_string())?,
        };
        if from > to {
            return Err("'from' must not be after 'to'".to_string());
        }
        if (to - from).num_days() + 1 > MAX_RANGE_DAYS {
            return Err(format!("Date range cannot exceed {MAX_RANGE_DAYS} days"));
        }
        Ok(DateRange { from, to })
    }
}

/// Row of `get_booking_stats(from, to)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct BookingStats {
    pub total_bookings: i64,
    pub confirmed: i64,
    pub completed: i64,
    pub cancelled: i64,
    pub no_show: i64,
    /// Deposits charged, before refunds.
    pub deposits_cents: i64,
    pub refunds_cents: i64,
    pub penalties_cents: i64,
    pub recharges_cents: i64,
}

/// Row of `get_daily_stats(from, to)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct DailyStats {
    pub day: NaiveDate,
    pub bookings: i64,
    pub cancellations: i64,
    pub revenue_cents: i64,
    pub recharges_cents: i64,
}

/// Row of `get_court_occupancy(from, to, slots_per_day)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct CourtOccupancy {
    pub court_id: Uuid,
    pub court_name: String,
    pub booked_slots: i64,
    pub total_slots: i64,
    /// `booked_slots / total_slots`, 0 when nothing was bookable.
    pub occupancy: f64,
}

/// Envelope echoing the resolved range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StatsResponse<T> {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub data: T,
}
