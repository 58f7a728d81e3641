//! Slot lookups shared by availability, customer booking and admin booking.

use chrono::{Duration, NaiveDate, NaiveTime};
use shared_types::{
    available_slots, day_slot_starts, resolve_opening_hours, AppError, Court, TimeRange,
};
use uuid::Uuid;

use crate::db::AppState;

/// Configured slot starts that fall inside the club's hours on `date`.
pub async fn day_slots(state: &AppState, date: NaiveDate) -> Result<Vec<NaiveTime>, AppError> {
    let (weekly, exception) = tokio::try_join!(
        state.store.club_schedule(),
        state.store.exception_for(date),
    )?;
    let hours = resolve_opening_hours(date, &weekly, exception.as_ref());
    Ok(day_slot_starts(&state.settings.slot_starts, hours))
}

/// An active court, or 404.
pub async fn active_court(state: &AppState, court_id: Uuid) -> Result<Court, AppError> {
    state
        .store
        .find_court(court_id)
        .await?
        .filter(|court| court.is_active)
        .ok_or_else(|| AppError::not_found("Court not found"))
}

/// Free slots on `court_id` for `date`, in club-local time.
///
/// Past dates have none; for today only slots starting after now count.
pub async fn free_slots(
    state: &AppState,
    court_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<TimeRange>, AppError> {
    let now = state.settings.local_now();
    if date < now.date() {
        return Ok(Vec::new());
    }

    let (starts, occupied) = tokio::try_join!(
        day_slots(state, date),
        state.store.occupied_ranges(court_id, date),
    )?;
    let cutoff = (date == now.date()).then(|| now.time());
    Ok(available_slots(&starts, &occupied, cutoff))
}

/// Reject dates in the past or beyond the booking horizon.
pub fn check_booking_window(
    date: NaiveDate,
    today: NaiveDate,
    max_days_ahead: i64,
) -> Result<(), AppError> {
    if date < today {
        return Err(AppError::bad_request("Cannot book a date in the past"));
    }
    if date > today + Duration::days(max_days_ahead) {
        return Err(AppError::bad_request(format!(
            "Bookings can be made at most {max_days_ahead} days in advance"
        )));
    }
    Ok(())
}

/// Validate that `start` is a real slot on an active court and still free.
/// Returns the full slot range.
pub async fn bookable_slot(
    state: &AppState,
    court_id: Uuid,
    date: NaiveDate,
    start: NaiveTime,
) -> Result<TimeRange, AppError> {
    active_court(state, court_id).await?;

    let starts = day_slots(state, date).await?;
    if !starts.contains(&start) {
        return Err(AppError::bad_request("Invalid time slot"));
    }

    free_slots(state, court_id, date)
        .await?
        .into_iter()
        .find(|slot| slot.start_time == start)
        .ok_or_else(|| AppError::bad_request("Slot is no longer available"))
}
