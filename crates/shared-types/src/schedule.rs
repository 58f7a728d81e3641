use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::availability::OpeningHours;
use crate::common::hhmm;

/// Weekly opening hours for one weekday (0 = Monday ... 6 = Sunday).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct ClubDay {
    pub weekday: i16,
    pub is_open: bool,
    #[serde(with = "hhmm")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "08:00"))]
    pub opens_at: NaiveTime,
    #[serde(with = "hhmm")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "23:00"))]
    pub closes_at: NaiveTime,
}

impl ClubDay {
    pub fn validate(&self) -> Result<(), String> {
        if !(0..=6).contains(&self.weekday) {
            return Err("weekday must be between 0 (Monday) and 6 (Sunday)".to_string());
        }
        if self.is_open && self.opens_at >= self.closes_at {
            return Err("opens_at must be before closes_at".to_string());
        }
        Ok(())
    }
}

/// A date whose hours differ from the weekly schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct ScheduleException {
    pub id: Uuid,
    pub exception_date: NaiveDate,
    pub is_closed: bool,
    #[serde(default, with = "hhmm::option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "10:00"))]
    pub opens_at: Option<NaiveTime>,
    #[serde(default, with = "hhmm::option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "14:00"))]
    pub closes_at: Option<NaiveTime>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateExceptionRequest {
    pub date: NaiveDate,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default, with = "hhmm::option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "10:00"))]
    pub opens_at: Option<NaiveTime>,
    #[serde(default, with = "hhmm::option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, example = "14:00"))]
    pub closes_at: Option<NaiveTime>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl CreateExceptionRequest {
    /// An open exception must carry both hours, in order.
    pub fn validate(&self) -> Result<(), String> {
        if self.is_closed {
            return Ok(());
        }
        match (self.opens_at, self.closes_at) {
            (Some(open), Some(close)) if open < close => Ok(()),
            (Some(_), Some(_)) => Err("opens_at must be before closes_at".to_string()),
            _ => Err("opens_at and closes_at are required unless the day is closed".to_string()),
        }
    }
}

/// Public view of the club calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ClubScheduleResponse {
    pub timezone: String,
    pub weekly: Vec<ClubDay>,
    pub exceptions: Vec<ScheduleException>,
}

/// 0 = Monday, matching `club_schedule.weekday`.
pub fn weekday_index(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_monday() as i16
}

/// Opening hours in force on `date`, or `None` when the club is closed.
///
/// An exception for the date wins over the weekly row. An open exception
/// without hours falls back to the weekly row.
pub fn resolve_opening_hours(
    date: NaiveDate,
    weekly: &[ClubDay],
    exception: Option<&ScheduleException>,
) -> Option<OpeningHours> {
    if let Some(ex) = exception.filter(|ex| ex.exception_date == date) {
        if ex.is_closed {
            return None;
        }
        if let (Some(opens_at), Some(closes_at)) = (ex.opens_at, ex.closes_at) {
            return Some(OpeningHours {
                opens_at,
                closes_at,
            });
        }
    }

    let weekday = weekday_index(date);
    weekly
        .iter()
        .find(|day| day.weekday == weekday && day.is_open)
        .map(|day| OpeningHours {
            opens_at: day.opens_at,
            closes_at: day.closes_at,
        })
}
