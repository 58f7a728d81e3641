use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::availability::TimeRange;
use crate::common::hhmm;

/// Valid values for `courts.surface`.
pub const COURT_SURFACES: &[&str] = &["indoor", "outdoor"];

/// Court row from the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Court {
    pub id: Uuid,
    pub name: String,
    pub surface: String,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Create or replace a court. `PUT` uses the same body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct CourtRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 60, message = "Court name is required"))
    )]
    pub name: String,
    #[serde(default = "default_surface")]
    pub surface: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl CourtRequest {
    /// Trimmed copy with the surface checked against [`COURT_SURFACES`].
    pub fn normalized(&self) -> Result<Self, String> {
        let surface = self.surface.trim().to_lowercase();
        if !COURT_SURFACES.contains(&surface.as_str()) {
            return Err(format!(
                "Invalid surface '{}'. Valid values: {}",
                self.surface,
                COURT_SURFACES.join(", ")
            ));
        }
        Ok(Self {
            name: self.name.trim().to_string(),
            surface,
            is_active: self.is_active,
            sort_order: self.sort_order,
        })
    }
}

fn default_surface() -> String {
    "indoor".to_string()
}

fn default_active() -> bool {
    true
}

/// Admin-blocked range on one court and date (`court_schedules`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct CourtBlock {
    pub id: Uuid,
    pub court_id: Uuid,
    pub block_date: NaiveDate,
    #[serde(with = "hhmm")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "09:00"))]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "12:00"))]
    pub end_time: NaiveTime,
    pub reason: Option<String>,
}

impl CourtBlock {
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateBlockRequest {
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "09:00"))]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "12:00"))]
    pub end_time: NaiveTime,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Query for `GET /api/admin/courts/{id}/blocks`.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct BlockQuery {
    pub date: Option<NaiveDate>,
}
