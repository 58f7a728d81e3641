use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Club member. Members are not necessarily app users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Member {
    pub id: Uuid,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub member_number: String,
    pub is_active: bool,
    pub joined_on: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create or replace a member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct MemberRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 120, message = "Full name is required"))
    )]
    pub full_name: String,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(email(message = "Valid email is required"))
    )]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 32, message = "Member number is required"))
    )]
    pub member_number: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub joined_on: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl MemberRequest {
    /// Trim text fields and drop empty optionals.
    pub fn normalized(mut self) -> Self {
        self.full_name = self.full_name.trim().to_string();
        self.member_number = self.member_number.trim().to_string();
        self.email = non_empty(self.email).map(|e| e.to_lowercase());
        self.phone = non_empty(self.phone);
        self.notes = non_empty(self.notes);
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn default_active() -> bool {
    true
}

/// Query for `GET /api/admin/members`.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct MemberSearchParams {
    pub search: Option<String>,
}
