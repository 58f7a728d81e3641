use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Feature flags controlling which optional integrations are active.
///
/// Every field defaults to `false` so that a missing or incomplete config
/// file disables all optional features.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FeatureFlags {
    #[serde(default)]
    pub stripe: bool,
    #[serde(default)]
    pub telemetry: bool,
}

/// Club-wide calendar settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClubConfig {
    /// IANA timezone used to decide what "today" and "now" mean.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Candidate 90-minute slot starts, `HH:MM`.
    #[serde(default = "default_slot_starts")]
    pub slot_starts: Vec<String>,
}

impl Default for ClubConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            slot_starts: default_slot_starts(),
        }
    }
}

impl ClubConfig {
    /// Parse `slot_starts` into sorted, de-duplicated times.
    pub fn parsed_slot_starts(&self) -> Result<Vec<NaiveTime>, String> {
        let mut starts = self
            .slot_starts
            .iter()
            .map(|s| {
                NaiveTime::parse_from_str(s.trim(), "%H:%M")
                    .map_err(|e| format!("invalid slot start '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        starts.sort();
        starts.dedup();
        Ok(starts)
    }
}

fn default_timezone() -> String {
    "Europe/Madrid".to_string()
}

fn default_slot_starts() -> Vec<String> {
    [
        "09:00", "10:30", "12:00", "13:30", "15:00", "16:30", "18:00", "19:30", "21:00",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Booking rules applied before a booking procedure is called.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BookingPolicy {
    pub deposit_cents: i64,
    pub max_days_ahead: i64,
    pub max_active_bookings: usize,
    pub cancellation_notice_hours: i32,
    pub noshow_penalty_cents: i64,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            deposit_cents: 500,
            max_days_ahead: 14,
            max_active_bookings: 3,
            cancellation_notice_hours: 24,
            noshow_penalty_cents: 0,
        }
    }
}

/// Limits on wallet top-ups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WalletPolicy {
    pub min_recharge_cents: i64,
    pub max_recharge_cents: i64,
}

impl Default for WalletPolicy {
    fn default() -> Self {
        Self {
            min_recharge_cents: 1_000,
            max_recharge_cents: 50_000,
        }
    }
}

/// A fixed-window limit: `max_requests` per `window_secs`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RateRule {
    pub max_requests: u32,
    pub window_secs: u64,
}

impl RateRule {
    pub const fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
        }
    }
}

/// Per-category rate limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RateLimitConfig {
    pub login: RateRule,
    pub booking: RateRule,
    pub checkout: RateRule,
    pub webhook: RateRule,
    pub admin: RateRule,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            login: RateRule::new(10, 300),
            booking: RateRule::new(30, 60),
            checkout: RateRule::new(10, 60),
            webhook: RateRule::new(120, 60),
            admin: RateRule::new(240, 60),
        }
    }
}

/// Top-level config file structure matching `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub club: ClubConfig,
    #[serde(default)]
    pub booking: BookingPolicy,
    #[serde(default)]
    pub wallet: WalletPolicy,
    #[serde(default)]
    pub rate_limits: RateLimitConfig,
}
