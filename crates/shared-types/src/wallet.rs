use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ledger entry kinds. Amounts are signed: deposits and penalties are
/// negative, recharges and refunds positive, adjustments either.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Recharge,
    Deposit,
    Refund,
    Penalty,
    Adjustment,
}

impl TransactionKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "recharge" => Some(TransactionKind::Recharge),
            "deposit" => Some(TransactionKind::Deposit),
            "refund" => Some(TransactionKind::Refund),
            "penalty" => Some(TransactionKind::Penalty),
            "adjustment" => Some(TransactionKind::Adjustment),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Recharge => "recharge",
            TransactionKind::Deposit => "deposit",
            TransactionKind::Refund => "refund",
            TransactionKind::Penalty => "penalty",
            TransactionKind::Adjustment => "adjustment",
        }
    }
}

/// Transaction row from the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount_cents: i64,
    pub kind: String,
    pub description: String,
    pub booking_id: Option<Uuid>,
    pub stripe_session_id: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Transaction joined with the owner's email, for the finance export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct TransactionExportRow {
    pub id: Uuid,
    pub user_email: String,
    pub amount_cents: i64,
    pub kind: String,
    pub description: String,
    pub booking_id: Option<Uuid>,
    pub stripe_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// `GET /api/wallet` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WalletResponse {
    pub balance_cents: i64,
    pub transactions: Vec<Transaction>,
}

/// Number of ledger rows returned with the wallet.
pub const WALLET_HISTORY_LIMIT: i64 = 50;

/// Start a Stripe Checkout top-up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CheckoutRequest {
    pub amount_cents: i64,
}

/// Hosted checkout page to redirect the browser to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CheckoutResponse {
    pub url: String,
}

/// Manual admin credit or debit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AdminRechargeRequest {
    pub user_id: Uuid,
    pub amount_cents: i64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AdminRechargeResponse {
    pub user_id: Uuid,
    pub balance_cents: i64,
}

/// Arguments for `wallet_recharge`.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletRecharge {
    pub user_id: Uuid,
    pub amount_cents: i64,
    /// `stripe` for gateway top-ups, `admin` for manual adjustments.
    pub source: String,
    pub description: Option<String>,
    pub stripe_session_id: Option<String>,
    pub created_by: Option<Uuid>,
}

/// What `wallet_recharge` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RechargeOutcome {
    Applied { balance_cents: i64 },
    /// The Stripe session was already credited; nothing changed.
    Duplicate,
}

/// Render cents as `12.50`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}
