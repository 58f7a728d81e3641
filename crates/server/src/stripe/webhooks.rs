use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use shared_types::{AppError, RechargeOutcome, WalletRecharge};
use uuid::Uuid;

use crate::db::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Maximum age of a signed webhook, in seconds.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Why a `Stripe-Signature` header was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureError {
    Malformed,
    Expired,
    Mismatch,
}

/// Compute the `v1` signature for `payload` signed at `timestamp`.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> Option<String> {
    let mac = signed_mac(secret, timestamp, payload)?;
    Some(hex::encode(mac.finalize().into_bytes()))
}

fn signed_mac(secret: &str, timestamp: i64, payload: &[u8]) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Some(mac)
}

/// Verify a `t=...,v1=...` header against the raw body.
///
/// Any one matching `v1` entry is enough, which lets Stripe roll secrets.
/// Comparison is constant-time.
pub fn verify_signature(
    secret: &str,
    header: &str,
    payload: &[u8],
    now: i64,
) -> Result<(), SignatureError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<&str> = Vec::new();
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::Malformed)?;
    if signatures.is_empty() {
        return Err(SignatureError::Malformed);
    }
    let skew = now.checked_sub(timestamp).map(i64::unsigned_abs);
    if !skew.is_some_and(|secs| secs <= SIGNATURE_TOLERANCE_SECS.unsigned_abs()) {
        return Err(SignatureError::Expired);
    }

    let mac = signed_mac(secret, timestamp, payload).ok_or(SignatureError::Mismatch)?;
    let matched = signatures.iter().any(|sig| {
        hex::decode(sig)
            .map(|raw| mac.clone().verify_slice(&raw).is_ok())
            .unwrap_or(false)
    });
    if matched {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

#[derive(Debug, Deserialize)]
struct WebhookEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    data: EventData,
}

#[derive(Debug, Deserialize)]
struct EventData {
    object: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct CompletedSession {
    id: String,
    #[serde(default)]
    payment_status: Option<String>,
    #[serde(default)]
    amount_total: Option<i64>,
    #[serde(default)]
    client_reference_id: Option<String>,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

impl CompletedSession {
    fn user_id(&self) -> Option<Uuid> {
        self.metadata
            .get("user_id")
            .or(self.client_reference_id.as_ref())
            .and_then(|raw| Uuid::parse_str(raw).ok())
    }
}

/// Axum handler for Stripe webhook events.
///
/// Bad signatures get 400 so misconfiguration is visible in the Stripe
/// dashboard. Once a signed event is accepted the handler always answers
/// 200; processing failures are logged instead of retried.
#[utoipa::path(
    post,
    path = "/api/stripe/webhook",
    params(
        ("Stripe-Signature" = String, Header, description = "Stripe webhook signature")
    ),
    request_body(content = String, description = "Raw Stripe event JSON", content_type = "application/json"),
    responses(
        (status = 200, description = "Event acknowledged"),
        (status = 400, description = "Missing or invalid signature", body = AppError),
        (status = 500, description = "Webhook secret not configured", body = AppError)
    ),
    tag = "wallet"
)]
#[tracing::instrument(skip(state, headers, body))]
pub async fn handle_stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let secret = state.settings.stripe.webhook_secret().map_err(|e| {
        tracing::error!(error = %e, "Stripe webhook secret not configured");
        AppError::internal("Webhook is not configured")
    })?;

    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::bad_request("Missing Stripe-Signature header"))?;

    let now = chrono::Utc::now().timestamp();
    if let Err(err) = verify_signature(secret, signature, &body, now) {
        tracing::warn!(?err, "Stripe webhook signature verification failed");
        return Err(AppError::bad_request("Invalid webhook signature"));
    }

    let event: WebhookEvent = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "Unparseable webhook payload");
        AppError::bad_request("Invalid webhook payload")
    })?;

    match event.event_type.as_str() {
        "checkout.session.completed" | "checkout.session.async_payment_succeeded" => {
            process_completed_session(&state, &event).await;
        }
        other => {
            tracing::debug!(event_id = %event.id, event_type = other, "Ignoring webhook event");
        }
    }

    Ok((StatusCode::OK, Json(serde_json::json!({ "received": true }))))
}

async fn process_completed_session(state: &AppState, event: &WebhookEvent) {
    let session: CompletedSession = match serde_json::from_value(event.data.object.clone()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(event_id = %event.id, error = %e, "Malformed checkout session object");
            return;
        }
    };

    if session.payment_status.as_deref() != Some("paid") {
        tracing::info!(session_id = %session.id, status = ?session.payment_status, "Checkout not paid yet");
        return;
    }

    let Some(user_id) = session.user_id() else {
        tracing::error!(session_id = %session.id, "Checkout session has no valid user_id");
        return;
    };

    let amount = match session.amount_total {
        Some(a) if a > 0 => a,
        other => {
            tracing::error!(session_id = %session.id, amount = ?other, "Checkout session has no positive amount");
            return;
        }
    };

    let recharge = WalletRecharge {
        user_id,
        amount_cents: amount,
        source: "stripe".to_string(),
        description: None,
        stripe_session_id: Some(session.id.clone()),
        created_by: None,
    };

    match state.store.wallet_recharge(&recharge).await {
        Ok(RechargeOutcome::Applied { balance_cents }) => {
            tracing::info!(%user_id, session_id = %session.id, amount, balance_cents, "Wallet recharged");
        }
        Ok(RechargeOutcome::Duplicate) => {
            tracing::info!(session_id = %session.id, "Duplicate checkout session, already credited");
        }
        Err(e) => {
            tracing::error!(%user_id, session_id = %session.id, error = %e, "Failed to apply wallet recharge");
        }
    }
}
