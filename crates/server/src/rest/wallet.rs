use axum::{extract::State, Json};
use shared_types::{
    AppError, CheckoutRequest, CheckoutResponse, WalletResponse, WALLET_HISTORY_LIMIT,
};

use crate::auth::extractors::AuthRequired;
use crate::db::AppState;
use crate::stripe::checkout::create_wallet_checkout;

// ---------------------------------------------------------------------------
// GET /api/wallet
// ---------------------------------------------------------------------------

/// Balance and the most recent ledger entries.
#[utoipa::path(
    get,
    path = "/api/wallet",
    responses(
        (status = 200, description = "Wallet balance and history", body = WalletResponse),
        (status = 401, description = "Not signed in", body = AppError)
    ),
    tag = "wallet"
)]
pub async fn get_wallet(
    State(state): State<AppState>,
    AuthRequired(claims): AuthRequired,
) -> Result<Json<WalletResponse>, AppError> {
    let (balance_cents, transactions) = tokio::try_join!(
        state.store.balance(claims.sub),
        state.store.transactions(claims.sub, WALLET_HISTORY_LIMIT),
    )?;

    Ok(Json(WalletResponse {
        balance_cents,
        transactions,
    }))
}

// ---------------------------------------------------------------------------
// POST /api/stripe/checkout
// ---------------------------------------------------------------------------

/// Start a hosted Checkout page that tops up the caller's wallet.
#[utoipa::path(
    post,
    path = "/api/stripe/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Checkout session created", body = CheckoutResponse),
        (status = 400, description = "Amount out of range", body = AppError),
        (status = 401, description = "Not signed in", body = AppError),
        (status = 500, description = "Payments unavailable", body = AppError)
    ),
    tag = "wallet"
)]
#[tracing::instrument(skip(state, claims), fields(user_id = %claims.sub))]
pub async fn create_checkout(
    State(state): State<AppState>,
    AuthRequired(claims): AuthRequired,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, AppError> {
    if !state.settings.app.features.stripe {
        tracing::warn!("Checkout requested while Stripe is disabled");
        return Err(AppError::internal("Payments are not available"));
    }

    let policy = &state.settings.app.wallet;
    if body.amount_cents < policy.min_recharge_cents || body.amount_cents > policy.max_recharge_cents
    {
        return Err(AppError::bad_request(format!(
            "Recharge amount must be between {} and {} cents",
            policy.min_recharge_cents, policy.max_recharge_cents
        )));
    }

    let url = create_wallet_checkout(
        &state.settings.stripe,
        claims.sub,
        &claims.email,
        body.amount_cents,
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Stripe checkout failed");
        AppError::internal("Payments are not available")
    })?;

    Ok(Json(CheckoutResponse { url }))
}
