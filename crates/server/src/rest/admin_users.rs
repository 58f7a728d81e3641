use axum::{
    extract::{Path, Query, State},
    Json,
};
use shared_types::{
    normalize_pagination, AdminRechargeRequest, AdminRechargeResponse, AppError,
    PaginatedResponse, ProfileResponse, RechargeOutcome, UpdateRoleRequest, UserRole,
    UserSearchParams, UserSummary, WalletRecharge,
};
use uuid::Uuid;

use crate::auth::extractors::AdminRequired;
use crate::db::AppState;

/// Manual adjustments may be this many times the largest Stripe top-up.
const ADJUSTMENT_FACTOR: i64 = 10;

// ---------------------------------------------------------------------------
// GET /api/admin/users
// ---------------------------------------------------------------------------

/// Search users by name or email, with their wallet balances.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(UserSearchParams),
    responses(
        (status = 200, description = "Page of users", body = PaginatedResponse<UserSummary>),
        (status = 403, description = "Admin access required", body = AppError)
    ),
    tag = "admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    AdminRequired(_admin): AdminRequired,
    Query(params): Query<UserSearchParams>,
) -> Result<Json<PaginatedResponse<UserSummary>>, AppError> {
    let (page, limit) = normalize_pagination(params.page, params.limit);
    let search = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let (users, total) = state.store.list_users(search, page, limit).await?;
    Ok(Json(PaginatedResponse::new(users, page, limit, total)))
}

// ---------------------------------------------------------------------------
// PATCH /api/admin/users/{id}/role
// ---------------------------------------------------------------------------

#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}/role",
    params(("id" = Uuid, Path, description = "Profile UUID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = ProfileResponse),
        (status = 400, description = "Unknown role or self-demotion", body = AppError),
        (status = 404, description = "User not found", body = AppError)
    ),
    tag = "admin"
)]
#[tracing::instrument(skip(state, admin, body), fields(admin_id = %admin.id))]
pub async fn update_role(
    State(state): State<AppState>,
    AdminRequired(admin): AdminRequired,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateRoleRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let role = UserRole::parse(&body.role).ok_or_else(|| {
        AppError::bad_request(format!(
            "Invalid role '{}'. Valid values: customer, admin",
            body.role
        ))
    })?;

    if id == admin.id && !role.is_admin() {
        return Err(AppError::bad_request("You cannot remove your own admin role"));
    }

    let profile = state
        .store
        .update_role(id, role)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    tracing::info!(user_id = %id, role = role.as_str(), "User role changed");
    Ok(Json(profile.into()))
}

// ---------------------------------------------------------------------------
// POST /api/admin/wallet/recharge
// ---------------------------------------------------------------------------

/// Credit or debit a user's wallet by hand.
#[utoipa::path(
    post,
    path = "/api/admin/wallet/recharge",
    request_body = AdminRechargeRequest,
    responses(
        (status = 200, description = "New balance", body = AdminRechargeResponse),
        (status = 400, description = "Amount invalid or balance would go negative", body = AppError),
        (status = 404, description = "User not found", body = AppError)
    ),
    tag = "admin"
)]
#[tracing::instrument(skip(state, admin, body), fields(admin_id = %admin.id))]
pub async fn admin_recharge(
    State(state): State<AppState>,
    AdminRequired(admin): AdminRequired,
    Json(body): Json<AdminRechargeRequest>,
) -> Result<Json<AdminRechargeResponse>, AppError> {
    let bound = state
        .settings
        .app
        .wallet
        .max_recharge_cents
        .saturating_mul(ADJUSTMENT_FACTOR);
    if body.amount_cents == 0 {
        return Err(AppError::bad_request("Amount must not be zero"));
    }
    if body.amount_cents.unsigned_abs() > bound.unsigned_abs() {
        return Err(AppError::bad_request(format!(
            "Adjustments are limited to {bound} cents either way"
        )));
    }

    if state.store.find_profile(body.user_id).await?.is_none() {
        return Err(AppError::not_found("User not found"));
    }

    let description = body
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());
    let outcome = state
        .store
        .wallet_recharge(&WalletRecharge {
            user_id: body.user_id,
            amount_cents: body.amount_cents,
            source: "admin".to_string(),
            description,
            stripe_session_id: None,
            created_by: Some(admin.id),
        })
        .await?;

    match outcome {
        RechargeOutcome::Applied { balance_cents } => {
            tracing::info!(user_id = %body.user_id, amount = body.amount_cents, balance_cents, "Manual wallet adjustment");
            Ok(Json(AdminRechargeResponse {
                user_id: body.user_id,
                balance_cents,
            }))
        }
        RechargeOutcome::Duplicate => {
            // Only Stripe session ids are deduplicated.
            tracing::error!(user_id = %body.user_id, "Admin adjustment reported as duplicate");
            Err(AppError::internal("Adjustment was not applied"))
        }
    }
}
