use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use shared_types::{
    normalize_email, AppError, AuthResponse, LoginRequest, MeResponse, MessageResponse, Profile,
    RegisterRequest, UserRole,
};

use crate::auth::{cookies, extractors::AuthRequired, jwt, password};
use crate::db::AppState;
use crate::error_convert::ValidateRequest;
use crate::store::NewProfile;

/// Issue a session for `profile`: Set-Cookie headers plus the response body.
fn start_session(state: &AppState, profile: Profile) -> Result<(HeaderMap, AuthResponse), AppError> {
    let session = &state.settings.session;
    let (token, _expires_at) =
        jwt::create_session_token(session, profile.id, &profile.email, &profile.role).map_err(
            |e| {
                tracing::error!(error = %e, "Failed to sign session token");
                AppError::internal("Could not start session")
            },
        )?;

    let mut headers = HeaderMap::new();
    cookies::set_session_cookie(&mut headers, session, &token);

    Ok((
        headers,
        AuthResponse {
            profile: profile.into(),
            token,
        },
    ))
}

// ---------------------------------------------------------------------------
// POST /api/auth/register
// ---------------------------------------------------------------------------

/// Create a customer account and sign it in.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation failed", body = AppError),
        (status = 409, description = "Email already registered", body = AppError)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, HeaderMap, Json<AuthResponse>), AppError> {
    payload.validate_request()?;

    let email = normalize_email(&payload.email);
    if state.store.find_profile_by_email(&email).await?.is_some() {
        return Err(AppError::conflict("An account with this email already exists"));
    }

    let full_name = payload.full_name.trim().to_string();
    if full_name.is_empty() {
        return Err(AppError::bad_request("Full name is required"));
    }

    let profile = state
        .store
        .create_profile(&NewProfile {
            email,
            full_name,
            phone: payload
                .phone
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            password_hash: password::hash_password(&payload.password)?,
            role: UserRole::Customer,
        })
        .await?;

    tracing::info!(user_id = %profile.id, "Registered new customer");
    let (headers, body) = start_session(&state, profile)?;
    Ok((StatusCode::CREATED, headers, Json(body)))
}

// ---------------------------------------------------------------------------
// POST /api/auth/login
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = AppError),
        (status = 429, description = "Too many attempts", body = AppError)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), AppError> {
    payload.validate_request()?;

    let email = normalize_email(&payload.email);
    let profile = state
        .store
        .find_profile_by_email(&email)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

    if !password::verify_password(&payload.password, &profile.password_hash) {
        return Err(AppError::unauthorized("Invalid email or password"));
    }

    let (headers, body) = start_session(&state, profile)?;
    Ok((headers, Json(body)))
}

// ---------------------------------------------------------------------------
// POST /api/auth/logout
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn logout(State(state): State<AppState>) -> (HeaderMap, Json<MessageResponse>) {
    let mut headers = HeaderMap::new();
    cookies::clear_session_cookie(&mut headers, &state.settings.session);
    (headers, Json(MessageResponse::new("Logged out")))
}

// ---------------------------------------------------------------------------
// GET /api/auth/me
// ---------------------------------------------------------------------------

/// Current profile and wallet balance.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Not signed in", body = AppError)
    ),
    tag = "auth"
)]
pub async fn me(
    State(state): State<AppState>,
    AuthRequired(claims): AuthRequired,
) -> Result<Json<MeResponse>, AppError> {
    let (profile, balance_cents) = tokio::try_join!(
        state.store.find_profile(claims.sub),
        state.store.balance(claims.sub),
    )?;
    let profile = profile.ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    Ok(Json(MeResponse {
        profile: profile.into(),
        balance_cents,
    }))
}
