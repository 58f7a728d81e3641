use axum::{extract::FromRequestParts, http::request::Parts};
use shared_types::{AppError, Profile};

use super::jwt::Claims;
use crate::db::AppState;

/// Extractor that requires authentication. Returns 401 if no valid token.
pub struct AuthRequired(pub Claims);

impl<S: Send + Sync> FromRequestParts<S> for AuthRequired {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthRequired)
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

/// Extractor for back-office routes. Returns 401 without a session and 403
/// unless the caller's *stored* profile role is `admin`.
///
/// The token's `role` claim is never trusted, so a demotion applies to
/// sessions that are already open.
pub struct AdminRequired(pub Profile);

impl FromRequestParts<AppState> for AdminRequired {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthRequired(claims) = AuthRequired::from_request_parts(parts, state).await?;

        let profile = state
            .store
            .find_profile(claims.sub)
            .await?
            .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

        if !profile.role().is_admin() {
            tracing::warn!(user_id = %profile.id, "Non-admin attempted a back-office route");
            return Err(AppError::forbidden("Admin access required"));
        }

        Ok(AdminRequired(profile))
    }
}
