use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use super::cookies;
use super::jwt::validate_session_token;
use crate::config::Settings;

/// Permissive session middleware.
///
/// A valid session token (cookie or Bearer) puts its `Claims` into the
/// request extensions. Missing or invalid tokens are ignored here; the
/// extractors decide whether a route needs a session.
pub async fn auth_middleware(
    State(settings): State<Arc<Settings>>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(token) = cookies::extract_session_token(req.headers()) {
        match validate_session_token(&settings.session, &token) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid session token");
            }
        }
    }

    next.run(req).await
}
