use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SessionConfig;

/// Claims stored in the session token.
///
/// `role` is informational only. Admin checks re-read `profiles.role`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    /// Unique per token so two sessions issued in the same second differ.
    pub jti: String,
}

/// Issue an HS256 session token. Returns the token and its expiry.
pub fn create_session_token(
    config: &SessionConfig,
    profile_id: Uuid,
    email: &str,
    role: &str,
) -> Result<(String, DateTime<Utc>), jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.ttl_hours);
    let claims = Claims {
        sub: profile_id,
        email: email.to_string(),
        role: role.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;
    Ok((token, expires_at))
}

/// Validate signature and expiry.
pub fn validate_session_token(
    config: &SessionConfig,
    token: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
