pub mod session;

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::AppError;

pub use session::{SessionContext, SessionState, SessionSubscription};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub iss: String,
    pub exp: u64,
    pub iat: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

/// Validate an HS256 token against the configured secret and issuer.
pub fn decode_jwt(token: &str, secret: &str, issuer: &str) -> Result<JwtClaims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[issuer]);
    validation.set_required_spec_claims(&["exp", "sub", "iss"]);
    validation.validate_aud = false;

    let token_data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| AppError::unauthorized(format!("Invalid token: {e}")))?;

    let claims = token_data.claims;

    if claims.sub.is_empty() {
        return Err(AppError::unauthorized("Invalid token: missing sub"));
    }

    Ok(claims)
}

impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Invalid authorization header format. Expected: Bearer <token>",
                )
            })?;

        let claims = decode_jwt(
            token,
            &state.settings.jwt_secret_key,
            &state.settings.jwt_issuer,
        )?;

        Ok(Self { user_id: claims.sub })
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header, encode};

    use super::*;

    fn token(sub: &str, iss: &str, secret: &str, exp_offset: i64) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = JwtClaims {
            sub: sub.into(),
            iss: iss.into(),
            exp: (now + exp_offset) as u64,
            iat: Some(now as u64),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn accepts_valid_token() {
        let claims = decode_jwt(&token("user-1", "vetta_auth", "s3cret", 3600), "s3cret", "vetta_auth")
            .unwrap();
        assert_eq!(claims.sub, "user-1");
    }

    #[test]
    fn rejects_wrong_secret_issuer_or_expiry() {
        for bad in [
            token("user-1", "vetta_auth", "other", 3600),
            token("user-1", "someone_else", "s3cret", 3600),
            token("user-1", "vetta_auth", "s3cret", -3600),
        ] {
            let err = decode_jwt(&bad, "s3cret", "vetta_auth").unwrap_err();
            assert!(matches!(err, AppError::Unauthorized(_)));
        }
    }

    #[test]
    fn rejects_empty_subject() {
        let err = decode_jwt(&token("", "vetta_auth", "s3cret", 3600), "s3cret", "vetta_auth")
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid token: missing sub");
    }
}
