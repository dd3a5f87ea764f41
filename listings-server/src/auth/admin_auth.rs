//! Admin JWT authentication for the management API

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::state::AppState;

pub const ADMIN_SCOPE: &str = "admin";

const JWT_EXPIRY_HOURS: i64 = 24;

/// JWT claims for admin authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Admin ID
    pub sub: String,
    /// Admin email
    pub email: String,
    /// Always `admin`
    pub scope: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated admin identity extracted from JWT
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub admin_id: i64,
    pub email: String,
}

/// Create a JWT token for an admin
pub fn create_token(
    admin_id: i64,
    email: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = AdminClaims {
        sub: admin_id.to_string(),
        email: email.to_string(),
        scope: ADMIN_SCOPE.to_string(),
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decode and check an admin token
pub fn verify_token(token: &str, secret: &str) -> Result<AdminIdentity, AppError> {
    let token_data = jsonwebtoken::decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::new(ErrorCode::TokenExpired)
            }
            _ => AppError::invalid_token("Invalid or expired token"),
        }
    })?;

    if token_data.claims.scope != ADMIN_SCOPE {
        return Err(AppError::invalid_token("Token is not an admin token"));
    }

    let admin_id = token_data
        .claims
        .sub
        .parse()
        .map_err(|_| AppError::invalid_token("Malformed token subject"))?;

    Ok(AdminIdentity {
        admin_id,
        email: token_data.claims.email,
    })
}

/// Middleware that extracts and verifies the admin JWT from the Authorization header
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = super::bearer_token(request.headers()).ok_or_else(|| {
        AppError::with_message(ErrorCode::NotAuthenticated, "Missing Authorization header")
    })?;

    let identity = verify_token(token, &state.jwt_secret)?;
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_roundtrip() {
        let token = create_token(42, "admin@example.com", SECRET).unwrap();
        let identity = verify_token(&token, SECRET).unwrap();
        assert_eq!(identity.admin_id, 42);
        assert_eq!(identity.email, "admin@example.com");
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = create_token(42, "admin@example.com", SECRET).unwrap();
        let err = verify_token(&token, "other-secret").unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn test_menu_token_is_not_an_admin_token() {
        let (token, _) = crate::auth::menu_token::create_menu_token(7, "hash", SECRET).unwrap();
        assert!(verify_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_expired_token() {
        let claims = AdminClaims {
            sub: "1".into(),
            email: "a@example.com".into(),
            scope: ADMIN_SCOPE.into(),
            exp: (chrono::Utc::now().timestamp() - 3600) as usize,
            iat: (chrono::Utc::now().timestamp() - 7200) as usize,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert_eq!(
            verify_token(&token, SECRET).unwrap_err().code,
            ErrorCode::TokenExpired
        );
    }
}
