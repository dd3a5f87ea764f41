//! Daily menu upload tokens
//!
//! Eatery staff unlock the upload form with the eatery's menu password and
//! receive a short-lived token scoped to that one eatery. The token replaces a
//! server-side session. It carries a fingerprint of the password hash it was
//! issued under, so clearing or changing the password revokes it.

use axum::extract::{FromRequestParts, Path};
use http::request::Parts;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared::error::{AppError, ErrorCode};

use crate::state::AppState;

pub const MENU_SCOPE: &str = "menu";

/// Menu tokens live for two hours
pub const MENU_TOKEN_TTL_SECS: i64 = 2 * 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct MenuClaims {
    /// Eatery ID
    pub sub: String,
    /// Always `menu`
    pub scope: String,
    /// [`password_fingerprint`] of the hash the token was unlocked with
    pub pwd: String,
    pub exp: usize,
    pub iat: usize,
}

/// Short SHA-256 digest of a stored password hash
pub fn password_fingerprint(password_hash: &str) -> String {
    let digest = Sha256::digest(password_hash.as_bytes());
    hex::encode(&digest[..8])
}

/// Create a menu token for an eatery; returns the token and its lifetime in seconds
pub fn create_menu_token(
    eatery_id: i64,
    password_hash: &str,
    secret: &str,
) -> Result<(String, i64), jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = MenuClaims {
        sub: eatery_id.to_string(),
        scope: MENU_SCOPE.to_string(),
        pwd: password_fingerprint(password_hash),
        exp: (now + chrono::Duration::seconds(MENU_TOKEN_TTL_SECS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok((token, MENU_TOKEN_TTL_SECS))
}

/// What a valid menu token grants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuGrant {
    pub eatery_id: i64,
    pub fingerprint: String,
}

/// Decode a menu token and return the eatery it grants access to
pub fn verify_menu_token(token: &str, secret: &str) -> Result<MenuGrant, AppError> {
    let invalid = || AppError::new(ErrorCode::MenuTokenInvalid);
    let data = jsonwebtoken::decode::<MenuClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("Menu token validation failed: {e}");
        invalid()
    })?;

    if data.claims.scope != MENU_SCOPE {
        return Err(invalid());
    }
    let eatery_id = data.claims.sub.parse().map_err(|_| invalid())?;
    Ok(MenuGrant {
        eatery_id,
        fingerprint: data.claims.pwd,
    })
}

/// Extractor guarding `/api/eateries/{id}/menu` uploads.
///
/// Requires a menu token issued for the eatery named in the path. The
/// handler must still call [`MenuAccess::ensure_current`] against the stored
/// password hash.
#[derive(Debug, Clone)]
pub struct MenuAccess {
    pub eatery_id: i64,
    fingerprint: String,
}

impl MenuAccess {
    /// Reject the token when the menu password was cleared or changed since
    /// it was issued
    pub fn ensure_current(&self, stored_hash: Option<&str>) -> Result<(), AppError> {
        let Some(hash) = stored_hash else {
            return Err(AppError::new(ErrorCode::MenuPasswordNotSet));
        };
        if password_fingerprint(hash) != self.fingerprint {
            tracing::warn!(
                eatery_id = self.eatery_id,
                "Menu token issued under a previous password"
            );
            return Err(AppError::with_message(
                ErrorCode::MenuTokenInvalid,
                "Menu password changed, unlock again",
            ));
        }
        Ok(())
    }
}

impl FromRequestParts<AppState> for MenuAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(eatery_id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::invalid_request(format!("Invalid eatery id: {e}")))?;

        let token = super::bearer_token(&parts.headers).ok_or_else(|| {
            AppError::with_message(ErrorCode::MenuTokenInvalid, "Missing menu token")
        })?;

        let grant = verify_menu_token(token, &state.jwt_secret)?;
        if grant.eatery_id != eatery_id {
            tracing::warn!(
                eatery_id,
                granted = grant.eatery_id,
                "Menu token used for another eatery"
            );
            return Err(AppError::new(ErrorCode::MenuTokenInvalid));
        }

        Ok(MenuAccess {
            eatery_id,
            fingerprint: grant.fingerprint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";
    const HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA";

    fn access_for(hash: &str) -> MenuAccess {
        let (token, _) = create_menu_token(99, hash, SECRET).unwrap();
        let grant = verify_menu_token(&token, SECRET).unwrap();
        MenuAccess {
            eatery_id: grant.eatery_id,
            fingerprint: grant.fingerprint,
        }
    }

    #[test]
    fn test_menu_token_roundtrip() {
        let (token, ttl) = create_menu_token(99, HASH, SECRET).unwrap();
        assert_eq!(ttl, MENU_TOKEN_TTL_SECS);
        let grant = verify_menu_token(&token, SECRET).unwrap();
        assert_eq!(grant.eatery_id, 99);
        assert_eq!(grant.fingerprint, password_fingerprint(HASH));
        assert_eq!(grant.fingerprint.len(), 16);
    }

    #[test]
    fn test_admin_token_is_not_a_menu_token() {
        let token = crate::auth::admin_auth::create_token(99, "a@example.com", SECRET).unwrap();
        assert_eq!(
            verify_menu_token(&token, SECRET).unwrap_err().code,
            ErrorCode::MenuTokenInvalid
        );
    }

    #[test]
    fn test_garbage_token() {
        assert!(verify_menu_token("not.a.jwt", SECRET).is_err());
    }

    #[test]
    fn test_token_valid_while_password_unchanged() {
        assert!(access_for(HASH).ensure_current(Some(HASH)).is_ok());
    }

    #[test]
    fn test_cleared_password_revokes_token() {
        let err = access_for(HASH).ensure_current(None).unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuPasswordNotSet);
    }

    #[test]
    fn test_changed_password_revokes_token() {
        let err = access_for(HASH)
            .ensure_current(Some("$argon2id$v=19$m=19456,t=2,p=1$b3Rybw$b3Rybw"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MenuTokenInvalid);
    }
}
