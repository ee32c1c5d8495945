//! JWT token pair issuance and verification.
//!
//! Access and refresh halves are signed with distinct HS256 secrets so a
//! refresh token can never pass as an access token.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;

use super::AuthError;
use crate::models::auth::{TokenClaims, TokenPair};
use crate::uuid::uuidv7;

/// Access token lifetime: 20 minutes.
pub const ACCESS_TOKEN_EXPIRY_SECS: i64 = 20 * 60;

/// Refresh token lifetime: 7 days.
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// The pair of HS256 secrets used to sign each token class.
#[derive(Clone)]
pub struct SigningKeys {
    access: Vec<u8>,
    refresh: Vec<u8>,
}

impl SigningKeys {
    pub fn new(access_secret: &[u8], refresh_secret: &[u8]) -> Self {
        Self {
            access: access_secret.to_vec(),
            refresh: refresh_secret.to_vec(),
        }
    }

    pub fn access_secret(&self) -> &[u8] {
        &self.access
    }

    pub fn refresh_secret(&self) -> &[u8] {
        &self.refresh
    }
}

impl std::fmt::Debug for SigningKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKeys(<redacted>)")
    }
}

/// Mint an access/refresh pair for `user_id`, with expiries counted from `now`.
///
/// Each half gets its own UUIDv7 token id, embedded in its claims.
pub fn issue_token_pair(
    user_id: &str,
    keys: &SigningKeys,
    now: DateTime<Utc>,
) -> Result<TokenPair, AuthError> {
    let access_id = uuidv7();
    let refresh_id = uuidv7();
    let access_expires_at = now + Duration::seconds(ACCESS_TOKEN_EXPIRY_SECS);
    let refresh_expires_at = now + Duration::days(REFRESH_TOKEN_EXPIRY_DAYS);

    let access_token = sign(
        &TokenClaims {
            authorized: true,
            token_id: access_id.to_string(),
            user_id: user_id.to_string(),
            exp: access_expires_at.timestamp(),
        },
        &keys.access,
    )?;
    let refresh_token = sign(
        &TokenClaims {
            authorized: true,
            token_id: refresh_id.to_string(),
            user_id: user_id.to_string(),
            exp: refresh_expires_at.timestamp(),
        },
        &keys.refresh,
    )?;

    debug!(user_id, %access_id, %refresh_id, "issued token pair");

    Ok(TokenPair {
        user_id: user_id.to_string(),
        access_token,
        refresh_token,
        access_id,
        refresh_id,
        access_expires_at,
        refresh_expires_at,
    })
}

fn sign(claims: &TokenClaims, secret: &[u8]) -> Result<String, AuthError> {
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret))
        .map_err(|e| AuthError::TokenError(format!("jwt encode: {e}")))
}

/// Verify an access token, returning the claims on success.
pub fn verify_access_token(token: &str, keys: &SigningKeys) -> Option<TokenClaims> {
    verify(token, &keys.access)
}

/// Verify a refresh token, returning the claims on success.
///
/// No route exchanges refresh tokens yet; this is the check that exchange
/// will use.
pub fn verify_refresh_token(token: &str, keys: &SigningKeys) -> Option<TokenClaims> {
    verify(token, &keys.refresh)
}

fn verify(token: &str, secret: &[u8]) -> Option<TokenClaims> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.leeway = 0;
    decode::<TokenClaims>(token, &key, &validation)
        .ok()
        .map(|data| data.claims)
        .filter(|claims| claims.authorized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> SigningKeys {
        SigningKeys::new(b"access-secret", b"refresh-secret")
    }

    #[test]
    fn pair_has_ordered_expiries_and_distinct_ids() {
        let now = Utc::now();
        let pair = issue_token_pair("user-1", &keys(), now).unwrap();
        assert!(pair.access_expires_at < pair.refresh_expires_at);
        assert_eq!(pair.access_expires_at - now, Duration::minutes(20));
        assert_eq!(pair.refresh_expires_at - now, Duration::days(7));
        assert_ne!(pair.access_id, pair.refresh_id);
        assert_ne!(pair.access_id.to_string(), pair.user_id);
        assert_ne!(pair.access_token, pair.refresh_token);
    }

    #[test]
    fn claims_carry_token_id_and_user() {
        let pair = issue_token_pair("user-1", &keys(), Utc::now()).unwrap();
        let access = verify_access_token(&pair.access_token, &keys()).unwrap();
        assert!(access.authorized);
        assert_eq!(access.user_id, "user-1");
        assert_eq!(access.token_id, pair.access_id.to_string());
        assert_eq!(access.exp, pair.access_expires_at.timestamp());

        let refresh = verify_refresh_token(&pair.refresh_token, &keys()).unwrap();
        assert_eq!(refresh.token_id, pair.refresh_id.to_string());
    }

    #[test]
    fn halves_are_not_interchangeable() {
        let pair = issue_token_pair("user-1", &keys(), Utc::now()).unwrap();
        assert!(verify_access_token(&pair.refresh_token, &keys()).is_none());
        assert!(verify_refresh_token(&pair.access_token, &keys()).is_none());
    }

    #[test]
    fn expired_access_token_is_rejected() {
        let issued = Utc::now() - Duration::hours(1);
        let pair = issue_token_pair("user-1", &keys(), issued).unwrap();
        assert!(verify_access_token(&pair.access_token, &keys()).is_none());
        // The refresh half is still inside its 7 day window.
        assert!(verify_refresh_token(&pair.refresh_token, &keys()).is_some());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let pair = issue_token_pair("user-1", &keys(), Utc::now()).unwrap();
        let other = SigningKeys::new(b"other", b"refresh-secret");
        assert!(verify_access_token(&pair.access_token, &other).is_none());
    }

    #[test]
    fn unauthorized_claims_are_rejected() {
        let claims = TokenClaims {
            authorized: false,
            token_id: "t".into(),
            user_id: "u".into(),
            exp: (Utc::now() + Duration::minutes(5)).timestamp(),
        };
        let token = sign(&claims, b"access-secret").unwrap();
        assert!(verify_access_token(&token, &keys()).is_none());
    }
}
