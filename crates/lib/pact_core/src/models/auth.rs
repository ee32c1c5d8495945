//! Authentication domain models.
//!
//! These are internal domain models, distinct from the API request/response
//! bodies in `pact_api::models` (which carry the camelCase wire names).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account lifecycle state, as stored by the user service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserStatus {
    Active,
    Pending,
    Suspended,
    Deleted,
    /// Any status string this crate does not know about.
    Other(String),
}

impl UserStatus {
    pub fn as_str(&self) -> &str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Pending => "pending",
            UserStatus::Suspended => "suspended",
            UserStatus::Deleted => "deleted",
            UserStatus::Other(s) => s.as_str(),
        }
    }

    /// Whether an account in this state may log in.
    pub fn can_login(&self) -> bool {
        !matches!(self, UserStatus::Suspended | UserStatus::Deleted)
    }
}

impl From<&str> for UserStatus {
    fn from(s: &str) -> Self {
        match s {
            "active" => UserStatus::Active,
            "pending" => UserStatus::Pending,
            "suspended" => UserStatus::Suspended,
            "deleted" => UserStatus::Deleted,
            other => UserStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Auth-relevant view of a user. Owned by the user service; read-only here.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub status: UserStatus,
}

/// Login credentials supplied by the caller.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Which half of a token pair a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "access" => Some(TokenKind::Access),
            "refresh" => Some(TokenKind::Refresh),
            _ => None,
        }
    }
}

/// An access/refresh token pair minted at login.
///
/// `access_expires_at < refresh_expires_at` and `access_id != refresh_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: String,
    pub access_id: Uuid,
    pub refresh_id: Uuid,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

impl TokenPair {
    /// Split the pair into its two independently stored halves.
    pub fn records(&self) -> [TokenRecord; 2] {
        [
            TokenRecord {
                id: self.access_id,
                user_id: self.user_id.clone(),
                token: self.access_token.clone(),
                kind: TokenKind::Access,
                expires_at: self.access_expires_at,
            },
            TokenRecord {
                id: self.refresh_id,
                user_id: self.user_id.clone(),
                token: self.refresh_token.clone(),
                kind: TokenKind::Refresh,
                expires_at: self.refresh_expires_at,
            },
        ]
    }
}

/// One persisted token half. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub id: Uuid,
    pub user_id: String,
    pub token: String,
    pub kind: TokenKind,
    pub expires_at: DateTime<Utc>,
}

impl TokenRecord {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// JWT claims embedded in both token halves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub authorized: bool,
    /// Id of the stored [`TokenRecord`] for this half.
    pub token_id: String,
    pub user_id: String,
    /// Expiry (unix timestamp, standard JWT `exp` claim).
    pub exp: i64,
}
