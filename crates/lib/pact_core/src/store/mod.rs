//! Storage contracts for users and issued tokens.
//!
//! The API layer only sees the [`UserDirectory`] and [`TokenStore`] traits.
//! PostgreSQL implementations back the server; in-memory ones back tests and
//! local development.

pub mod memory;
pub mod postgres;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::auth::{TokenPair, TokenRecord, User};

pub use memory::{MemoryTokenStore, MemoryUserDirectory};
pub use postgres::{PgTokenStore, PgUserDirectory};

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("store call timed out after {0:?}")]
    Timeout(Duration),
}

/// Read access to the user service's accounts.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Exact-match lookup by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

/// Keyed store of token halves.
///
/// Records are immutable; `delete` exists so revocation can be added without
/// changing the trait.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Write every record in one batch. Either all records are stored or the
    /// call fails.
    async fn put_all(&self, records: &[TokenRecord]) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<TokenRecord>, StoreError>;

    /// Remove a record, returning whether it existed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Persist both halves of a pair as two independent records.
pub async fn save_token_pair(
    store: &dyn TokenStore,
    pair: TokenPair,
) -> Result<TokenPair, StoreError> {
    store.put_all(&pair.records()).await?;
    Ok(pair)
}

/// Point lookup of one token half by its own id.
pub async fn get_token_record(store: &dyn TokenStore, id: Uuid) -> Result<TokenRecord, StoreError> {
    store.get(id).await?.ok_or(StoreError::NotFound)
}

/// Bound a store call by `limit`. Dropping the returned future cancels the call.
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| StoreError::Timeout(limit))?
}
