//! In-memory stores for tests and local development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use super::{StoreError, TokenStore, UserDirectory};
use crate::models::auth::{TokenRecord, User};

/// Token store backed by one locked map, so a batch lands in a single write.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    records: RwLock<HashMap<Uuid, TokenRecord>>,
    unavailable: AtomicBool,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with [`StoreError::Unavailable`] until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Uuid, TokenRecord>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, TokenRecord>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn put_all(&self, records: &[TokenRecord]) -> Result<(), StoreError> {
        self.check_available()?;
        let mut map = self.write();
        for record in records {
            map.insert(record.id, record.clone());
        }
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<TokenRecord>, StoreError> {
        self.check_available()?;
        Ok(self.read().get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.check_available()?;
        Ok(self.write().remove(&id).is_some())
    }
}

/// User directory keyed by email.
#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    users: DashMap<String, User>,
    unavailable: AtomicBool,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: User) {
        self.users.insert(user.email.clone(), user);
    }

    /// Make lookups fail with [`StoreError::Unavailable`] until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory directory offline".into()));
        }
        Ok(self.users.get(email).map(|entry| entry.value().clone()))
    }
}
