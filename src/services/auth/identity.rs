//! Identity store interface and the token resolver used by the gate.
use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::config::IdentityTable;
use crate::repos::{error::RepoResult, user_repo};

/// The part of a user record the gate reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: String,
    pub email: String,
}

impl From<user_repo::UserRow> for UserIdentity {
    fn from(row: user_repo::UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
        }
    }
}

/// Read-only lookup of users by their access token.
///
/// Implementations are shared by all concurrent requests and must not rely on
/// exclusive access to the underlying connection.
#[async_trait]
pub trait IdentityStore: Send + Sync + 'static {
    // Returns the store backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Exact-match lookup on the token field.
    //
    // Returns:
    // - `Ok(Some(_))` when a user holds this token
    // - `Ok(None)` when nobody does
    // - `Err(_)` on any backend failure
    async fn find_by_token(&self, token: &str) -> RepoResult<Option<UserIdentity>>;
}

/// Postgres-backed identity store.
#[derive(Clone, Debug)]
pub struct PgIdentityStore {
    pool: PgPool,
    table: IdentityTable,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool, table: IdentityTable) -> Self {
        Self { pool, table }
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn find_by_token(&self, token: &str) -> RepoResult<Option<UserIdentity>> {
        let row = user_repo::find_by_token(&self.pool, &self.table, token).await?;
        Ok(row.map(UserIdentity::from))
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no user holds the presented token")]
    UnknownToken,
    #[error("identity lookup failed: {0}")]
    Store(#[from] crate::repos::error::RepoError),
    #[error("identity lookup timed out after {0:?}")]
    TimedOut(Duration),
}

/// Resolves tokens against an [`IdentityStore`] under a per-lookup time budget.
#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn IdentityStore>,
    timeout: Duration,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn IdentityStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Dropping the returned future (client went away) abandons the lookup.
    pub async fn resolve(&self, token: &str) -> Result<UserIdentity, ResolveError> {
        match tokio::time::timeout(self.timeout, self.store.find_by_token(token)).await {
            Err(_) => Err(ResolveError::TimedOut(self.timeout)),
            Ok(Err(err)) => Err(ResolveError::Store(err)),
            Ok(Ok(None)) => Err(ResolveError::UnknownToken),
            Ok(Ok(Some(user))) => Ok(user),
        }
    }
}

impl std::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver")
            .field("backend", &self.store.backend_name())
            .field("timeout", &self.timeout)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{BrokenStore, MemoryStore, StalledStore};
    use super::*;

    fn resolver(store: impl IdentityStore) -> IdentityResolver {
        IdentityResolver::new(Arc::new(store), Duration::from_millis(50))
    }

    #[tokio::test]
    async fn known_token_resolves_to_user() {
        let r = resolver(MemoryStore::default().with_user("u1", "rick@me.com", "abcd123"));

        let user = r.resolve("abcd123").await.unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.email, "rick@me.com");
    }

    #[tokio::test]
    async fn lookup_is_exact_match() {
        let r = resolver(MemoryStore::default().with_user("u1", "rick@me.com", "abcd123"));

        for token in ["ABCD123", "abcd12", "abcd123 ", "Bearer abcd123"] {
            assert!(
                matches!(r.resolve(token).await, Err(ResolveError::UnknownToken)),
                "{token:?} must not resolve"
            );
        }
    }

    #[tokio::test]
    async fn stalled_store_times_out() {
        let r = resolver(StalledStore);
        assert!(matches!(
            r.resolve("abcd123").await,
            Err(ResolveError::TimedOut(d)) if d == Duration::from_millis(50)
        ));
    }

    #[tokio::test]
    async fn store_error_is_reported() {
        let r = resolver(BrokenStore);
        assert!(matches!(
            r.resolve("abcd123").await,
            Err(ResolveError::Store(_))
        ));
    }

    #[test]
    fn user_row_converts_to_identity() {
        let row = user_repo::UserRow {
            id: "u1".into(),
            email: "rick@me.com".into(),
        };

        let user = UserIdentity::from(row);
        assert_eq!(user.id, "u1");
        assert_eq!(user.email, "rick@me.com");
    }
}
