//! Request authentication gate.
//!
//! One evaluation per request:
//! - public path (allow-list match) → pass, no token needed
//! - private path → `Authorization` header is looked up verbatim in the identity store
//!   - missing/empty header → `MissingToken` (400)
//!   - no user holds the token → `UnknownToken` (403)
//!   - store error / timeout → `ResolutionFailure` (500, no body)
//!   - found → pass with the resolved user
//!
//! The gate keeps no per-request state; it is shared as `Arc<AuthGate>`.

use axum::http::{HeaderMap, header};
use thiserror::Error;

use crate::services::auth::identity::{IdentityResolver, ResolveError, UserIdentity};
use crate::services::auth::public_routes::PublicRoutes;

pub const MISSING_TOKEN_REASON: &str = "Authorization header is required for private endpoints";
pub const UNKNOWN_TOKEN_REASON: &str = "The Authorization token sent does not exist";

/// Terminal pass states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    PassPublic,
    PassPrivate(UserIdentity),
}

/// Terminal reject states. Rendered by `IntoResponse` in `crate::error`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    #[error("missing authorization header")]
    MissingToken,
    #[error("unknown authorization token")]
    UnknownToken,
    #[error("identity resolution failed")]
    ResolutionFailure,
}

#[derive(Debug)]
pub struct AuthGate {
    routes: PublicRoutes,
    resolver: IdentityResolver,
}

impl AuthGate {
    pub fn new(routes: PublicRoutes, resolver: IdentityResolver) -> Self {
        Self { routes, resolver }
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.routes.is_public(path)
    }

    pub async fn evaluate(
        &self,
        path: &str,
        headers: &HeaderMap,
    ) -> Result<GateOutcome, GateRejection> {
        if self.is_public(path) {
            tracing::debug!(path, "public endpoint, skipping auth");
            return Ok(GateOutcome::PassPublic);
        }

        tracing::debug!(path, "private endpoint, checking auth");
        let token = extract_token(headers)?;

        match self.resolver.resolve(token).await {
            Ok(user) => Ok(GateOutcome::PassPrivate(user)),
            Err(ResolveError::UnknownToken) => {
                tracing::debug!(path, "authorization token does not exist");
                Err(GateRejection::UnknownToken)
            }
            Err(err) => {
                tracing::error!(
                    path,
                    backend = self.resolver.backend_name(),
                    error = %err,
                    "identity resolution failed"
                );
                Err(GateRejection::ResolutionFailure)
            }
        }
    }
}

/// Returns the `Authorization` header value exactly as sent (no scheme stripping).
pub fn extract_token(headers: &HeaderMap) -> Result<&str, GateRejection> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(GateRejection::MissingToken)?;

    if value.is_empty() {
        return Err(GateRejection::MissingToken);
    }

    // Stored tokens are strings, so a non UTF-8 value cannot belong to anyone.
    std::str::from_utf8(value.as_bytes()).map_err(|_| GateRejection::UnknownToken)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::http::HeaderValue;

    use super::*;
    use crate::services::auth::identity::IdentityStore;
    use crate::services::auth::identity::testing::{BrokenStore, MemoryStore, StalledStore};
    use crate::services::auth::public_routes::DEFAULT_PUBLIC_PATHS;

    fn gate_with(store: Arc<dyn IdentityStore>) -> AuthGate {
        AuthGate::new(
            PublicRoutes::new(DEFAULT_PUBLIC_PATHS).unwrap(),
            IdentityResolver::new(store, Duration::from_millis(50)),
        )
    }

    fn store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::default().with_user("u1", "rick@me.com", "abcd123"))
    }

    fn headers(token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            headers.insert(header::AUTHORIZATION, HeaderValue::from_str(token).unwrap());
        }
        headers
    }

    #[test]
    fn token_is_returned_verbatim() {
        assert_eq!(extract_token(&headers(Some("abcd123"))), Ok("abcd123"));
        assert_eq!(
            extract_token(&headers(Some("Bearer abcd123"))),
            Ok("Bearer abcd123")
        );
    }

    #[test]
    fn absent_or_empty_header_is_missing() {
        assert_eq!(extract_token(&headers(None)), Err(GateRejection::MissingToken));
        assert_eq!(
            extract_token(&headers(Some(""))),
            Err(GateRejection::MissingToken)
        );
    }

    #[test]
    fn non_utf8_header_is_unknown() {
        let mut h = HeaderMap::new();
        h.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap(),
        );
        assert_eq!(extract_token(&h), Err(GateRejection::UnknownToken));
    }

    #[tokio::test]
    async fn public_path_passes_without_touching_the_store() {
        let store = store();
        let gate = gate_with(store.clone());

        for token in [None, Some(""), Some("deadbeef"), Some("abcd123")] {
            assert_eq!(
                gate.evaluate("/auth/login", &headers(token)).await,
                Ok(GateOutcome::PassPublic)
            );
        }
        assert_eq!(store.lookups(), 0);
    }

    #[tokio::test]
    async fn private_path_without_header_is_rejected() {
        let store = store();
        let gate = gate_with(store.clone());

        assert_eq!(
            gate.evaluate("/orders", &headers(None)).await,
            Err(GateRejection::MissingToken)
        );
        assert_eq!(store.lookups(), 0);
    }

    #[tokio::test]
    async fn private_path_with_unknown_token_is_forbidden() {
        let gate = gate_with(store());
        assert_eq!(
            gate.evaluate("/orders", &headers(Some("deadbeef"))).await,
            Err(GateRejection::UnknownToken)
        );
    }

    #[tokio::test]
    async fn bearer_prefix_is_not_stripped() {
        let gate = gate_with(store());
        assert_eq!(
            gate.evaluate("/orders", &headers(Some("Bearer abcd123"))).await,
            Err(GateRejection::UnknownToken)
        );
    }

    #[tokio::test]
    async fn private_path_with_known_token_passes_with_user() {
        let gate = gate_with(store());
        let outcome = gate.evaluate("/orders", &headers(Some("abcd123"))).await;

        match outcome {
            Ok(GateOutcome::PassPrivate(user)) => {
                assert_eq!(user.id, "u1");
                assert_eq!(user.email, "rick@me.com");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn repeated_requests_get_identical_outcomes() {
        let gate = gate_with(store());

        for (path, token) in [
            ("/orders", Some("abcd123")),
            ("/orders", Some("deadbeef")),
            ("/orders", None),
            ("/auth/register", None),
        ] {
            let first = gate.evaluate(path, &headers(token)).await;
            let second = gate.evaluate(path, &headers(token)).await;
            assert_eq!(first, second, "{path} {token:?}");
        }
    }

    #[tokio::test]
    async fn store_timeout_is_a_resolution_failure() {
        let gate = gate_with(Arc::new(StalledStore));
        assert_eq!(
            gate.evaluate("/orders", &headers(Some("abcd123"))).await,
            Err(GateRejection::ResolutionFailure)
        );
    }

    #[tokio::test]
    async fn store_error_is_a_resolution_failure() {
        let gate = gate_with(Arc::new(BrokenStore));
        assert_eq!(
            gate.evaluate("/orders", &headers(Some("abcd123"))).await,
            Err(GateRejection::ResolutionFailure)
        );
    }
}
