use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

use super::AuthCtx;

/// Handler で AuthCtx を受け取るための extractor
///
/// auth gate が private route で AuthCtx を extensions に入れている前提。
/// 見つからない場合 (public route から使った・gate を通っていない) は 401。
pub struct AuthCtxExtractor(pub AuthCtx);

impl<S> FromRequestParts<S> for AuthCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<AuthCtx>() {
            Some(ctx) => Ok(AuthCtxExtractor(ctx.clone())),
            None => {
                tracing::warn!(path = %parts.uri.path(), "AuthCtx requested but not resolved for this route");
                Err(AppError::Unauthorized)
            }
        }
    }
}
