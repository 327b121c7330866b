//! Auth gate middleware: classify path → (private なら) token 解決 → AuthCtx を extensions に入れる
//!
//! - public path はそのまま next へ (header は見ない)
//! - private path は `Authorization` header を verbatim で identity store に照会する
//! - 拒否時は GateRejection をそのまま応答にする (400 / 403 / 500)
//!
//! lookup は middleware の future の中でだけ走る。client 切断で future が drop されれば
//! 照会も一緒に破棄される (spawn しない)。

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::services::auth::{GateOutcome, GateRejection};
use crate::state::AppState;

/// Router 全体 (fallback 含む) に auth gate を掛ける。
///
/// 例：
/// ```ignore
/// let gated = middleware::auth::access::apply(api::routes(), state.clone());
/// let app = Router::new().route("/health", get(health)).merge(gated);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, GateRejection> {
    // nest されていても allow-list は元の path 全体に対して評価する
    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    match state.gate.evaluate(&path, req.headers()).await? {
        GateOutcome::PassPublic => {}
        GateOutcome::PassPrivate(user) => {
            tracing::debug!(path = %path, user_id = %user.id, "request authenticated");
            req.extensions_mut().insert(AuthCtx::from(user));
        }
    }

    Ok(next.run(req).await)
}
