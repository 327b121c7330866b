/*
 * Responsibility
 * - GET /user/me
 * - gate が解決した AuthCtx をそのまま返す (private route の動作確認用)
 */
use axum::Json;

use crate::api::{dto::user::MeResponse, extractors::AuthCtxExtractor};

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: ctx.user_id,
        email: ctx.email,
    })
}
