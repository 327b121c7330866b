/*
 * Responsibility
 * - URL 構造の定義
 * - gate の内側に入る route (private/public 判定は gate が path で行う) と fallback
 * - /health は app.rs 側で gate の外にマウントする
 */
use axum::{Router, routing::get};

use crate::api::handlers::{fallback::not_found, user::me};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user/me", get(me))
        .fallback(not_found)
}
