/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - gate: 公開 route の allow-list + identity store (読み取り専用・全リクエストで共有)
 * - Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use crate::services::auth::AuthGate;

#[derive(Clone, Debug)]
pub struct AppState {
    pub gate: Arc<AuthGate>,
}

impl AppState {
    pub fn new(gate: Arc<AuthGate>) -> Self {
        Self { gate }
    }
}
