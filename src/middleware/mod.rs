/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth::access (認証ゲート), http (request id / trace / body limit / timeout)
 */
pub mod auth;
pub mod http;
