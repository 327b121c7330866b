/*
 * Responsibility
 * - ドメインサービス (認証ゲート) の公開
 */
pub mod auth;
