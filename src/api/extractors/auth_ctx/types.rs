/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - auth gate が token を解決して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - リクエスト単位の値。キャッシュ・永続化はしない
 */
use crate::services::auth::identity::UserIdentity;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user_id` は identity store 上のユーザー ID (文字列のまま扱う)
/// - `email` はログ相関・表示用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: String,
    pub email: String,
}

impl From<UserIdentity> for AuthCtx {
    fn from(user: UserIdentity) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
        }
    }
}
