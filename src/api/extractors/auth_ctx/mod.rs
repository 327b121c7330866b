/*!
 * Resolved identity for handlers
 *
 * Responsibility:
 * - auth gate が解決した user を型付きで handler に渡す (文字列キーの context bag は使わない)
 * - 型は types、axum の extractor 実装は core
 */

mod core;
mod types;

pub use core::AuthCtxExtractor;
pub use types::AuthCtx;
