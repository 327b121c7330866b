use crate::error::AppError;

/// Unknown routes. Sits behind the gate, so private paths are authenticated before a 404.
pub async fn not_found() -> AppError {
    AppError::not_found("route")
}
