//! Request extractors with crate-specific rejections.

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` whose rejection renders through [`AppError`], so a malformed
/// or mistyped body gets the same JSON error shape as every other failure.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
