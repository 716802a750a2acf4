use crate::types::DbId;

/// Domain error shared by every layer.
///
/// The API crate maps each variant onto one HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed input shape, rejected before any write.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or invalid credential, or a credential for a deleted user.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but the role or assignment check failed.
    #[error("Forbidden: {0}")]
    Forbidden(String),
}
