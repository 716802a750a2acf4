pub mod auth;
pub mod chore;
pub mod dashboard;
pub mod report;
pub mod user;

use bitchore_core::error::CoreError;
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// `{ "message": ... }` acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Run `validator` rules on a request body, mapping failures to 400.
pub(crate) fn validate_input<T: Validate>(input: &T) -> AppResult<()> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))
}
