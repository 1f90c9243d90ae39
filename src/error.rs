use crate::api::ApiError;
use crate::storage::StorageError;

pub const CONNECTIVITY_MESSAGE: &str =
    "Unable to reach the server. Please check your connection and try again.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl AppError {
    /// Text suitable for an alert dialog or inline error state.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api(ApiError::Rejected { message, .. }) => message.clone(),
            AppError::Api(ApiError::RequestError(_))
            | AppError::Api(ApiError::CircuitBreakerOpen) => CONNECTIVITY_MESSAGE.to_string(),
            AppError::Api(ApiError::Cancelled) => "The request was cancelled.".to_string(),
            AppError::Api(_) | AppError::Storage(_) => {
                "Something went wrong. Please try again.".to_string()
            }
            AppError::ValidationError(msg) | AppError::InvalidState(msg) => msg.clone(),
            AppError::NotFound(what) => format!("{} could not be found.", what),
        }
    }
}
