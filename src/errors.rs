// errors.rs
use astra::Response;
use thiserror::Error;

use crate::domain::lifecycle::TransitionError;

/// Errors originating from either the server logic
/// (routing, missing resources, etc.) or downstream layers (DB, XLSX).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Database Error: {0}")]
    DbError(String),
    #[error("Spreadsheet Error: {0}")]
    XlsxError(String),
    #[error("Internal Server Error")]
    InternalError,
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

impl ServerError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) => 400,
            ServerError::Unauthorized(_) => 401,
            ServerError::DbError(_) | ServerError::XlsxError(_) | ServerError::InternalError => {
                500
            }
        }
    }
}

impl From<TransitionError> for ServerError {
    fn from(err: TransitionError) -> Self {
        ServerError::BadRequest(err.to_string())
    }
}
