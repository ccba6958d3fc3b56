use astra::{Body, Response, ResponseBuilder};

use crate::errors::ServerError;
use crate::templates::components::error_page;

/// Convert a ServerError into an HTML error page with the matching status.
pub fn error_response(err: &ServerError) -> Response {
    let status = err.status_code();
    let message = match err {
        ServerError::NotFound => "Not Found".to_string(),
        ServerError::BadRequest(msg) | ServerError::Unauthorized(msg) => msg.clone(),
        // Store details stay in the log.
        ServerError::DbError(_) | ServerError::XlsxError(_) | ServerError::InternalError => {
            "Something went wrong while saving your changes.".to_string()
        }
    };

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::TEXT_HTML_UTF_8.as_ref())
        .body(Body::from(error_page(status, &message).into_string()))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
