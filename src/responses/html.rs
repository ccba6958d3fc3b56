use astra::{Body, ResponseBuilder};
use maud::Markup;

use crate::errors::ServerError;
use crate::responses::ResultResp;

pub fn html_response(markup: Markup) -> ResultResp {
    html_response_with_status(200, markup)
}

/// Used for pages re-rendered after a rejected form (400).
pub fn html_response_with_status(status: u16, markup: Markup) -> ResultResp {
    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::TEXT_HTML_UTF_8.as_ref())
        .body(Body::from(markup.into_string()))
        .map_err(|_| ServerError::InternalError)
}
