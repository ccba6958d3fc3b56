use astra::{Body, ResponseBuilder};

use crate::errors::ServerError;
use crate::responses::ResultResp;

/// 303 so the browser follows a POST with a GET.
pub fn see_other(location: &str) -> ResultResp {
    ResponseBuilder::new()
        .status(303)
        .header("Location", location)
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)
}

pub fn see_other_with_cookie(location: &str, cookie: &str) -> ResultResp {
    ResponseBuilder::new()
        .status(303)
        .header("Location", location)
        .header("Set-Cookie", cookie)
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)
}
