use astra::{Body, ResponseBuilder};
use serde::Serialize;
use tracing::error;

use crate::errors::ServerError;
use crate::responses::ResultResp;

pub fn json_response<T: Serialize + ?Sized>(value: &T) -> ResultResp {
    let body = serde_json::to_vec(value).map_err(|e| {
        error!(error = %e, "encode json failed");
        ServerError::InternalError
    })?;

    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body))
        .map_err(|_| ServerError::InternalError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn serializes_with_json_content_type() {
        let resp = json_response(&vec!["a", "b"]).unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "application/json");
    }

    #[test]
    fn unencodable_value_is_a_server_fault() {
        // JSON object keys must be strings.
        let value: HashMap<(i32, i32), i32> = HashMap::from([((1, 2), 3)]);
        assert!(matches!(json_response(&value), Err(ServerError::InternalError)));
    }
}
