//! HTTP response building module
//!
//! JSON success and error responses plus the fixed-status builders used by the router.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

const JSON: &str = "application/json";

/// Body used when a response cannot be serialized
const ENCODE_FAILURE_BODY: &str = r#"{"error":"Internal server error"}"#;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// Build JSON response
///
/// Serialization failures are logged and replaced with a generic 500 body.
pub fn json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(json) => build_json(status, Bytes::from(json)),
        Err(e) => {
            crate::logger::log_error(&format!("Failed to encode JSON response: {e}"));
            build_json(
                StatusCode::INTERNAL_SERVER_ERROR,
                Bytes::from_static(ENCODE_FAILURE_BODY.as_bytes()),
            )
        }
    }
}

/// Build `{"error": message}` response
pub fn json_error(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    json_response(status, &ErrorBody { error: message })
}

/// Build 204 No Content response
pub fn build_204_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("204", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 response for paths outside the album routes
pub fn build_404_response() -> Response<Full<Bytes>> {
    json_error(StatusCode::NOT_FOUND, "404 page not found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(allow: &'static str) -> Response<Full<Bytes>> {
    let mut response = json_error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
    response
        .headers_mut()
        .insert(hyper::header::ALLOW, hyper::header::HeaderValue::from_static(allow));
    response
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    json_error(StatusCode::PAYLOAD_TOO_LARGE, "Payload too large")
}

/// Build health check response
pub fn build_health_response(status: &str) -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &serde_json::json!({ "status": status }))
}

fn build_json(status: StatusCode, body: Bytes) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", JSON)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_json_error_shape() {
        let response = json_error(StatusCode::BAD_REQUEST, "Invalid album ID");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(body_string(response).await, r#"{"error":"Invalid album ID"}"#);
    }

    #[tokio::test]
    async fn test_json_error_escapes_message() {
        let response = json_error(StatusCode::INTERNAL_SERVER_ERROR, "key \"albums_pkey\"");
        assert_eq!(
            body_string(response).await,
            r#"{"error":"key \"albums_pkey\""}"#
        );
    }

    #[tokio::test]
    async fn test_unencodable_body_becomes_500() {
        // Non-string map keys cannot be encoded as JSON
        let mut map = std::collections::HashMap::new();
        map.insert(vec![1u8], 1);
        let response = json_response(StatusCode::OK, &map);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, ENCODE_FAILURE_BODY);
    }

    #[tokio::test]
    async fn test_204_is_empty() {
        let response = build_204_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.headers().get("content-type").is_none());
        assert_eq!(body_string(response).await, "");
    }

    #[test]
    fn test_405_lists_allowed_methods() {
        let response = build_405_response("GET, POST");
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()["allow"], "GET, POST");
    }
}
