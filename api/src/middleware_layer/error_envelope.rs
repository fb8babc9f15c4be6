//! Wraps plain-text extractor rejections in the JSON envelope and tags
//! every response with `X-Request-Id`.

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::core::http::response_envelope::{ApiErrorDetail, ApiResponse};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Rejection bodies are short; anything larger is passed through untouched.
const MAX_REJECTION_BYTES: usize = 64 * 1024;

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

fn mapped_code(status: StatusCode) -> Option<&'static str> {
    match status {
        StatusCode::BAD_REQUEST => Some("BAD_REQUEST"),
        StatusCode::PAYLOAD_TOO_LARGE => Some("PAYLOAD_TOO_LARGE"),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => Some("UNSUPPORTED_MEDIA_TYPE"),
        StatusCode::UNPROCESSABLE_ENTITY => Some("UNPROCESSABLE_ENTITY"),
        _ => None,
    }
}

/// Field the serde message talks about, when it names a request field.
fn guess_path(msg: &str) -> Option<String> {
    ["selected_text", "current_document_id", "max_results", "upload_type", "file"]
        .into_iter()
        .find(|key| msg.contains(key))
        .map(str::to_string)
}

fn hint_for(msg: &str) -> Option<String> {
    if msg.contains("missing field") {
        Some("Add the missing field to the JSON body.".into())
    } else if msg.contains("invalid type") {
        Some("Check the field types (e.g. `current_document_id` is an integer).".into())
    } else if msg.contains("Content-Type") {
        Some("Send the body with `Content-Type: application/json`.".into())
    } else {
        None
    }
}

fn ensure_request_id(headers: &mut HeaderMap) {
    let present = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|v| !v.trim().is_empty());
    if present {
        return;
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    if let Ok(value) = HeaderValue::from_str(&format!("req-{nanos}")) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
}

pub async fn error_envelope(req: Request<Body>, next: Next) -> Response {
    let res = next.run(req).await;
    let status = res.status();

    let code = match mapped_code(status) {
        Some(code) if !is_json(res.headers()) => code,
        _ => {
            let (mut parts, body) = res.into_parts();
            ensure_request_id(&mut parts.headers);
            return Response::from_parts(parts, body);
        }
    };

    let (mut parts, body) = res.into_parts();
    ensure_request_id(&mut parts.headers);
    let bytes: Bytes = match axum::body::to_bytes(body, MAX_REJECTION_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => return Response::from_parts(parts, Body::empty()),
    };
    let original = String::from_utf8_lossy(&bytes);

    let detail = ApiErrorDetail {
        path: guess_path(&original),
        hint: hint_for(&original),
    };
    let envelope = ApiResponse::error(code, original.trim(), [detail]);

    let body = match serde_json::to_vec(&envelope) {
        Ok(v) => v,
        Err(_) => bytes.to_vec(),
    };
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    parts.headers.remove(header::CONTENT_LENGTH);

    Response::from_parts(parts, Body::from(body))
}
