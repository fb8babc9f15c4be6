//! JSON envelope shared by every endpoint: `{ success, data?, error? }`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Machine-readable, e.g. `DOCUMENT_NOT_FOUND` or `ANALYSIS_UNAVAILABLE`.
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ApiErrorDetail>,
}

/// Points a client at the request field that needs fixing.
#[derive(Debug, Default, Serialize)]
pub struct ApiErrorDetail {
    /// Request field, e.g. `selected_text` or `file`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ApiErrorDetail {
    pub fn is_empty(&self) -> bool {
        self.path.is_none() && self.hint.is_none()
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl ApiResponse<()> {
    /// Error envelope; empty details are dropped.
    pub fn error(
        code: &'static str,
        message: impl Into<String>,
        details: impl IntoIterator<Item = ApiErrorDetail>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
                details: details.into_iter().filter(|d| !d.is_empty()).collect(),
            }),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        self.into_response_with_status(StatusCode::OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_omits_error() {
        let json = serde_json::to_value(ApiResponse::success(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": [1, 2] }));
    }

    #[test]
    fn error_keeps_only_informative_details() {
        let env = ApiResponse::error(
            "INVALID_QUERY",
            "selected text is empty",
            [
                ApiErrorDetail::default(),
                ApiErrorDetail {
                    path: Some("selected_text".into()),
                    hint: None,
                },
            ],
        );
        let json = serde_json::to_value(env).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("data").is_none());
        assert_eq!(json["error"]["code"], "INVALID_QUERY");
        assert_eq!(json["error"]["details"].as_array().map(Vec::len), Some(1));
        assert_eq!(json["error"]["details"][0]["path"], "selected_text");
    }
}
