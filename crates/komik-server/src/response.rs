//! The API response envelope.
//!
//! Every successful response has the shape
//! `{ "success": true, "message": ..., "data": ... }`. Error responses
//! share the shape with `success: false` and no data (see the error
//! mapping in `komik-auth`).

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// A successful response body.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always `true` here.
    pub success: bool,

    /// Human-readable outcome description.
    pub message: String,

    /// Operation payload, omitted when there is none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// A 200 response with a payload.
    #[must_use]
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            status: StatusCode::OK,
        }
    }

    /// A 201 response with a payload.
    #[must_use]
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            status: StatusCode::CREATED,
        }
    }
}

impl ApiResponse<()> {
    /// A 200 response with no payload.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            status: StatusCode::OK,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let response = ApiResponse::ok("Done", serde_json::json!({"count": 2}));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Done");
        assert_eq!(json["data"]["count"], 2);
    }

    #[test]
    fn test_empty_data_is_omitted() {
        let response = ApiResponse::message("Logged out successfully");
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("data").is_none());
    }
}
