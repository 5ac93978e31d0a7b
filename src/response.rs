use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Success marker carried in `intMessage` on every data-carrying response.
pub const OPERATION_SUCCESSFUL: &str = "Operation Successful";

/// Uniform response wrapper. Every endpoint answers
/// `{statusCode, message | intMessage, data?}` with `statusCode` mirroring
/// the HTTP status line.
#[derive(Debug, Serialize)]
pub struct Envelope<T = ()> {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "intMessage", skip_serializing_if = "Option::is_none")]
    pub int_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Data-carrying success with the stock `intMessage` marker.
    pub fn data(status: StatusCode, data: T) -> Self {
        Self {
            status_code: status.as_u16(),
            message: None,
            int_message: Some(OPERATION_SUCCESSFUL.to_string()),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    /// Message-only envelope, used for write acknowledgements and errors.
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            message: Some(message.into()),
            int_message: None,
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_envelope_serializes_with_int_message() {
        let envelope = Envelope::data(StatusCode::OK, vec![1, 2, 3]);
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["intMessage"], OPERATION_SUCCESSFUL);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
        assert!(
            json.get("message").is_none(),
            "unused fields stay out of the body"
        );
    }

    #[test]
    fn message_envelope_skips_data_and_int_message() {
        let envelope = Envelope::message(StatusCode::CREATED, "User registered successfully");
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["statusCode"], 201);
        assert_eq!(json["message"], "User registered successfully");
        assert!(json.get("intMessage").is_none());
        assert!(json.get("data").is_none());
    }
}
