use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use thiserror::Error;

/// Error value reported by a handler. Carries an arbitrary JSON value so
/// handlers can return structured failures; the value travels in the
/// response envelope's `error` field.
#[derive(Debug, Clone, Error)]
#[error("handler failed: {value}")]
pub struct HandlerError {
    pub value: Value,
}

impl HandlerError {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// A failure with no further detail. Encoded on the wire as the fixed
    /// "Unspecified Failure" string.
    pub fn unspecified() -> Self {
        Self { value: Value::Null }
    }

    /// The value to put in the envelope's `error` field. Falsy values
    /// (null, false, empty string, zero) carry no information and are
    /// replaced by a fixed marker string.
    pub fn into_wire_value(self) -> Value {
        if is_falsy(&self.value) {
            Value::String("Unspecified Failure".to_string())
        } else {
            self.value
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::String(text) => text.is_empty(),
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Terminal rejections of an incoming HTTP request, produced before any
/// handler runs. Each maps to a fixed status and plain-text body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RpcRejection {
    #[error("invalid request")]
    InvalidRequest,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("payload too large")]
    PayloadTooLarge,
}

impl IntoResponse for RpcRejection {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidRequest => {
                (StatusCode::BAD_REQUEST, "Invalid Request\n").into_response()
            }
            Self::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, "POST")],
                "Method Not Allowed\n",
            )
                .into_response(),
            Self::PayloadTooLarge => {
                (StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large\n").into_response()
            }
        }
    }
}
