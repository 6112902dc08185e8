//! Per-request dispatch
//!
//! Decodes a buffered request body, validates the envelope, resolves the
//! method in the registry, invokes the handler, and builds the response
//! envelope. Exactly one outcome is produced on every path.

use tracing::info;

use crate::errors::RpcRejection;
use crate::rpc::envelope::{decode_request, Response};
use crate::rpc::registry::Registry;

/// A completed dispatch: the response envelope plus the method name that
/// ran, so the request log can name it.
#[derive(Debug)]
pub struct Dispatched {
    pub method: String,
    pub envelope: Response,
}

/// Runs one buffered request body through decode, validation, lookup and
/// invocation.
///
/// `Ok` carries the response envelope (handler success and handler failure
/// both land here; the HTTP status never reflects the handler outcome).
/// `Err` carries a terminal rejection for malformed, incomplete, or
/// unresolvable requests.
pub async fn dispatch(registry: &Registry, body: &[u8]) -> Result<Dispatched, RpcRejection> {
    let request = decode_request(body).map_err(|_| RpcRejection::InvalidRequest)?;

    if request.method.is_empty() {
        return Err(RpcRejection::InvalidRequest);
    }

    let handler = registry
        .lookup(&request.method)
        .ok_or(RpcRejection::InvalidRequest)?;

    let envelope = match handler.call(&request.params).await {
        Ok(value) => Response::success(request.id, value),
        Err(error) => Response::failure(request.id, error.into_wire_value()),
    };

    info!(
        method = %request.method,
        outcome = if envelope.error.is_null() { "success" } else { "failure" },
        "rpc dispatched"
    );

    Ok(Dispatched {
        method: request.method,
        envelope,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use crate::errors::HandlerError;
    use crate::rpc::envelope::encode_request;

    use super::*;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.expose_fn("math.add", |params| {
            let sum: f64 = params.iter().filter_map(Value::as_f64).sum();
            Ok(json!(sum))
        });
        registry.expose_fn("always.fails", |_| {
            Err(HandlerError::new(json!({"reason": "on purpose"})))
        });
        registry.expose_fn("fails.blank", |_| Err(HandlerError::unspecified()));
        registry
    }

    #[tokio::test]
    async fn success_echoes_id_and_carries_result() {
        let body = encode_request("123", "math.add", &[json!(1), json!(2)]);
        let dispatched = dispatch(&registry(), &body).await.expect("dispatchable");

        assert_eq!(dispatched.method, "math.add");
        assert_eq!(dispatched.envelope.result, json!(3.0));
        assert_eq!(dispatched.envelope.error, Value::Null);
        assert_eq!(dispatched.envelope.id, json!("123"));
    }

    #[tokio::test]
    async fn handler_failure_carries_error_value() {
        let body = encode_request("124", "always.fails", &[]);
        let dispatched = dispatch(&registry(), &body).await.expect("dispatchable");

        assert_eq!(dispatched.envelope.result, Value::Null);
        assert_eq!(dispatched.envelope.error, json!({"reason": "on purpose"}));
        assert_eq!(dispatched.envelope.id, json!("124"));
    }

    #[tokio::test]
    async fn blank_handler_failure_becomes_unspecified_failure() {
        let body = encode_request("125", "fails.blank", &[]);
        let dispatched = dispatch(&registry(), &body).await.expect("dispatchable");

        assert_eq!(dispatched.envelope.error, json!("Unspecified Failure"));
    }

    #[tokio::test]
    async fn unknown_method_is_rejected() {
        let body = encode_request("126", "math.subtract", &[]);
        let outcome = dispatch(&registry(), &body).await;

        assert_eq!(outcome.unwrap_err(), RpcRejection::InvalidRequest);
    }

    #[tokio::test]
    async fn empty_method_is_rejected() {
        let body = br#"{"id": "127", "method": "", "params": []}"#;
        let outcome = dispatch(&registry(), body).await;

        assert_eq!(outcome.unwrap_err(), RpcRejection::InvalidRequest);
    }

    #[tokio::test]
    async fn missing_params_is_rejected() {
        let body = br#"{"id": "128", "method": "math.add"}"#;
        let outcome = dispatch(&registry(), body).await;

        assert_eq!(outcome.unwrap_err(), RpcRejection::InvalidRequest);
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let outcome = dispatch(&registry(), b"{").await;

        assert_eq!(outcome.unwrap_err(), RpcRejection::InvalidRequest);
    }

    #[tokio::test]
    async fn request_without_id_echoes_null_id() {
        let body = br#"{"method": "math.add", "params": [2, 2]}"#;
        let dispatched = dispatch(&registry(), body).await.expect("dispatchable");

        assert_eq!(dispatched.envelope.id, Value::Null);
        assert_eq!(dispatched.envelope.result, json!(4.0));
    }
}
