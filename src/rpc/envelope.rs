//! JSON-RPC envelope shapes and codec
//!
//! The shared wire vocabulary between client and server: request encoding,
//! response encoding, and the tolerant decoders both sides discriminate on.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Request envelope: `{"id": .., "method": .., "params": [..]}`.
///
/// `method` and `params` are required for a request to be dispatchable;
/// `id` is carried through to the response but tolerated as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Value,
    pub method: String,
    pub params: Vec<Value>,
}

/// Response envelope: `{"result": .., "error": .., "id": ..}`.
///
/// All three fields are always emitted, null or not. Exactly one of
/// `result`/`error` is non-null in a well-formed response; the decoder
/// leaves the discrimination to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Value,
    #[serde(default)]
    pub id: Value,
}

impl Response {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            result,
            error: Value::Null,
            id,
        }
    }

    pub fn failure(id: Value, error: Value) -> Self {
        Self {
            result: Value::Null,
            error,
            id,
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed envelope: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Fresh request id. Timestamp-derived, like the ids remote peers expect
/// to echo back; never used for correlation (each call owns its future).
pub fn timestamp_id() -> String {
    Utc::now().timestamp_micros().to_string()
}

pub fn encode_request(id: &str, method: &str, params: &[Value]) -> Vec<u8> {
    let request = Request {
        id: Value::String(id.to_string()),
        method: method.to_string(),
        params: params.to_vec(),
    };
    serde_json::to_vec(&request).expect("request envelope serialization")
}

pub fn decode_request(bytes: &[u8]) -> Result<Request, DecodeError> {
    Ok(serde_json::from_slice(bytes)?)
}

pub fn encode_response(id: Value, result: Value, error: Value) -> Vec<u8> {
    let response = Response { result, error, id };
    serde_json::to_vec(&response).expect("response envelope serialization")
}

pub fn decode_response(bytes: &[u8]) -> Result<Response, DecodeError> {
    Ok(serde_json::from_slice(bytes)?)
}
