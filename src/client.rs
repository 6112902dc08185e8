//! JSON-RPC HTTP client
//!
//! One outbound POST per call. Each call owns its request/response cycle
//! and resolves exactly once with either the `result` value or a failure.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use thiserror::Error;

use crate::rpc::envelope::{decode_response, encode_request, timestamp_id, DecodeError};

#[derive(Debug, Error)]
pub enum CallError {
    /// Network-level failure: connect, reset, or timeout below HTTP.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    /// The response body was not a parseable envelope.
    #[error("response decode failure: {0}")]
    Decode(#[from] DecodeError),
    /// The response body exceeded this client's buffering cap.
    #[error("response body exceeds {limit} bytes")]
    ResponseTooLarge { limit: usize },
    /// The remote side reported a failure. Carries the envelope's `error`
    /// value; null when the response carried neither result nor error.
    #[error("rpc failure: {0}")]
    Rpc(Value),
}

#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    host: String,
    port: u16,
    credentials: Option<(String, String)>,
    max_body_bytes: usize,
}

impl Client {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            http: reqwest::Client::new(),
            host: host.into(),
            port,
            credentials: None,
            max_body_bytes: crate::config::DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Sends `Authorization: Basic base64(user:password)` on every call.
    pub fn with_basic_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((user.into(), password.into()));
        self
    }

    /// Caps how much of a response body this client will buffer.
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    pub async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, CallError> {
        self.call_on_path(method, params, "/").await
    }

    /// One POST to `path` on the configured host. No retries, no
    /// deduplication; concurrent calls on the same client are independent.
    pub async fn call_on_path(
        &self,
        method: &str,
        params: Vec<Value>,
        path: &str,
    ) -> Result<Value, CallError> {
        let id = timestamp_id();
        let body = encode_request(&id, method, &params);
        let url = format!("http://{}:{}{}", self.host, self.port, path);

        let mut request = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if let Some((user, password)) = &self.credentials {
            request = request.header(AUTHORIZATION, basic_auth_header(user, password));
        }

        let mut reply = request.send().await?;
        if reply
            .content_length()
            .is_some_and(|length| length > self.max_body_bytes as u64)
        {
            return Err(CallError::ResponseTooLarge {
                limit: self.max_body_bytes,
            });
        }

        // Chunked replies carry no Content-Length, so the cap is enforced
        // while reading as well.
        let mut bytes = Vec::new();
        while let Some(chunk) = reply.chunk().await? {
            if bytes.len() + chunk.len() > self.max_body_bytes {
                return Err(CallError::ResponseTooLarge {
                    limit: self.max_body_bytes,
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        let response = decode_response(&bytes)?;

        if !response.error.is_null() {
            return Err(CallError::Rpc(response.error));
        }
        if !response.result.is_null() {
            return Ok(response.result);
        }
        // Neither side of the envelope is populated. Fail with whatever
        // error we have (null) instead of pretending success.
        Err(CallError::Rpc(response.error))
    }
}

pub fn basic_auth_header(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{password}")))
}
