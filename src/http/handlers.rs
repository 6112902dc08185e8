//! Axum HTTP handler for the RPC endpoint
//!
//! One handler serves every path: POST bodies are buffered (up to the
//! configured cap) and dispatched, any other verb gets a fixed 405.

use std::error::Error;

use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use http_body_util::LengthLimitError;

use crate::errors::RpcRejection;
use crate::logging::RpcMethod;
use crate::rpc::dispatch::dispatch;
use crate::AppState;

pub async fn rpc_endpoint(State(state): State<AppState>, request: Request) -> Response {
    if request.method() != Method::POST {
        return RpcRejection::MethodNotAllowed.into_response();
    }

    // The body is fully buffered before decoding; the cap bounds how much
    // a single request can hold in memory. Read failures that are not
    // length violations count as an invalid request, not an oversized one.
    let body = match to_bytes(request.into_body(), state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(error) if is_length_limit(&error) => {
            return RpcRejection::PayloadTooLarge.into_response()
        }
        Err(_) => return RpcRejection::InvalidRequest.into_response(),
    };

    match dispatch(&state.registry, &body).await {
        Ok(dispatched) => {
            let mut response = (StatusCode::OK, Json(dispatched.envelope)).into_response();
            response
                .extensions_mut()
                .insert(RpcMethod(dispatched.method));
            response
        }
        Err(rejection) => rejection.into_response(),
    }
}

fn is_length_limit(error: &axum::Error) -> bool {
    let mut source: Option<&(dyn Error + 'static)> = Some(error);
    while let Some(current) = source {
        if current.downcast_ref::<LengthLimitError>().is_some() {
            return true;
        }
        source = current.source();
    }
    false
}
