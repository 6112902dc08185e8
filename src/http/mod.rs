//! HTTP transport layer for the RPC server
//!
//! Provides the axum entry point that accepts POST on any path and turns
//! everything else away.

pub mod handlers;
