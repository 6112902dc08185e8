//! JSON-RPC core: envelope codec, method registry, and request dispatch
//!
//! Shared vocabulary and protocol logic for both sides of the hop.

pub mod dispatch;
pub mod envelope;
pub mod registry;
