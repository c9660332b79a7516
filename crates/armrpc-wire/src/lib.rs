//! JSON-RPC 2.0 envelopes for the armrpc protocol.
//!
//! This crate owns the wire shape only: request and response envelope types
//! and the text codec between them and discrete WebSocket frames. It knows
//! nothing about transports, pending calls, or the robot's method catalogue.

mod codec;
mod error;

pub use codec::{
    decode_response, encode_request, encode_response, ErrorObject, Request, Response,
    JSONRPC_VERSION,
};
pub use error::{Result, WireError};
