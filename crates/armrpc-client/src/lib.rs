//! Async JSON-RPC 2.0 client for the armrpc robot-arm server.
//!
//! One persistent WebSocket connection carries every call. Concurrent
//! callers multiplex over it: requests are serialized through a single
//! writer task, responses are correlated back to their callers by request
//! id, never by send order. A dropped connection fails every in-flight
//! call with [`ClientError::Disconnected`] and is transparently reopened
//! (one bounded attempt) on the next call.
//!
//! # Crate Structure
//!
//! - [`client`] — the [`RpcClient`] facade and typed method catalogue
//! - [`config`] — endpoint and timeout configuration
//! - [`pending`] — in-flight call registry
//! - [`types`] — domain value types and marshalling
//! - `conn` / `socket` — connection manager and WebSocket glue (private)

pub mod client;
pub mod config;
pub mod error;
pub mod pending;
pub mod types;

mod conn;
mod socket;

pub use client::RpcClient;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use types::{
    AiModel, AprilTag, Joints, Mode, Point, Pose, Status, TaskTraining, TrainingEpisode,
};
