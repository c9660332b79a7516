use std::time::Duration;

use armrpc_wire::WireError;

/// Errors that can occur in client operations.
///
/// Clonable on purpose: a transport failure fans out to every pending call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    /// The transport could not be established.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The connection dropped while the call was in flight.
    #[error("disconnected while call was pending")]
    Disconnected,

    /// The remote peer reported a failure for this call. Never retried
    /// automatically; the caller decides.
    #[error("rpc error {code} from {method} (id {id}): {message}")]
    Rpc {
        code: i64,
        message: String,
        method: String,
        id: u64,
    },

    /// A response could not be decoded into the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// No response arrived within the configured deadline.
    #[error("call timed out after {0:?}")]
    Timeout(Duration),
}

impl From<WireError> for ClientError {
    fn from(err: WireError) -> Self {
        ClientError::MalformedResponse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
