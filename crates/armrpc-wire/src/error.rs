/// Errors that can occur encoding or decoding JSON-RPC envelopes.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The frame was valid JSON but not a usable envelope.
    #[error("malformed envelope: {0}")]
    Malformed(String),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WireError>;
