use std::fmt;

use armrpc_client::ClientError;

// Exit code conventions: sysexits-style usage/data codes, 124 for timeouts.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn client_error(context: &str, err: ClientError) -> CliError {
    let code = match err {
        ClientError::Connection(_) => TRANSPORT_ERROR,
        ClientError::Disconnected => FAILURE,
        ClientError::Rpc { .. } => FAILURE,
        ClientError::MalformedResponse(_) => DATA_INVALID,
        ClientError::Timeout(_) => TIMEOUT,
    };
    CliError::new(code, format!("{context}: {err}"))
}
