use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, WireError};

/// Protocol version tag carried by every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// A JSON-RPC 2.0 request envelope.
///
/// Wire form:
/// ```json
/// {"jsonrpc":"2.0","method":"set_speed","params":{"percent":50},"id":1}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub jsonrpc: String,
    pub method: String,
    pub params: Map<String, Value>,
    pub id: u64,
}

impl Request {
    /// Create a request envelope for the given method, parameters and id.
    pub fn new(method: impl Into<String>, params: Map<String, Value>, id: u64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }
}

/// The error object of a failed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
}

/// A decoded JSON-RPC 2.0 response envelope.
///
/// Exactly one of result or error per envelope: an `error` key marks the
/// failure form, otherwise the `result` value applies (absent decodes as
/// JSON null, matching servers that omit it for void methods).
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub id: u64,
    pub outcome: std::result::Result<Value, ErrorObject>,
}

/// Encode a request envelope into a single text frame.
pub fn encode_request(request: &Request) -> Result<String> {
    Ok(serde_json::to_string(request)?)
}

/// Decode a text frame into a response envelope.
///
/// Fails with [`WireError::Malformed`] if the frame is not a JSON object,
/// lacks a non-negative integer `id`, or carries an unusable `error` object.
pub fn decode_response(frame: &str) -> Result<Response> {
    let value: Value = serde_json::from_str(frame)?;
    let Value::Object(map) = value else {
        return Err(WireError::Malformed("frame is not a JSON object".into()));
    };

    let id = map
        .get("id")
        .and_then(Value::as_u64)
        .ok_or_else(|| WireError::Malformed("missing or non-integer id".into()))?;

    if let Some(error) = map.get("error") {
        let error: ErrorObject = serde_json::from_value(error.clone())
            .map_err(|err| WireError::Malformed(format!("bad error object: {err}")))?;
        return Ok(Response {
            id,
            outcome: Err(error),
        });
    }

    let result = map.get("result").cloned().unwrap_or(Value::Null);
    Ok(Response {
        id,
        outcome: Ok(result),
    })
}

/// Encode a response envelope into a single text frame.
///
/// Mainly useful for tests and in-process peers; the production client only
/// decodes responses.
pub fn encode_response(response: &Response) -> Result<String> {
    let mut map = Map::new();
    map.insert("id".into(), Value::from(response.id));
    match &response.outcome {
        Ok(result) => {
            map.insert("result".into(), result.clone());
        }
        Err(error) => {
            map.insert("error".into(), serde_json::to_value(error)?);
        }
    }
    Ok(serde_json::to_string(&Value::Object(map))?)
}
