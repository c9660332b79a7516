//! WebSocket transport glue (tokio-tungstenite).

use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::error::{ClientError, Result};

/// The connected stream type the connection manager owns.
pub(crate) type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Dial the server's WebSocket endpoint.
pub(crate) async fn connect(url: &str) -> Result<WsStream> {
    let (stream, _response) = connect_async(url)
        .await
        .map_err(|err| ClientError::Connection(format!("{url}: {err}")))?;
    Ok(stream)
}
