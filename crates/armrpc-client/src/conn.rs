//! Connection manager: owns the single WebSocket link to the robot server.
//!
//! Exactly two tasks touch the stream while a connection is open: a writer
//! task draining an outbound queue (so concurrent callers never interleave
//! partial frames) and a receive loop resolving pending calls by id. State
//! transitions are explicit — closed → opening → open — and happen under
//! one async mutex, so no caller ever observes a half-open connection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::pending::PendingCalls;
use crate::socket::{self, WsStream};

/// Outbound queue depth. Senders back-pressure when the writer falls behind.
const OUTBOUND_QUEUE: usize = 64;

/// One live connection: the writer queue plus the generation that owns it.
struct Link {
    tx: mpsc::Sender<Message>,
    generation: u64,
    reader: JoinHandle<()>,
}

struct Shared {
    config: ClientConfig,
    pending: PendingCalls,
    link: Mutex<Option<Link>>,
    /// Distinguishes a stale receive loop from the connection that replaced it.
    next_generation: AtomicU64,
}

#[derive(Clone)]
pub(crate) struct ConnectionManager {
    shared: Arc<Shared>,
}

impl ConnectionManager {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                pending: PendingCalls::new(),
                link: Mutex::new(None),
                next_generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.shared.config
    }

    pub fn pending(&self) -> &PendingCalls {
        &self.shared.pending
    }

    /// Establish the connection. Idempotent when already open.
    ///
    /// Holding the state mutex across the dial serializes concurrent
    /// openers; the losers find the link present and return.
    pub async fn open(&self) -> Result<()> {
        let mut link = self.shared.link.lock().await;
        if link.is_none() {
            *link = Some(self.establish().await?);
        }
        Ok(())
    }

    /// Close the connection and fail every pending call.
    /// No-op when already closed.
    pub async fn close(&self) {
        let mut link = self.shared.link.lock().await;
        if let Some(link) = link.take() {
            link.reader.abort();
            // Dropping the queue sender ends the writer task, which sends
            // the WebSocket close frame on its way out.
            drop(link.tx);
            self.shared.pending.abandon_all(ClientError::Disconnected);
            tracing::info!("disconnected");
        }
    }

    /// Whether a connection is currently open.
    pub async fn is_open(&self) -> bool {
        self.shared.link.lock().await.is_some()
    }

    /// Enqueue one encoded frame for the writer task.
    pub async fn send(&self, frame: String) -> Result<()> {
        let tx = {
            let link = self.shared.link.lock().await;
            match link.as_ref() {
                Some(link) => link.tx.clone(),
                None => return Err(ClientError::Disconnected),
            }
        };
        // The queue closes when the writer dies mid-send.
        tx.send(Message::Text(frame))
            .await
            .map_err(|_| ClientError::Disconnected)
    }

    async fn establish(&self) -> Result<Link> {
        let url = self.shared.config.url();
        let stream = socket::connect(&url).await?;
        tracing::info!(%url, "connected");

        let (sink, source) = stream.split();
        let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE);
        let generation = self.shared.next_generation.fetch_add(1, Ordering::Relaxed);

        tokio::spawn(write_loop(sink, rx));
        let manager = self.clone();
        let reader = tokio::spawn(async move {
            manager.receive_loop(source, generation).await;
        });

        Ok(Link {
            tx,
            generation,
            reader,
        })
    }

    /// Sole reader for the connection's stream. Runs until the peer closes,
    /// the transport errors, or `close()` aborts it.
    async fn receive_loop(&self, mut source: SplitStream<WsStream>, generation: u64) {
        while let Some(message) = source.next().await {
            match message {
                Ok(Message::Text(frame)) => self.dispatch_frame(&frame),
                Ok(Message::Close(_)) => {
                    tracing::info!("server closed the connection");
                    break;
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
                Ok(other) => {
                    tracing::warn!(len = other.len(), "unexpected non-text frame dropped");
                }
                Err(err) => {
                    tracing::warn!(%err, "read failed");
                    break;
                }
            }
        }
        self.mark_closed(generation).await;
    }

    /// Called by a receive loop that observed transport close or error.
    /// Only tears down its own generation: a reconnect may already have
    /// replaced the link it was reading from.
    async fn mark_closed(&self, generation: u64) {
        let mut link = self.shared.link.lock().await;
        let owns_link = matches!(
            link.as_ref(),
            Some(current) if current.generation == generation
        );
        if owns_link {
            *link = None;
            self.shared.pending.abandon_all(ClientError::Disconnected);
            tracing::info!("connection lost, pending calls abandoned");
        }
    }

    /// Route one inbound text frame to its waiting caller.
    ///
    /// Undecodable frames are protocol anomalies: logged and skipped so the
    /// loop keeps servicing the other pending ids.
    fn dispatch_frame(&self, frame: &str) {
        match armrpc_wire::decode_response(frame) {
            Ok(response) => self.shared.pending.resolve(response.id, response.outcome),
            Err(err) => tracing::warn!(%err, "undecodable frame skipped"),
        }
    }
}

/// Sole writer for the connection's sink.
async fn write_loop(mut sink: SplitSink<WsStream, Message>, mut rx: mpsc::Receiver<Message>) {
    while let Some(message) = rx.recv().await {
        if let Err(err) = sink.send(message).await {
            tracing::debug!(%err, "write failed, stopping writer");
            return;
        }
    }
    let _ = sink.close().await;
}
