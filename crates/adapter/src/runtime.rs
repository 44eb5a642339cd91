//! Adapter runtime integration.
//!
//! Bridges the sync playback loop with the async HTTP gateway. Streams are
//! read by a tokio task and forwarded over a bounded channel that the
//! controller polls through [`EventStream`].

use std::sync::Arc;

use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::JoinHandle;
use tracing::debug;
use wordboard_core::{EventStream, PuzzleSnapshot, StreamEvent, StreamItem, TransportError};

use crate::gateway::{GatewayConfig, GatewayError, HttpGateway};

/// Running gateway instance.
#[derive(Debug)]
pub struct GatewayRuntime {
    rt: Runtime,
    gateway: Arc<HttpGateway>,
}

impl GatewayRuntime {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let gateway = HttpGateway::new(config)?;
        Ok(Self {
            rt: Runtime::new()?,
            gateway: Arc::new(gateway),
        })
    }

    /// Start from environment variables.
    pub fn start_from_env() -> Result<Self, GatewayError> {
        Self::new(GatewayConfig::from_env())
    }

    pub fn config(&self) -> &GatewayConfig {
        self.gateway.config()
    }

    pub fn generate_plain_blocking(&self) -> Result<PuzzleSnapshot, GatewayError> {
        self.rt.block_on(self.gateway.generate_plain())
    }

    pub fn current_blocking(&self) -> Result<PuzzleSnapshot, GatewayError> {
        self.rt.block_on(self.gateway.current())
    }

    pub fn health_blocking(&self) -> Result<String, GatewayError> {
        self.rt.block_on(self.gateway.health())
    }

    /// Open the animated stream in the background.
    ///
    /// Returns immediately; a failure to connect arrives as the first item.
    pub fn open_stream(&self) -> ChannelStream {
        let (tx, rx) = mpsc::channel(self.config().stream_buffer.max(1));
        let gateway = Arc::clone(&self.gateway);
        let task = self.rt.spawn(forward_stream(gateway, tx));
        ChannelStream {
            rx,
            task: Some(task),
            terminal_seen: false,
            closed: false,
        }
    }
}

fn is_terminal(item: &StreamItem) -> bool {
    match item {
        StreamItem::Event(event) => matches!(event, StreamEvent::GenerationComplete(_)),
        StreamItem::Malformed(err) => !err.is_skippable(),
        StreamItem::Failed(_) => true,
    }
}

async fn forward_stream(gateway: Arc<HttpGateway>, tx: mpsc::Sender<StreamItem>) {
    let mut stream = match gateway.open_animated().await {
        Ok(stream) => stream,
        Err(err) => {
            let _ = tx.send(StreamItem::Failed(err.into_transport())).await;
            return;
        }
    };
    while let Some(item) = stream.next_item().await {
        let terminal = is_terminal(&item);
        if tx.send(item).await.is_err() {
            debug!("stream receiver dropped");
            return;
        }
        if terminal {
            return;
        }
    }
}

/// Receiving end of a forwarded stream.
#[derive(Debug)]
pub struct ChannelStream {
    rx: mpsc::Receiver<StreamItem>,
    task: Option<JoinHandle<()>>,
    terminal_seen: bool,
    closed: bool,
}

impl EventStream for ChannelStream {
    fn try_next(&mut self) -> Option<StreamItem> {
        if self.closed {
            return None;
        }
        match self.rx.try_recv() {
            Ok(item) => {
                self.terminal_seen |= is_terminal(&item);
                Some(item)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) if self.terminal_seen => None,
            Err(TryRecvError::Disconnected) => {
                // the task ended without saying why
                self.terminal_seen = true;
                Some(StreamItem::Failed(TransportError::Interrupted(
                    "stream task stopped".to_string(),
                )))
            }
        }
    }

    fn close(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.rx.close();
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for ChannelStream {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
