//! HTTP gateway to the puzzle generator.

use std::collections::VecDeque;
use std::time::Duration;

use reqwest::header::ACCEPT;
use thiserror::Error;
use tracing::{debug, info};
use wordboard_core::{PlaybackError, ProtocolError, PuzzleSnapshot, StreamEvent, StreamItem, TransportError};

use crate::protocol::{parse_event, ParsedEvent, PuzzleDto};
use crate::sse::{SseDecoder, SseFrame};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_STREAM_BUFFER: usize = 256;

pub const GENERATE_PATH: &str = "/api/puzzle/generate";
pub const GENERATE_ANIMATED_PATH: &str = "/api/puzzle/generate-animated";
pub const CURRENT_PATH: &str = "/api/puzzle/current";
pub const HEALTH_PATH: &str = "/health";

/// Gateway configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub base_url: String,
    /// Applies to plain requests and to connecting a stream, not to reading it
    pub request_timeout_ms: u64,
    /// Capacity of the channel between the stream task and the controller
    pub stream_buffer: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            stream_buffer: DEFAULT_STREAM_BUFFER,
        }
    }
}

impl GatewayConfig {
    /// Load from environment variables. Missing or invalid values fall back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let base_url = std::env::var("WORDBOARD_SERVER_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.base_url);
        let request_timeout_ms = std::env::var("WORDBOARD_REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(defaults.request_timeout_ms);
        let stream_buffer = std::env::var("WORDBOARD_STREAM_BUFFER")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(defaults.stream_buffer);
        Self {
            base_url,
            request_timeout_ms,
            stream_buffer,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generator responded with HTTP {0}")]
    Status(u16),

    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("event stream ended before generation completed")]
    ClosedEarly,

    #[error("no response within {0}ms")]
    Timeout(u64),

    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

impl GatewayError {
    /// Transport view of an error raised while opening a stream
    pub fn into_transport(self) -> TransportError {
        match self {
            GatewayError::Status(code) => TransportError::Status(code),
            GatewayError::ClosedEarly => TransportError::ClosedEarly,
            other => TransportError::Open(other.to_string()),
        }
    }
}

impl From<GatewayError> for PlaybackError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Http(e) => TransportError::Interrupted(e.to_string()).into(),
            GatewayError::Status(code) => TransportError::Status(code).into(),
            GatewayError::Json(e) => ProtocolError::malformed("response", e.to_string()).into(),
            GatewayError::Protocol(p) => p.into(),
            GatewayError::ClosedEarly => TransportError::ClosedEarly.into(),
            GatewayError::Timeout(ms) => TransportError::Timeout { idle_ms: ms }.into(),
            GatewayError::Runtime(e) => TransportError::Open(e.to_string()).into(),
        }
    }
}

/// Async client for the generator endpoints
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.config.request_timeout_ms)
    }

    async fn fetch_puzzle(&self, request: reqwest::RequestBuilder) -> Result<PuzzleSnapshot, GatewayError> {
        let response = request.timeout(self.request_timeout()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        let dto: PuzzleDto = serde_json::from_str(&body)?;
        Ok(dto.into_snapshot()?)
    }

    /// `POST /api/puzzle/generate`
    pub async fn generate_plain(&self) -> Result<PuzzleSnapshot, GatewayError> {
        let url = self.config.url(GENERATE_PATH);
        debug!(%url, "requesting puzzle");
        self.fetch_puzzle(self.client.post(url)).await
    }

    /// `GET /api/puzzle/current`
    pub async fn current(&self) -> Result<PuzzleSnapshot, GatewayError> {
        self.fetch_puzzle(self.client.get(self.config.url(CURRENT_PATH))).await
    }

    /// `GET /health`, returning the body text
    pub async fn health(&self) -> Result<String, GatewayError> {
        let response = self
            .client
            .get(self.config.url(HEALTH_PATH))
            .timeout(self.request_timeout())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }

    /// `GET /api/puzzle/generate-animated` as an event stream
    pub async fn open_animated(&self) -> Result<SseEventStream, GatewayError> {
        let url = self.config.url(GENERATE_ANIMATED_PATH);
        // the timeout bounds connecting and headers only; the body is read by chunk()
        let response = tokio::time::timeout(
            self.request_timeout(),
            self.client.get(&url).header(ACCEPT, "text/event-stream").send(),
        )
        .await
        .map_err(|_| GatewayError::Timeout(self.config.request_timeout_ms))??;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }
        info!(%url, "event stream open");
        Ok(SseEventStream::new(response))
    }
}

/// An open animated generation response, decoded into stream items
#[derive(Debug)]
pub struct SseEventStream {
    response: reqwest::Response,
    decoder: SseDecoder,
    pending: VecDeque<SseFrame>,
    completed: bool,
    finished: bool,
}

impl SseEventStream {
    fn new(response: reqwest::Response) -> Self {
        Self {
            response,
            decoder: SseDecoder::new(),
            pending: VecDeque::new(),
            completed: false,
            finished: false,
        }
    }

    /// Next item, or `None` once the body is exhausted.
    ///
    /// A body that ends before `generation_complete` yields
    /// [`TransportError::ClosedEarly`] once.
    pub async fn next_item(&mut self) -> Option<StreamItem> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                debug!(event = %frame.event, bytes = frame.data.len(), "frame");
                match parse_event(&frame.event, &frame.data) {
                    Ok(ParsedEvent::Event(event)) => {
                        if matches!(event, StreamEvent::GenerationComplete(_)) {
                            self.completed = true;
                        }
                        return Some(StreamItem::Event(event));
                    }
                    Ok(ParsedEvent::Unknown(name)) => {
                        debug!(%name, "ignoring unknown event");
                        continue;
                    }
                    Err(err) => return Some(StreamItem::Malformed(err)),
                }
            }
            if self.finished {
                return None;
            }
            match self.response.chunk().await {
                Ok(Some(bytes)) => match self.decoder.feed(&bytes) {
                    Ok(frames) => self.pending.extend(frames),
                    Err(err) => {
                        self.finished = true;
                        return Some(StreamItem::Failed(TransportError::Interrupted(err.to_string())));
                    }
                },
                Ok(None) => {
                    self.finished = true;
                    if !self.completed {
                        return Some(StreamItem::Failed(TransportError::ClosedEarly));
                    }
                }
                Err(err) => {
                    self.finished = true;
                    return Some(StreamItem::Failed(TransportError::Interrupted(err.to_string())));
                }
            }
        }
    }
}
