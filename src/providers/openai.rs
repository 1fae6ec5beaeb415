//! OpenAI provider implementation for Waypoint
//!
//! This module implements the Provider trait for the OpenAI
//! chat-completions API. Requests are sent with `stream: true` and the
//! `text/event-stream` response body is parsed into text fragments that
//! are forwarded as they arrive.

use crate::config::ProviderConfig;
use crate::credentials::Credential;
use crate::error::{Result, WaypointError};
use crate::providers::{ChatMessage, CompletionStream, Provider};

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// OpenAI chat-completions provider
///
/// Holds the HTTP client, provider configuration, and the API
/// credential for the lifetime of the session. One request is
/// outstanding at a time; there is no retry policy, and a failed call
/// simply ends that turn attempt.
///
/// # Examples
///
/// ```no_run
/// use waypoint::config::ProviderConfig;
/// use waypoint::credentials::Credential;
/// use waypoint::providers::{ChatMessage, OpenAiProvider, Provider};
///
/// # async fn example() -> waypoint::error::Result<()> {
/// let config = ProviderConfig::default();
/// let credential = Credential::new("sk-test").unwrap();
/// let provider = OpenAiProvider::new(config, credential)?;
/// let messages = vec![ChatMessage::user("오사카 맛집 추천")];
/// let stream = provider.stream_chat(&messages).await?;
/// # Ok(())
/// # }
/// ```
pub struct OpenAiProvider {
    client: Client,
    config: ProviderConfig,
    credential: Credential,
}

/// Request body for the chat-completions endpoint
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

/// One SSE chunk of a streamed chat completion
#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

/// A single choice within a streamed chunk
#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

/// Incremental content delta within a chunk choice
#[derive(Debug, Deserialize, Default)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiProvider {
    /// Creates a new OpenAI provider
    ///
    /// # Arguments
    ///
    /// * `config` - Provider configuration (model, API base, timeouts)
    /// * `credential` - API key held for the session's lifetime
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed
    pub fn new(config: ProviderConfig, credential: Credential) -> Result<Self> {
        // Connect timeout only: a total request timeout would cut off
        // long streamed replies.
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()
            .map_err(WaypointError::Http)?;

        Ok(Self {
            client,
            config,
            credential,
        })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn stream_chat(&self, messages: &[ChatMessage]) -> Result<CompletionStream> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            stream: true,
        };

        tracing::debug!(
            model = %self.config.model,
            message_count = messages.len(),
            "Sending streaming chat completion request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.credential.expose())
            .header("Accept", "text/event-stream")
            .json(&request)
            .send()
            .await
            .map_err(WaypointError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    WaypointError::Authentication(format!("HTTP {}: {}", status, body))
                }
                _ => WaypointError::Provider(format!("HTTP {}: {}", status, body)),
            };
            return Err(error.into());
        }

        let byte_stream = response.bytes_stream();
        let (fragment_tx, fragment_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            parse_completion_stream(byte_stream, fragment_tx).await;
        });

        Ok(Box::pin(UnboundedReceiverStream::new(fragment_rx)))
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

/// Parse an SSE byte stream and forward content fragments to `fragment_tx`.
///
/// Intended to run inside a `tokio::spawn`; consumes the stream until the
/// service sends `data: [DONE]`, closes the connection, or errors.
///
/// Buffering is done on raw bytes rather than text because network chunk
/// boundaries can split multi-byte UTF-8 sequences (Korean replies hit
/// this constantly). SSE event boundaries are ASCII blank lines, so each
/// extracted event block is always valid UTF-8.
async fn parse_completion_stream(
    byte_stream: impl Stream<Item = reqwest::Result<Bytes>>,
    fragment_tx: mpsc::UnboundedSender<Result<String>>,
) {
    // Buffer accumulates raw bytes between blank-line boundaries.
    let mut buffer: Vec<u8> = Vec::new();

    tokio::pin!(byte_stream);

    while let Some(chunk_result) = byte_stream.next().await {
        let chunk = match chunk_result {
            Ok(c) => c,
            Err(e) => {
                let _ = fragment_tx.send(Err(WaypointError::Stream(format!(
                    "connection lost mid-stream: {}",
                    e
                ))
                .into()));
                return;
            }
        };

        buffer.extend_from_slice(&chunk);

        // SSE events are separated by blank lines, `\n\n` or `\r\n\r\n`.
        while let Some((pos, separator_len)) = find_event_boundary(&buffer) {
            let event_bytes: Vec<u8> = buffer.drain(..pos + separator_len).collect();
            let event_block = String::from_utf8_lossy(&event_bytes[..pos]);
            if process_sse_event(&event_block, &fragment_tx) {
                return;
            }
        }
    }

    // Process any remaining partial event in the buffer.
    if !buffer.is_empty() {
        let event_block = String::from_utf8_lossy(&buffer);
        process_sse_event(&event_block, &fragment_tx);
    }
}

/// Find the next blank-line event separator
///
/// Servers and proxies emit either LF (`\n\n`) or CRLF (`\r\n\r\n`)
/// delimiters. Returns the separator's byte offset and length.
fn find_event_boundary(buffer: &[u8]) -> Option<(usize, usize)> {
    for i in 0..buffer.len() {
        if buffer[i..].starts_with(b"\r\n\r\n") {
            return Some((i, 4));
        }
        if buffer[i..].starts_with(b"\n\n") {
            return Some((i, 2));
        }
    }
    None
}

/// Process a single SSE event block (the text between two `\n\n` delimiters).
///
/// Returns true when the stream is finished (`data: [DONE]` seen or the
/// receiver side was dropped) and no further events should be processed.
fn process_sse_event(event_block: &str, fragment_tx: &mpsc::UnboundedSender<Result<String>>) -> bool {
    for line in event_block.lines() {
        let Some(value) = line.strip_prefix("data:") else {
            // `event:`/`id:`/comment lines carry nothing we consume.
            continue;
        };

        let data = value.trim();
        if data == "[DONE]" {
            return true;
        }
        if data.is_empty() {
            continue;
        }

        match serde_json::from_str::<ChatCompletionChunk>(data) {
            Ok(chunk) => {
                let content = chunk
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.delta.content);
                if let Some(fragment) = content {
                    if !fragment.is_empty() && fragment_tx.send(Ok(fragment)).is_err() {
                        return true;
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Skipping malformed stream chunk: {}", e);
            }
        }
    }

    false
}
