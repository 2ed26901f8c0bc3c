//! Newline-delimited JSON-RPC over a byte stream (stdin/stdout in production).
//!
//! Each request line is handled on its own task so slow tools do not block
//! the reader. Responses go through a single writer task and may be written
//! out of order; clients correlate them by `id`.

use std::io;

use anyhow::{Context, Result};
use bytes::BytesMut;
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::codec::{Decoder, FramedRead, FramedWrite, LinesCodec, LinesCodecError};
use tracing::{debug, error, info, warn};

use crate::{
    mcp::{
        handler::handle_mcp_request,
        protocol::{error_codes, Request, Response},
    },
    AppState,
};

/// Longest accepted request line, newline excluded.
pub const MAX_LINE_BYTES: usize = 8 * 1024 * 1024;

/// One framed input line. Undecodable lines are surfaced instead of ending
/// the stream.
#[derive(Debug, PartialEq, Eq)]
pub enum InboundLine {
    Text(String),
    Malformed(String),
}

/// [`LinesCodec`] that turns bad UTF-8 and overlong lines into
/// [`InboundLine::Malformed`]. Only real I/O errors are errors.
pub struct RequestLineCodec {
    inner: LinesCodec,
    max_length: usize,
}

impl RequestLineCodec {
    pub fn new(max_length: usize) -> Self {
        Self {
            inner: LinesCodec::new_with_max_length(max_length),
            max_length,
        }
    }

    fn classify(
        &self,
        decoded: Result<Option<String>, LinesCodecError>,
    ) -> Result<Option<InboundLine>, io::Error> {
        match decoded {
            Ok(line) => Ok(line.map(InboundLine::Text)),
            // The codec has already dropped the offending bytes in both cases.
            Err(LinesCodecError::MaxLineLengthExceeded) => Ok(Some(InboundLine::Malformed(
                format!("line exceeds {} bytes", self.max_length),
            ))),
            Err(LinesCodecError::Io(e)) if e.kind() == io::ErrorKind::InvalidData => {
                Ok(Some(InboundLine::Malformed("line is not valid UTF-8".to_string())))
            }
            Err(LinesCodecError::Io(e)) => Err(e),
        }
    }
}

impl Decoder for RequestLineCodec {
    type Item = InboundLine;
    type Error = io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<InboundLine>, io::Error> {
        let decoded = self.inner.decode(buf);
        self.classify(decoded)
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<InboundLine>, io::Error> {
        let decoded = self.inner.decode_eof(buf);
        self.classify(decoded)
    }
}

fn parse_error(detail: impl std::fmt::Display) -> Response {
    Response::error(
        Value::Null,
        error_codes::PARSE_ERROR,
        format!("Parse error: {}", detail),
    )
}

/// Turns one input line into at most one response.
pub async fn process_line(line: &str, state: AppState) -> Option<Response> {
    let value: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => {
            error!("JSON parse error: {}", e);
            return Some(parse_error(e));
        }
    };

    let id = value.get("id").cloned().unwrap_or(Value::Null);
    match serde_json::from_value::<Request>(value) {
        Ok(request) => handle_mcp_request(request, state).await,
        Err(e) => {
            warn!("Invalid JSON-RPC request: {}", e);
            Some(Response::error_with_data(
                id,
                error_codes::INVALID_REQUEST,
                "Invalid Request".into(),
                json!({ "details": e.to_string() }),
            ))
        }
    }
}

fn send(tx: &mpsc::UnboundedSender<String>, response: &Response) {
    match serde_json::to_string(response) {
        Ok(json) => {
            if tx.send(json).is_err() {
                warn!("Response dropped: writer has stopped");
            }
        }
        Err(e) => error!("Failed to serialize response: {}", e),
    }
}

/// Serves requests from `reader` until EOF, writing responses to `writer`.
pub async fn serve<R, W>(reader: R, writer: W, state: AppState) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    serve_with_max_line(reader, writer, state, MAX_LINE_BYTES).await
}

/// [`serve`] with an explicit request line limit.
///
/// Returns once every in-flight request has been answered. Malformed lines
/// are answered with a parse error and reading continues; a read error ends
/// the loop and is returned to the caller.
pub async fn serve_with_max_line<R, W>(
    reader: R,
    writer: W,
    state: AppState,
    max_line_bytes: usize,
) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let mut lines = FramedRead::new(reader, RequestLineCodec::new(max_line_bytes));
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let writer_task = tokio::spawn(async move {
        let mut sink = FramedWrite::new(writer, LinesCodec::new());
        while let Some(line) = rx.recv().await {
            debug!("Sending: {}", line);
            sink.send(line)
                .await
                .context("Failed to write response")?;
        }
        Ok::<(), anyhow::Error>(())
    });

    let mut read_error = None;
    while let Some(next) = lines.next().await {
        let line = match next {
            Ok(InboundLine::Text(line)) => line,
            Ok(InboundLine::Malformed(reason)) => {
                warn!("Rejected input line: {}", reason);
                send(&tx, &parse_error(reason));
                continue;
            }
            Err(e) => {
                error!("Failed to read request: {}", e);
                read_error = Some(e);
                break;
            }
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        debug!("Received: {}", line);

        let tx = tx.clone();
        let state = state.clone();
        tokio::spawn(async move {
            if let Some(response) = process_line(&line, state).await {
                send(&tx, &response);
            }
        });
    }
    info!("Input closed, waiting for in-flight requests");

    // The writer drains once every request task has dropped its sender.
    drop(tx);
    writer_task.await.context("Writer task panicked")??;

    match read_error {
        Some(e) => Err(e).context("Failed to read from input"),
        None => Ok(()),
    }
}
