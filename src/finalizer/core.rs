use super::sink::OutputSink;
use crate::http::Response;
use std::io::{self, ErrorKind, Read};
use tracing::{debug, warn};

/// Body chunk size used unless configured otherwise.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// What one call to [`ResponseFinalizer::emit`] wrote.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EmitReport {
    /// Status line and headers were written by this call.
    pub headers_written: bool,
    pub bytes_written: u64,
    pub chunks: usize,
    /// The sink disconnected before the body was complete.
    pub aborted: bool,
}

/// Prepares responses for the wire and writes them to an [`OutputSink`].
#[derive(Debug, Clone, Copy)]
pub struct ResponseFinalizer {
    chunk_size: usize,
}

impl Default for ResponseFinalizer {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ResponseFinalizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `chunk_size` bytes per body chunk; zero falls back to the default.
    #[must_use]
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: if chunk_size == 0 {
                DEFAULT_CHUNK_SIZE
            } else {
                chunk_size
            },
        }
    }

    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Apply the header rules.
    ///
    /// `204`, `205` and `304` lose `Content-Type` and `Content-Length`.
    /// Otherwise a body of known size sets `Content-Length`, replacing any
    /// value the handler wrote.
    #[must_use]
    pub fn finalize(&self, response: Response) -> Response {
        if response.is_empty_status() {
            return response
                .without_header("Content-Type")
                .without_header("Content-Length");
        }
        match response.body().size() {
            Some(size) => response.with_header("Content-Length", size.to_string()),
            None => response,
        }
    }

    /// Write `response` to `sink`.
    ///
    /// The status line and headers are skipped when the sink has already
    /// sent them. The body is read from its start (when the stream can seek)
    /// in chunks, and emission stops quietly as soon as the sink reports a
    /// disconnect.
    pub fn emit(&self, response: &Response, sink: &mut dyn OutputSink) -> io::Result<EmitReport> {
        let mut report = EmitReport::default();

        if sink.headers_sent() {
            debug!(status = response.status(), "Headers already sent - skipping");
        } else {
            sink.write_status_line(
                response.protocol_version(),
                response.status(),
                response.reason_phrase(),
            )?;
            for (name, values) in response.headers().iter() {
                for value in values {
                    sink.write_header(name, value)?;
                }
            }
            sink.end_headers()?;
            report.headers_written = true;
        }

        if response.is_empty_status() {
            return Ok(report);
        }

        let mut reader = response.body().reader()?;
        let mut buf = vec![0u8; self.chunk_size];
        loop {
            if !sink.is_connected() {
                report.aborted = true;
                warn!(
                    status = response.status(),
                    bytes_written = report.bytes_written,
                    chunks = report.chunks,
                    "Client disconnected - body emission aborted"
                );
                break;
            }
            let n = fill_chunk(&mut reader, &mut buf)?;
            if n == 0 {
                break;
            }
            sink.write_body_chunk(&buf[..n])?;
            report.chunks += 1;
            report.bytes_written += n as u64;
            if n < buf.len() {
                break;
            }
        }

        debug!(
            status = response.status(),
            bytes_written = report.bytes_written,
            chunks = report.chunks,
            "Response emitted"
        );
        Ok(report)
    }

    /// [`finalize`](Self::finalize) then [`emit`](Self::emit). Returns the
    /// finalized response.
    pub fn send(&self, response: Response, sink: &mut dyn OutputSink) -> io::Result<Response> {
        let response = self.finalize(response);
        self.emit(&response, sink)?;
        Ok(response)
    }
}

/// Read until `buf` is full or the reader is exhausted.
fn fill_chunk(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
