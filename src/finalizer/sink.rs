//! Output sinks: where a finalized response is written.

use std::io::{self, ErrorKind, Write};
use tracing::debug;

/// Destination of one logical response.
///
/// The sink owns the "headers already sent" flag, so a response emitted a
/// second time for the same request does not repeat its status line and
/// headers.
pub trait OutputSink {
    fn write_status_line(&mut self, version: &str, status: u16, reason: &str) -> io::Result<()>;

    /// One header line. Multi-valued headers call this once per value.
    fn write_header(&mut self, name: &str, value: &str) -> io::Result<()>;

    /// Terminates the header block and marks the headers as sent.
    fn end_headers(&mut self) -> io::Result<()>;

    fn write_body_chunk(&mut self, chunk: &[u8]) -> io::Result<()>;

    /// Whether the client is still there to receive bytes.
    fn is_connected(&self) -> bool;

    fn headers_sent(&self) -> bool;
}

/// In-memory sink that records everything written to it.
#[derive(Debug, Clone)]
pub struct BufferSink {
    status_lines: Vec<String>,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    chunks: Vec<usize>,
    headers_sent: bool,
    connected: bool,
    disconnect_after: Option<usize>,
}

impl Default for BufferSink {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferSink {
    #[must_use]
    pub fn new() -> Self {
        Self {
            status_lines: Vec::new(),
            headers: Vec::new(),
            body: Vec::new(),
            chunks: Vec::new(),
            headers_sent: false,
            connected: true,
            disconnect_after: None,
        }
    }

    /// Simulate a client that goes away once `chunks` body chunks arrived.
    #[must_use]
    pub fn disconnect_after_chunks(mut self, chunks: usize) -> Self {
        self.disconnect_after = Some(chunks);
        self.connected = chunks > 0;
        self
    }

    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    /// The first status line written, e.g. `HTTP/1.1 200 OK`.
    #[must_use]
    pub fn status_line(&self) -> Option<&str> {
        self.status_lines.first().map(String::as_str)
    }

    /// How many status lines were written. At most one when emission is
    /// idempotent.
    #[must_use]
    pub fn status_lines_written(&self) -> usize {
        self.status_lines.len()
    }

    /// Header lines in write order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Values written for `name`, compared case-insensitively.
    #[must_use]
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Size of each body chunk received.
    #[must_use]
    pub fn chunk_sizes(&self) -> &[usize] {
        &self.chunks
    }
}

impl OutputSink for BufferSink {
    fn write_status_line(&mut self, version: &str, status: u16, reason: &str) -> io::Result<()> {
        self.status_lines
            .push(format!("HTTP/{version} {status} {reason}").trim_end().to_string());
        Ok(())
    }

    fn write_header(&mut self, name: &str, value: &str) -> io::Result<()> {
        self.headers.push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn end_headers(&mut self) -> io::Result<()> {
        self.headers_sent = true;
        Ok(())
    }

    fn write_body_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.body.extend_from_slice(chunk);
        self.chunks.push(chunk.len());
        if self.disconnect_after.is_some_and(|k| self.chunks.len() >= k) {
            self.connected = false;
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn headers_sent(&self) -> bool {
        self.headers_sent
    }
}

/// Writes raw HTTP/1.x to any [`Write`], typically a socket.
///
/// A peer that hung up (broken pipe, reset, abort) marks the sink
/// disconnected instead of producing an error; later writes are dropped.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
    headers_sent: bool,
    connected: bool,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            headers_sent: false,
            connected: true,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        if !self.connected {
            return Ok(());
        }
        match self.writer.write_all(bytes) {
            Ok(()) => Ok(()),
            Err(e) if is_disconnect(&e) => {
                debug!(error = %e, "Peer disconnected");
                self.connected = false;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.connected {
            return Ok(());
        }
        match self.writer.flush() {
            Err(e) if is_disconnect(&e) => {
                self.connected = false;
                Ok(())
            }
            other => other,
        }
    }
}

impl<W: Write> OutputSink for WriterSink<W> {
    fn write_status_line(&mut self, version: &str, status: u16, reason: &str) -> io::Result<()> {
        let line = format!("HTTP/{version} {status} {reason}");
        self.write_raw(line.trim_end().as_bytes())?;
        self.write_raw(b"\r\n")
    }

    fn write_header(&mut self, name: &str, value: &str) -> io::Result<()> {
        self.write_raw(format!("{name}: {value}\r\n").as_bytes())
    }

    fn end_headers(&mut self) -> io::Result<()> {
        self.headers_sent = true;
        self.write_raw(b"\r\n")?;
        self.flush()
    }

    fn write_body_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.write_raw(chunk)?;
        self.flush()
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn headers_sent(&self) -> bool {
        self.headers_sent
    }
}

fn is_disconnect(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        ErrorKind::BrokenPipe | ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted
    )
}
