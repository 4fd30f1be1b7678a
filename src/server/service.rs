use crate::app::App;
use crate::finalizer::OutputSink;
use crate::http::Request;
use may_minihttp::{HttpService, Request as WireRequest, Response as WireResponse};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::io::{self, Read};
use std::sync::Arc;
use tracing::{debug, warn};

/// Distinct header lines cached for reuse.
const INTERNED_HEADER_LIMIT: usize = 10_000;

/// Header lines the transport accepts per response.
const MAX_WIRE_HEADERS: usize = 16;

/// The transport only accepts `&'static str` header lines, so every line is
/// leaked. Lines are cached up to a limit so repeated values share one
/// allocation; past the limit new lines are leaked without being cached and
/// counted.
struct HeaderInterner {
    lines: HashSet<&'static str>,
    limit: usize,
    uncached: usize,
}

impl HeaderInterner {
    fn new(limit: usize) -> Self {
        Self {
            lines: HashSet::new(),
            limit,
            uncached: 0,
        }
    }

    fn intern(&mut self, line: String) -> &'static str {
        if let Some(existing) = self.lines.get(line.as_str()) {
            return *existing;
        }
        let leaked: &'static str = Box::leak(line.into_boxed_str());
        if self.lines.len() < self.limit {
            self.lines.insert(leaked);
            return leaked;
        }
        if self.uncached % self.limit == 0 {
            warn!(
                cached = self.lines.len(),
                uncached = self.uncached + 1,
                "Header line cache full - per-request header values are leaked"
            );
        }
        self.uncached += 1;
        leaked
    }
}

static HEADER_LINES: Lazy<Mutex<HeaderInterner>> =
    Lazy::new(|| Mutex::new(HeaderInterner::new(INTERNED_HEADER_LIMIT)));

fn intern_header_line(line: String) -> &'static str {
    HEADER_LINES.lock().intern(line)
}

/// [`OutputSink`] over a may_minihttp response.
///
/// may_minihttp writes its own `Content-Length` from the buffered body, so
/// that header is not forwarded.
struct WireSink<'a, 'b> {
    res: &'a mut WireResponse<'b>,
    headers_written: usize,
    headers_sent: bool,
}

impl OutputSink for WireSink<'_, '_> {
    fn write_status_line(&mut self, _version: &str, status: u16, _reason: &str) -> io::Result<()> {
        let reason: &'static str = match ::http::StatusCode::from_u16(status) {
            Ok(code) => code.canonical_reason().unwrap_or(""),
            Err(_) => "",
        };
        debug!(status, reason, "Writing status line");
        self.res.status_code(usize::from(status), reason);
        Ok(())
    }

    fn write_header(&mut self, name: &str, value: &str) -> io::Result<()> {
        if name.eq_ignore_ascii_case("content-length") {
            return Ok(());
        }
        if self.headers_written == MAX_WIRE_HEADERS {
            warn!(header = %name, limit = MAX_WIRE_HEADERS, "Too many response headers - dropped");
            return Ok(());
        }
        self.res.header(intern_header_line(format!("{name}: {value}")));
        self.headers_written += 1;
        Ok(())
    }

    fn end_headers(&mut self) -> io::Result<()> {
        self.headers_sent = true;
        Ok(())
    }

    fn write_body_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.res.body_mut().extend_from_slice(chunk);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn headers_sent(&self) -> bool {
        self.headers_sent
    }
}

/// Build a [`Request`] from the transport request.
fn to_request(req: WireRequest) -> io::Result<Request> {
    let version = if req.version() == 0 { "1.0" } else { "1.1" };
    let mut request = Request::new(req.method(), req.path()).with_protocol_version(version);
    for header in req.headers() {
        request = request.with_header(header.name, String::from_utf8_lossy(header.value));
    }
    let mut body = Vec::new();
    req.body().read_to_end(&mut body)?;
    Ok(request.with_body(body))
}

/// may_minihttp service running every request through an [`App`].
#[derive(Clone)]
pub struct AppService {
    app: Arc<App>,
}

impl AppService {
    pub fn new(app: Arc<App>) -> Self {
        Self { app }
    }

    pub fn app(&self) -> &Arc<App> {
        &self.app
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: WireRequest, res: &mut WireResponse) -> io::Result<()> {
        let request = to_request(req)?;
        let mut sink = WireSink {
            res,
            headers_written: 0,
            headers_sent: false,
        };
        self.app.run(&request, &mut sink)?;
        Ok(())
    }
}
