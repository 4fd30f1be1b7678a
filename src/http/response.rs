use super::{Body, Headers};

/// Content type applied to fresh responses and forced on error responses.
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

/// Status codes that must never carry a body.
pub const EMPTY_BODY_STATUSES: [u16; 3] = [204, 205, 304];

/// HTTP response value.
///
/// Every mutation is a `with_*` transformation that consumes the value and
/// returns the modified copy, so an early-exit response captured by a
/// controller cannot be altered behind the dispatcher's back.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    protocol_version: String,
    headers: Headers,
    body: Body,
}

impl Default for Response {
    /// `200 OK` with `Content-Type: text/html` over HTTP/1.1.
    fn default() -> Self {
        let mut headers = Headers::new();
        headers.set("Content-Type", DEFAULT_CONTENT_TYPE);
        Self {
            status: 200,
            protocol_version: "1.1".to_string(),
            headers,
            body: Body::Empty,
        }
    }
}

impl Response {
    /// A response with the given status and no headers.
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            protocol_version: "1.1".to_string(),
            headers: Headers::new(),
            body: Body::Empty,
        }
    }

    /// `200 OK`, `text/html`, with `body`.
    #[must_use]
    pub fn html(body: impl Into<Body>) -> Self {
        Self::default().with_body(body)
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_protocol_version(mut self, version: impl Into<String>) -> Self {
        self.protocol_version = version.into();
        self
    }

    /// Replace all values of `name`.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Append a value to `name`, keeping existing values.
    #[must_use]
    pub fn with_added_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    #[must_use]
    pub fn without_header(mut self, name: &str) -> Self {
        self.headers.remove(name);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Canonical reason phrase for the status code, empty when unknown.
    #[must_use]
    pub fn reason_phrase(&self) -> &'static str {
        ::http::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("")
    }

    #[must_use]
    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get_first(name)
    }

    #[must_use]
    pub fn header_line(&self, name: &str) -> Option<String> {
        self.headers.get_line(name)
    }

    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// True for 204, 205 and 304.
    #[must_use]
    pub fn is_empty_status(&self) -> bool {
        EMPTY_BODY_STATUSES.contains(&self.status)
    }

    /// True for 3xx responses that carry a `Location`.
    #[must_use]
    pub fn is_redirect(&self) -> bool {
        matches!(self.status, 301 | 302 | 303 | 307 | 308) && self.headers.contains("Location")
    }
}
