use super::Headers;
use std::collections::HashMap;

/// Inbound request as seen by the dispatcher.
///
/// The method is normalized to upper case on construction so that `get`, `Get`
/// and `GET` all dispatch identically. The target is split into `path` and
/// `query` the same way the transport would.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: String,
    path: String,
    query: Option<String>,
    protocol_version: String,
    headers: Headers,
    body: Vec<u8>,
}

impl Request {
    /// Build a request from a method and a request target (`/path?query`).
    pub fn new(method: impl AsRef<str>, target: impl AsRef<str>) -> Self {
        let target = target.as_ref();
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (target, None),
        };
        let path = if path.is_empty() { "/" } else { path };
        Self {
            method: method.as_ref().trim().to_ascii_uppercase(),
            path: path.to_string(),
            query,
            protocol_version: "1.1".to_string(),
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    #[must_use]
    pub fn get(target: impl AsRef<str>) -> Self {
        Self::new("GET", target)
    }

    #[must_use]
    pub fn post(target: impl AsRef<str>) -> Self {
        Self::new("POST", target)
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn with_protocol_version(mut self, version: impl Into<String>) -> Self {
        self.protocol_version = version.into();
        self
    }

    /// Upper-cased HTTP method.
    #[inline]
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request path without the query string.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
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
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Decoded query string parameters. Later duplicates win.
    #[must_use]
    pub fn query_params(&self) -> HashMap<String, String> {
        self.query
            .as_deref()
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// A single decoded query parameter.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.query_params().remove(name)
    }
}
