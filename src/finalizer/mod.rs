//! # Finalizer Module
//!
//! The last step of a request: apply the header rules to a response and
//! write it to an [`OutputSink`].
//!
//! ## Rules
//!
//! - `204`, `205` and `304` responses lose `Content-Type` and
//!   `Content-Length` and never emit body bytes
//! - any other response with a body of known size gets exactly one
//!   `Content-Length`
//! - the status line and headers are written once per sink; a sink that has
//!   already sent them only receives body bytes
//! - the body is streamed in fixed-size chunks (1024 bytes by default) and
//!   emission stops without an error once the client disconnects
//!
//! ## Example
//!
//! ```rust
//! use brrtmvc::finalizer::{BufferSink, ResponseFinalizer};
//! use brrtmvc::http::Response;
//!
//! let finalizer = ResponseFinalizer::new();
//! let mut sink = BufferSink::new();
//! finalizer.send(Response::html("hello"), &mut sink).unwrap();
//!
//! assert_eq!(sink.status_line(), Some("HTTP/1.1 200 OK"));
//! assert_eq!(sink.header_values("Content-Length"), vec!["5"]);
//! assert_eq!(sink.body(), b"hello");
//! ```

mod core;
mod sink;

pub use core::{EmitReport, ResponseFinalizer, DEFAULT_CHUNK_SIZE};
pub use sink::{BufferSink, OutputSink, WriterSink};
