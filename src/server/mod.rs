//! # Server Module
//!
//! Hosts an [`App`](crate::app::App) on `may_minihttp`.
//!
//! Each transport request is converted into a [`Request`](crate::http::Request),
//! dispatched and finalized by the app, and written back through a sink over
//! the transport response. The transport buffers the body and computes
//! `Content-Length` itself, so a finalized `Content-Length` header is not
//! forwarded.
//!
//! Because the body is buffered, the sink always reports the client as
//! connected: chunked emission gives no backpressure here and a disconnect
//! is only noticed by the transport when it writes. At most 16 header lines
//! are sent per response; further headers are dropped with a warning.
//!
//! ```rust,no_run
//! use brrtmvc::app::App;
//! use brrtmvc::server::HttpServer;
//! use std::sync::Arc;
//!
//! let app = Arc::new(App::new());
//! let handle = HttpServer::new(app).start("127.0.0.1:8080")?;
//! handle.wait_ready()?;
//! handle.join().ok();
//! # Ok::<(), std::io::Error>(())
//! ```

mod http_server;
mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use service::AppService;
