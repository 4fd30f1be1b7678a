//! # HTTP Values
//!
//! Transport-independent request and response values used by the router,
//! the dispatcher and the finalizer.
//!
//! - [`Request`] - method, path, query, headers and body of an inbound request
//! - [`Response`] - status, ordered multi-valued [`Headers`] and a [`Body`]
//! - [`Body`] - fully buffered bytes or a lazily read [`BodyStream`]
//!
//! Responses have value semantics: `with_status`, `with_header`, `with_body`
//! and friends consume the response and hand back the modified copy.
//!
//! ```rust
//! use brrtmvc::http::Response;
//!
//! let resp = Response::default()
//!     .with_status(302)
//!     .with_header("Location", "/index");
//! assert!(resp.is_redirect());
//! ```

mod body;
mod headers;
mod request;
mod response;

pub use body::{Body, BodyStream, SharedStream};
pub use headers::{HeaderValues, Headers, MAX_INLINE_HEADERS};
pub use request::Request;
pub use response::{Response, DEFAULT_CONTENT_TYPE, EMPTY_BODY_STATUSES};
