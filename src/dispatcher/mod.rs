//! # Dispatcher Module
//!
//! The dispatcher turns a [`Request`](crate::http::Request) into a
//! [`Response`](crate::http::Response). It is a short linear state machine
//! that runs once per request and keeps nothing between requests.
//!
//! ## Request Flow
//!
//! 1. The [`PathResolver`](crate::router::PathResolver) resolves the path
//!    into a [`DispatchContext`](crate::router::DispatchContext), and the
//!    request's HTTP method supplies the method suffix
//! 2. A route bound to a callback is invoked directly; otherwise the
//!    [`ControllerRegistry`](crate::controller::ControllerRegistry) builds
//!    the controller from the request and a fresh `200` response
//! 3. The controller's pre-action hook runs, if it has one
//! 4. The action method (`hiGet`, `indexPost`, ...) is looked up and called
//!    with the positional parameters
//! 5. A returned response is used as-is; returned text becomes the body of a
//!    fresh `200` response
//!
//! ## Error Handling
//!
//! Every failure converges on one error response: status `404`,
//! `Content-Type: text/html`, and a body holding the error message in debug
//! mode or `Not Found` otherwise. Panics in actions are caught and treated as
//! failures.
//!
//! The one exception is an early exit ([`ActionError::EarlyExit`]), used for
//! redirects and halts: its response is delivered verbatim, whatever its
//! status.
//!
//! [`ActionError::EarlyExit`]: crate::controller::ActionError::EarlyExit

mod core;
mod error;

pub use core::{Dispatcher, ERROR_STATUS, GENERIC_NOT_FOUND};
pub use error::DispatchError;
