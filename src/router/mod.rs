//! # Router Module
//!
//! The router turns a request path into a [`DispatchContext`]: the controller
//! name, the action name and the positional parameters for one request.
//!
//! ## Overview
//!
//! Resolution happens in two tiers:
//!
//! 1. **Route table**: registered regular-expression patterns, tried in
//!    registration order. Each pattern must match the whole path; its capture
//!    groups become the parameters. A matching route whose handler is
//!    malformed (for example an action name is missing) is skipped and the
//!    search continues.
//! 2. **Positional convention**: when no route matches, the path is split on
//!    `/` into `controller/action/param/param/...`.
//!
//! An empty path (`""` or `"/"`) always resolves to the configured defaults,
//! `index`/`index` unless changed.
//!
//! ## Example
//!
//! ```rust
//! use brrtmvc::router::{HandlerRef, PathResolver, RouteTable};
//!
//! let mut table = RouteTable::new();
//! table.add_route(r"/hi/(\w+)", HandlerRef::action("Index", "hi"));
//! let resolver = PathResolver::new(table);
//!
//! let ctx = resolver.resolve("/hi/Joe").with_method("GET");
//! assert_eq!(ctx.controller, "Index");
//! assert_eq!(ctx.params, vec!["Joe".to_string()]);
//! assert_eq!(ctx.action_method(), "hiGet");
//!
//! let ctx = resolver.resolve("/blog/show/7");
//! assert_eq!((ctx.controller.as_str(), ctx.action.as_str()), ("blog", "show"));
//! ```
//!
//! ## Concurrency
//!
//! The route table is read-mostly. [`PathResolver`] keeps it behind an
//! `ArcSwap`, so each resolution works on one immutable snapshot and
//! registration at runtime publishes a new snapshot instead of mutating the
//! one being read.

mod core;
pub mod naming;
mod resolver;
#[cfg(test)]
mod tests;

pub use core::{Callback, HandlerRef, Route, RouteMatch, RouteTable};
pub use naming::{action_method_name, method_suffix, normalize_controller_name};
pub use resolver::{DispatchContext, PathResolver, DEFAULT_ACTION, DEFAULT_CONTROLLER};
pub(crate) use resolver::{validate_name, validate_prefix};
