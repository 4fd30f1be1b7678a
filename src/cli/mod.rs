//! # CLI Module
//!
//! Command-line access to a settings file.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! List the routes in match order:
//!
//! ```bash
//! brrtmvc routes --config app.yaml
//! ```
//!
//! ### `resolve`
//!
//! Show the controller, action, method name and parameters a path resolves to:
//!
//! ```bash
//! brrtmvc resolve --config app.yaml --method POST /index/hello
//! ```
//!
//! ### `serve`
//!
//! Serve the routes with the echo controller, which answers `index` and
//! `show` with a JSON description of the request:
//!
//! ```bash
//! brrtmvc serve --config app.yaml --addr 127.0.0.1:8080 --watch
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{describe_resolution, describe_routes, run_cli, Cli, Commands};
