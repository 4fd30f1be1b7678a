//! # brrtmvc
//!
//! **brrtmvc** routes HTTP requests to controller actions and turns whatever
//! happens along the way into a well-formed response.
//!
//! ## Overview
//!
//! A request travels through five stages:
//!
//! 1. **[`router`]**: the path is matched against registered regular
//!    expressions in registration order; when none matches it is split into
//!    `controller/action/params...`
//! 2. **[`controller`]**: the controller is looked up by its normalized name
//!    and built for the request; its optional pre-action hook runs
//! 3. **[`dispatcher`]**: the action method `<action><Method>` (`hiGet`,
//!    `indexPost`) is invoked with the positional parameters and its result
//!    normalized; every failure becomes a `404`
//! 4. **[`finalizer`]**: header rules are applied and the response is
//!    streamed to an output sink in bounded chunks
//! 5. **[`server`]**: optionally, all of the above hosted on `may_minihttp`
//!
//! ## Quick Start
//!
//! ```rust
//! use brrtmvc::app::App;
//! use brrtmvc::controller::{ActionResult, ActionTable, Controller, ControllerBase};
//! use brrtmvc::http::{Request, Response};
//!
//! struct Index {
//!     base: ControllerBase,
//! }
//!
//! impl Index {
//!     fn hello_get(&mut self, _params: &[String]) -> ActionResult {
//!         Ok("GET".into())
//!     }
//!
//!     fn hello_post(&mut self, _params: &[String]) -> ActionResult {
//!         Ok(self.base.bind_output("POST").into())
//!     }
//!
//!     fn old_get(&mut self, _params: &[String]) -> ActionResult {
//!         Err(self.base.redirect("/index/hello"))
//!     }
//! }
//!
//! impl Controller for Index {
//!     fn construct(request: &Request, response: Response) -> Self {
//!         Self { base: ControllerBase::new(request, response) }
//!     }
//!
//!     fn actions() -> ActionTable<Self> {
//!         ActionTable::new()
//!             .get("hello", Self::hello_get)
//!             .post("hello", Self::hello_post)
//!             .get("old", Self::old_get)
//!     }
//! }
//!
//! let mut app = App::new();
//! app.register_controller::<Index>("index");
//!
//! assert_eq!(app.handle(&Request::post("/index/hello")).body().to_text().unwrap(), "POST");
//! assert_eq!(app.handle(&Request::get("/index/old")).status(), 302);
//! assert_eq!(app.handle(&Request::get("/nope")).status(), 404);
//! ```
//!
//! ## Configuration
//!
//! [`config::AppSettings`] loads routes and options from YAML with
//! `BRRTMVC_*` environment overrides; [`logging`] configures `tracing` from
//! the environment; [`hot_reload`] swaps the route table when the settings
//! file changes.

pub mod app;
pub mod cli;
pub mod config;
pub mod container;
pub mod controller;
pub mod dispatcher;
pub mod echo;
pub mod finalizer;
pub mod hot_reload;
pub mod http;
pub mod ids;
pub mod logging;
pub mod router;
pub mod server;

pub use app::App;
pub use dispatcher::{DispatchError, Dispatcher};
