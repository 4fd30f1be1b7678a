//! The application: settings, container, dispatcher and finalizer wired
//! together.
//!
//! ```rust
//! use brrtmvc::app::App;
//! use brrtmvc::controller::{ActionResult, ActionTable, Controller};
//! use brrtmvc::finalizer::BufferSink;
//! use brrtmvc::http::{Request, Response};
//!
//! struct Index;
//!
//! impl Index {
//!     fn hi_get(&mut self, params: &[String]) -> ActionResult {
//!         Ok(format!("Hi {}", params[0]).into())
//!     }
//! }
//!
//! impl Controller for Index {
//!     fn construct(_request: &Request, _response: Response) -> Self {
//!         Index
//!     }
//!     fn actions() -> ActionTable<Self> {
//!         ActionTable::new().get("hi", Self::hi_get)
//!     }
//! }
//!
//! let mut app = App::new();
//! app.register_controller::<Index>("index");
//! app.add_route(r"/hi/(\w+)", ("Index", "hi"));
//!
//! let mut sink = BufferSink::new();
//! let response = app.run(&Request::get("/hi/Joe"), &mut sink).unwrap();
//! assert_eq!(response.status(), 200);
//! assert_eq!(sink.body(), b"Hi Joe");
//! ```

use crate::config::AppSettings;
use crate::container::Container;
use crate::controller::Controller;
use crate::dispatcher::{DispatchError, Dispatcher};
use crate::finalizer::{OutputSink, ResponseFinalizer};
use crate::http::{Request, Response};
use crate::router::{HandlerRef, PathResolver, RouteTable};
use arc_swap::ArcSwap;
use std::io;
use std::sync::Arc;
use tracing::info;

pub struct App {
    settings: AppSettings,
    container: Arc<Container>,
    dispatcher: Dispatcher,
    finalizer: ResponseFinalizer,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// An application with default settings and no routes.
    #[must_use]
    pub fn new() -> Self {
        let settings = AppSettings::default();
        let container = Arc::new(Container::new());
        let mut dispatcher = Dispatcher::default();
        dispatcher.set_container(Arc::downgrade(&container));
        Self {
            finalizer: ResponseFinalizer::with_chunk_size(settings.chunk_size),
            settings,
            container,
            dispatcher,
        }
    }

    /// Build from settings, registering the configured routes.
    ///
    /// Fails when a default name or the namespace is invalid.
    pub fn from_settings(settings: AppSettings) -> Result<Self, DispatchError> {
        let container = Arc::new(Container::new());
        let mut dispatcher = Dispatcher::new(
            PathResolver::new(settings.route_table()),
            Default::default(),
        );
        dispatcher.set_debug(settings.debug);
        dispatcher.set_http_version(settings.http_version.as_str());
        dispatcher.set_default_controller(&settings.default_controller)?;
        dispatcher.set_default_action(&settings.default_action)?;
        dispatcher.set_controller_namespace(&settings.controller_namespace)?;
        dispatcher.set_container(Arc::downgrade(&container));

        info!(
            routes = settings.routes.len(),
            debug = settings.debug,
            namespace = %settings.controller_namespace,
            "Application configured"
        );
        Ok(Self {
            finalizer: ResponseFinalizer::with_chunk_size(settings.chunk_size),
            settings,
            container,
            dispatcher,
        })
    }

    #[must_use]
    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// The service container shared with container-aware controllers.
    #[must_use]
    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    #[must_use]
    pub fn finalizer(&self) -> &ResponseFinalizer {
        &self.finalizer
    }

    pub fn add_route(&self, pattern: impl Into<String>, handler: impl Into<HandlerRef>) {
        self.dispatcher.add_route(pattern, handler);
    }

    /// Handle used to swap in a new route table, e.g. on settings reload.
    #[must_use]
    pub fn routes_handle(&self) -> Arc<ArcSwap<RouteTable>> {
        self.dispatcher.resolver().routes_handle()
    }

    /// Register `C` under `name` in the current controller namespace.
    pub fn register_controller<C: Controller>(&mut self, name: &str) {
        self.dispatcher.register::<C>(name);
    }

    pub fn set_default_controller(&mut self, name: &str) -> Result<(), DispatchError> {
        self.dispatcher.set_default_controller(name)?;
        self.settings.default_controller = self.dispatcher.resolver().default_controller().into();
        Ok(())
    }

    pub fn set_default_action(&mut self, name: &str) -> Result<(), DispatchError> {
        self.dispatcher.set_default_action(name)?;
        self.settings.default_action = self.dispatcher.resolver().default_action().into();
        Ok(())
    }

    /// Controllers registered afterwards, and lookups, use the new prefix.
    pub fn set_controller_namespace(&mut self, namespace: &str) -> Result<(), DispatchError> {
        self.dispatcher.set_controller_namespace(namespace)?;
        self.settings.controller_namespace = self.dispatcher.controllers().namespace().into();
        Ok(())
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.settings.debug = debug;
        self.dispatcher.set_debug(debug);
    }

    /// Dispatch and finalize, without writing anything.
    #[must_use]
    pub fn handle(&self, request: &Request) -> Response {
        self.finalizer.finalize(self.dispatcher.dispatch(request))
    }

    /// Dispatch, finalize and emit to `sink`. Returns the emitted response.
    pub fn run(&self, request: &Request, sink: &mut dyn OutputSink) -> io::Result<Response> {
        let response = self.handle(request);
        self.finalizer.emit(&response, sink)?;
        Ok(response)
    }
}
