use super::error::DispatchError;
use crate::container::Container;
use crate::controller::{ActionError, ActionOutput, ActionResult, Controller, ControllerRegistry};
use crate::http::{Request, Response, DEFAULT_CONTENT_TYPE};
use crate::ids::{RequestId, REQUEST_ID_HEADER};
use crate::router::{DispatchContext, HandlerRef, PathResolver};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn};

/// Body of error responses outside debug mode.
pub const GENERIC_NOT_FOUND: &str = "Not Found";

/// Status of every error response.
pub const ERROR_STATUS: u16 = 404;

const CALLBACK_ID: &str = "<callback>";

/// Runs one request through resolution, controller lookup and the action.
///
/// Holds no per-request state: every call resolves a fresh
/// [`DispatchContext`] and builds a new controller, so one dispatcher can
/// serve concurrent requests.
pub struct Dispatcher {
    resolver: PathResolver,
    controllers: ControllerRegistry,
    debug: bool,
    http_version: String,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(PathResolver::default(), ControllerRegistry::new())
    }
}

impl Dispatcher {
    #[must_use]
    pub fn new(resolver: PathResolver, controllers: ControllerRegistry) -> Self {
        Self {
            resolver,
            controllers,
            debug: true,
            http_version: "1.1".to_string(),
        }
    }

    #[must_use]
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut PathResolver {
        &mut self.resolver
    }

    #[must_use]
    pub fn controllers(&self) -> &ControllerRegistry {
        &self.controllers
    }

    pub fn controllers_mut(&mut self) -> &mut ControllerRegistry {
        &mut self.controllers
    }

    /// In debug mode error responses carry the error message.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    #[must_use]
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Protocol version of the responses this dispatcher creates.
    pub fn set_http_version(&mut self, version: impl Into<String>) {
        self.http_version = version.into();
    }

    #[must_use]
    pub fn http_version(&self) -> &str {
        &self.http_version
    }

    pub fn add_route(&self, pattern: impl Into<String>, handler: impl Into<HandlerRef>) {
        self.resolver.add_route(pattern, handler);
    }

    pub fn set_default_controller(&mut self, name: &str) -> Result<(), DispatchError> {
        self.resolver.set_default_controller(name)
    }

    pub fn set_default_action(&mut self, name: &str) -> Result<(), DispatchError> {
        self.resolver.set_default_action(name)
    }

    pub fn set_controller_namespace(&mut self, namespace: &str) -> Result<(), DispatchError> {
        self.controllers.set_namespace(namespace)
    }

    pub fn register<C: Controller>(&mut self, name: &str) {
        self.controllers.register::<C>(name);
    }

    pub fn set_container(&mut self, container: Weak<Container>) {
        self.controllers.set_container(container);
    }

    /// `200`, `Content-Type: text/html`, empty body.
    #[must_use]
    pub fn fresh_response(&self) -> Response {
        Response::default().with_protocol_version(self.http_version.as_str())
    }

    /// Dispatch `request` and always produce a response.
    ///
    /// Early exits yield their carried response; every other failure becomes
    /// a `404`.
    pub fn dispatch(&self, request: &Request) -> Response {
        let request_id = RequestId::from_header_or_new(request.header(REQUEST_ID_HEADER));
        let span = info_span!(
            "dispatch",
            request_id = %request_id,
            method = %request.method(),
            path = %request.path()
        );
        let _entered = span.enter();
        let start = Instant::now();

        let response = match self.try_dispatch(request) {
            Ok(response) => response,
            Err(DispatchError::HandlerRaised { response }) => {
                debug!(status = response.status(), "Early exit response");
                *response
            }
            Err(err) => {
                match &err {
                    DispatchError::ActionFailed { .. } => {
                        error!(kind = err.kind(), error = %err, "Dispatch failed");
                    }
                    _ => warn!(kind = err.kind(), error = %err, "Dispatch failed"),
                }
                self.error_response(&err)
            }
        };

        info!(
            status = response.status(),
            duration_us = start.elapsed().as_micros(),
            "Dispatch complete"
        );
        response
    }

    /// Dispatch without the error mapping. An early exit is returned as
    /// [`DispatchError::HandlerRaised`].
    pub fn try_dispatch(&self, request: &Request) -> Result<Response, DispatchError> {
        let ctx = self
            .resolver
            .resolve(request.path())
            .with_method(request.method());

        if let Some(callback) = ctx.callback() {
            debug!(params = ?ctx.params, "Invoking route callback");
            let callback = Arc::clone(callback);
            let outcome = guarded(|| callback(request, &ctx.params));
            return self.normalize(outcome, CALLBACK_ID, &ctx.action_method());
        }

        let mut instance = contain(|| {
            self.controllers
                .instantiate(&ctx.controller, request, self.fresh_response())
        })
        .map_err(|message| DispatchError::ActionFailed {
            controller: self.controllers.qualify(&ctx.controller),
            action: "construct".to_string(),
            reason: format!("panicked: {message}"),
        })??;
        let controller_id = instance.id().to_string();

        guarded(|| match instance.run_before_action_hook(&ctx) {
            Some(result) => result.map(|()| ActionOutput::Nothing),
            None => Ok(ActionOutput::Nothing),
        })
        .map_err(|e| action_error(&controller_id, "beforeActionHook", e))?;

        let bound =
            ControllerRegistry::resolve_action(instance.as_mut(), &ctx.action, request.method())?;
        let method_name = bound.method_name().to_string();
        debug!(
            controller = %controller_id,
            action = %method_name,
            params = ?ctx.params,
            "Invoking action"
        );
        let outcome = guarded(|| bound.call(&ctx.params));
        self.normalize(outcome, &controller_id, &method_name)
    }

    /// The `404` response for `err`.
    #[must_use]
    pub fn error_response(&self, err: &DispatchError) -> Response {
        let body = if self.debug {
            err.to_string()
        } else {
            GENERIC_NOT_FOUND.to_string()
        };
        Response::new(ERROR_STATUS)
            .with_protocol_version(self.http_version.as_str())
            .with_header("Content-Type", DEFAULT_CONTENT_TYPE)
            .with_body(body)
    }

    /// Resolve `path` the way a request would be, for inspection.
    #[must_use]
    pub fn resolve(&self, path: &str, http_method: &str) -> DispatchContext {
        self.resolver.resolve(path).with_method(http_method)
    }

    fn normalize(
        &self,
        outcome: ActionResult,
        controller: &str,
        action: &str,
    ) -> Result<Response, DispatchError> {
        match outcome {
            Ok(ActionOutput::Response(response)) => Ok(response),
            Ok(ActionOutput::Text(body)) => Ok(self.fresh_response().with_body(body)),
            Ok(ActionOutput::Nothing) => Err(DispatchError::InvalidResponse {
                reason: format!("{controller}::{action} must return a response or a string"),
            }),
            Err(e) => Err(action_error(controller, action, e)),
        }
    }
}

fn action_error(controller: &str, action: &str, e: ActionError) -> DispatchError {
    match e {
        ActionError::EarlyExit(response) => DispatchError::HandlerRaised {
            response: Box::new(response),
        },
        ActionError::Failed(e) => DispatchError::ActionFailed {
            controller: controller.to_string(),
            action: action.to_string(),
            reason: format!("{e:#}"),
        },
    }
}

/// Run user code, turning a panic into a failure.
fn guarded(f: impl FnOnce() -> ActionResult) -> ActionResult {
    contain(f).unwrap_or_else(|message| Err(ActionError::msg(format!("panicked: {message}"))))
}

/// Run user code, returning the panic message if it panicked.
fn contain<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|panic| {
        let message = panic_message(panic.as_ref());
        error!(panic_message = %message, "User code panicked");
        message
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
