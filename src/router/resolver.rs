//! Path resolution: route table first, positional convention second.

use super::core::{Callback, HandlerRef, RouteTable};
use super::naming::method_suffix;
use crate::dispatcher::DispatchError;
use arc_swap::ArcSwap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Controller used when the path names none.
pub const DEFAULT_CONTROLLER: &str = "index";
/// Action used when the path names none.
pub const DEFAULT_ACTION: &str = "index";

const SEPARATOR: char = '/';

/// Resolved target of one request.
///
/// Created fresh by [`PathResolver::resolve`] for every dispatch and threaded
/// through the rest of the pipeline; never stored on a shared object.
#[derive(Clone, PartialEq, Eq)]
pub struct DispatchContext {
    /// Controller name as written in the route or path (not yet normalized).
    pub controller: String,
    /// Action name as written in the route or path.
    pub action: String,
    /// Positional parameters, possibly empty.
    pub params: Vec<String>,
    /// Capitalized HTTP verb, empty until [`DispatchContext::with_method`] runs.
    pub method_suffix: String,
    callback: Option<CallbackSlot>,
}

/// Wrapper so contexts stay comparable; callbacks compare by identity.
#[derive(Clone)]
struct CallbackSlot(Callback);

impl PartialEq for CallbackSlot {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for CallbackSlot {}

impl DispatchContext {
    #[must_use]
    pub fn new(
        controller: impl Into<String>,
        action: impl Into<String>,
        params: Vec<String>,
    ) -> Self {
        Self {
            controller: controller.into(),
            action: action.into(),
            params,
            method_suffix: String::new(),
            callback: None,
        }
    }

    /// Derive the method suffix from the request's HTTP verb.
    #[must_use]
    pub fn with_method(mut self, http_method: &str) -> Self {
        self.method_suffix = method_suffix(http_method);
        self
    }

    /// Name of the method to invoke: lower-cased action plus method suffix.
    #[must_use]
    pub fn action_method(&self) -> String {
        let mut name = self.action.to_lowercase();
        name.push_str(&self.method_suffix);
        name
    }

    /// Closure bound by the matched route, when the route was not a
    /// controller/action pair.
    #[must_use]
    pub fn callback(&self) -> Option<&Callback> {
        self.callback.as_ref().map(|slot| &slot.0)
    }
}

impl fmt::Debug for DispatchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchContext")
            .field("controller", &self.controller)
            .field("action", &self.action)
            .field("params", &self.params)
            .field("method_suffix", &self.method_suffix)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// Turns request paths into [`DispatchContext`]s.
///
/// The route table sits behind an [`ArcSwap`]: every resolution reads one
/// immutable snapshot, and registration publishes a new one, so the order a
/// request observes never changes under it.
pub struct PathResolver {
    routes: Arc<ArcSwap<RouteTable>>,
    default_controller: String,
    default_action: String,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new(RouteTable::new())
    }
}

impl PathResolver {
    #[must_use]
    pub fn new(routes: RouteTable) -> Self {
        Self {
            routes: Arc::new(ArcSwap::from_pointee(routes)),
            default_controller: DEFAULT_CONTROLLER.to_string(),
            default_action: DEFAULT_ACTION.to_string(),
        }
    }

    /// Append a route by publishing a new table snapshot.
    pub fn add_route(&self, pattern: impl Into<String>, handler: impl Into<HandlerRef>) {
        let pattern = pattern.into();
        let handler = handler.into();
        self.routes.rcu(|current| {
            let mut next = RouteTable::clone(current);
            next.add_route(pattern.clone(), handler.clone());
            next
        });
    }

    /// Replace the whole route table.
    pub fn replace_routes(&self, routes: RouteTable) {
        self.routes.store(Arc::new(routes));
    }

    /// Current snapshot of the route table.
    #[must_use]
    pub fn routes(&self) -> Arc<RouteTable> {
        self.routes.load_full()
    }

    /// Shared handle used by the hot reloader to publish new tables.
    #[must_use]
    pub fn routes_handle(&self) -> Arc<ArcSwap<RouteTable>> {
        Arc::clone(&self.routes)
    }

    #[must_use]
    pub fn default_controller(&self) -> &str {
        &self.default_controller
    }

    #[must_use]
    pub fn default_action(&self) -> &str {
        &self.default_action
    }

    /// Controller used for empty paths.
    pub fn set_default_controller(&mut self, name: &str) -> Result<(), DispatchError> {
        self.default_controller = validate_name("controller", name)?;
        Ok(())
    }

    /// Action used for empty paths and for paths naming only a controller.
    pub fn set_default_action(&mut self, name: &str) -> Result<(), DispatchError> {
        self.default_action = validate_name("action", name)?;
        Ok(())
    }

    /// Resolve `path` to a controller, an action and positional parameters.
    ///
    /// 1. A path that is empty once separators are trimmed yields the defaults.
    /// 2. Otherwise the first matching route supplies the handler and the
    ///    captured groups.
    /// 3. Otherwise the trimmed path is split on `/`: controller, then
    ///    action, then parameters.
    #[must_use]
    pub fn resolve(&self, path: &str) -> DispatchContext {
        let trimmed = path.trim_matches(SEPARATOR);
        if trimmed.is_empty() {
            return self.defaults(Vec::new());
        }

        let table = self.routes.load();
        if let Some(hit) = table.match_first(path) {
            return match hit.handler {
                HandlerRef::Action { controller, action } => {
                    DispatchContext::new(controller.as_str(), action.as_str(), hit.params)
                }
                HandlerRef::Callback(callback) => {
                    let mut ctx = self.defaults(hit.params);
                    ctx.callback = Some(CallbackSlot(Arc::clone(callback)));
                    ctx
                }
            };
        }

        let ctx = self.parse_segments(trimmed);
        debug!(
            path = %path,
            controller = %ctx.controller,
            action = %ctx.action,
            params = ?ctx.params,
            "Resolved by positional convention"
        );
        ctx
    }

    fn defaults(&self, params: Vec<String>) -> DispatchContext {
        DispatchContext::new(
            self.default_controller.as_str(),
            self.default_action.as_str(),
            params,
        )
    }

    fn parse_segments(&self, trimmed: &str) -> DispatchContext {
        let mut segments = trimmed.split(SEPARATOR);
        let mut ctx = self.defaults(Vec::new());
        if let Some(controller) = segments.next().filter(|s| !s.is_empty()) {
            ctx.controller = controller.to_string();
        }
        if let Some(action) = segments.next() {
            if !action.is_empty() {
                ctx.action = action.to_string();
            }
        }
        ctx.params = segments.map(str::to_string).collect();
        ctx
    }
}

/// Names must be non-empty and free of path separators.
pub(crate) fn validate_name(kind: &str, name: &str) -> Result<String, DispatchError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DispatchError::InvalidArgument {
            reason: format!("{kind} name must be a non-empty string"),
        });
    }
    reject_separator(kind, name)?;
    Ok(name.to_string())
}

/// Like [`validate_name`], but an empty prefix is allowed.
pub(crate) fn validate_prefix(kind: &str, prefix: &str) -> Result<String, DispatchError> {
    let prefix = prefix.trim();
    reject_separator(kind, prefix)?;
    Ok(prefix.to_string())
}

fn reject_separator(kind: &str, name: &str) -> Result<(), DispatchError> {
    if name.contains(SEPARATOR) {
        return Err(DispatchError::InvalidArgument {
            reason: format!("{kind} name must not contain '{SEPARATOR}', got {name:?}"),
        });
    }
    Ok(())
}
