//! Route table core - ordered regular-expression routes.
//!
//! Routes are tried in registration order and the first usable match wins.
//! Patterns are stored as given and compiled on first use, anchored at both
//! ends; a pattern that fails to compile is logged once and never matches.

use crate::controller::ActionResult;
use crate::http::Request;
use once_cell::sync::OnceCell;
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Closure bound directly to a route instead of a controller action.
///
/// Receives the request and the captured path parameters.
pub type Callback = Arc<dyn Fn(&Request, &[String]) -> ActionResult + Send + Sync>;

/// What a route dispatches to.
#[derive(Clone)]
pub enum HandlerRef {
    /// A controller name and an action name.
    ///
    /// Either name may be empty when the handler was built from an incomplete
    /// list of parts; such a handler is skipped during matching.
    Action { controller: String, action: String },
    /// A closure invoked with the captured parameters.
    Callback(Callback),
}

impl HandlerRef {
    pub fn action(controller: impl Into<String>, action: impl Into<String>) -> Self {
        HandlerRef::Action {
            controller: controller.into(),
            action: action.into(),
        }
    }

    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&Request, &[String]) -> ActionResult + Send + Sync + 'static,
    {
        HandlerRef::Callback(Arc::new(f))
    }

    /// Build from a `[controller, action]` list. Missing entries become empty
    /// names, which makes the handler malformed.
    pub fn from_parts<S: AsRef<str>>(parts: &[S]) -> Self {
        let part = |i: usize| {
            parts
                .get(i)
                .map(|s| s.as_ref().to_string())
                .unwrap_or_default()
        };
        HandlerRef::action(part(0), part(1))
    }

    /// A callback, or a controller/action pair with both names present.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        match self {
            HandlerRef::Action { controller, action } => {
                !controller.is_empty() && !action.is_empty()
            }
            HandlerRef::Callback(_) => true,
        }
    }
}

impl fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerRef::Action { controller, action } => f
                .debug_struct("Action")
                .field("controller", controller)
                .field("action", action)
                .finish(),
            HandlerRef::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl From<(&str, &str)> for HandlerRef {
    fn from((controller, action): (&str, &str)) -> Self {
        HandlerRef::action(controller, action)
    }
}

impl From<&[&str]> for HandlerRef {
    fn from(parts: &[&str]) -> Self {
        HandlerRef::from_parts(parts)
    }
}

impl<const N: usize> From<[&str; N]> for HandlerRef {
    fn from(parts: [&str; N]) -> Self {
        HandlerRef::from_parts(&parts)
    }
}

impl From<Vec<String>> for HandlerRef {
    fn from(parts: Vec<String>) -> Self {
        HandlerRef::from_parts(&parts)
    }
}

/// A registered pattern and the handler it is bound to.
#[derive(Clone)]
pub struct Route {
    pattern: String,
    handler: HandlerRef,
    compiled: OnceCell<Option<Regex>>,
}

impl Route {
    fn new(pattern: String, handler: HandlerRef) -> Self {
        Self {
            pattern,
            handler,
            compiled: OnceCell::new(),
        }
    }

    /// The pattern as registered, unanchored.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn handler(&self) -> &HandlerRef {
        &self.handler
    }

    fn regex(&self) -> Option<&Regex> {
        self.compiled
            .get_or_init(|| match Regex::new(&format!("^(?:{})$", self.pattern)) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!(
                        pattern = %self.pattern,
                        error = %e,
                        "Route pattern failed to compile - treated as non-matching"
                    );
                    None
                }
            })
            .as_ref()
    }

    /// Captured groups (excluding the whole match) when the full path matches.
    ///
    /// Groups that did not participate in the match are returned as empty
    /// strings so positions stay stable.
    fn captures(&self, path: &str) -> Option<Vec<String>> {
        let caps = self.regex()?.captures(path)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect(),
        )
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern)
            .field("handler", &self.handler)
            .finish()
    }
}

/// Result of matching a path against the route table.
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    /// Pattern of the winning route.
    pub pattern: &'a str,
    /// Always well-formed.
    pub handler: &'a HandlerRef,
    /// Captured groups in capture order.
    pub params: Vec<String>,
}

/// Ordered list of routes. Insertion order is match precedence.
#[derive(Clone, Default, Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route. Duplicate and shadowing patterns are legal.
    pub fn add_route(&mut self, pattern: impl Into<String>, handler: impl Into<HandlerRef>) {
        self.routes.push(Route::new(pattern.into(), handler.into()));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// First route whose pattern matches all of `path` and whose handler is
    /// well-formed.
    ///
    /// A matching route with a malformed handler does not stop the search.
    #[must_use]
    pub fn match_first(&self, path: &str) -> Option<RouteMatch<'_>> {
        let start = Instant::now();
        for (idx, route) in self.routes.iter().enumerate() {
            let Some(params) = route.captures(path) else {
                continue;
            };
            if !route.handler.is_well_formed() {
                warn!(
                    path = %path,
                    pattern = %route.pattern,
                    route_index = idx,
                    handler = ?route.handler,
                    "Matched route has a malformed handler - skipping"
                );
                continue;
            }

            let elapsed = start.elapsed();
            if elapsed > Duration::from_millis(1) {
                warn!(
                    path = %path,
                    pattern = %route.pattern,
                    duration_us = elapsed.as_micros(),
                    "Slow route matching detected"
                );
            }
            debug!(
                path = %path,
                pattern = %route.pattern,
                route_index = idx,
                params = ?params,
                "Route matched"
            );
            return Some(RouteMatch {
                pattern: &route.pattern,
                handler: &route.handler,
                params,
            });
        }

        debug!(
            path = %path,
            routes_count = self.routes.len(),
            duration_us = start.elapsed().as_micros(),
            "No route matched"
        );
        None
    }
}
