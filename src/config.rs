//! # Configuration Module
//!
//! Application settings come from a YAML file, then environment variables.
//!
//! ```yaml
//! debug: false
//! http_version: "1.1"
//! controller_namespace: "app::controllers::"
//! default_controller: index
//! default_action: index
//! chunk_size: 1024
//! routes:
//!   - pattern: '/hi/(\w+)'
//!     controller: Index
//!     action: hi
//! ```
//!
//! Every key is optional. After the file is read, these variables override
//! it:
//!
//! - `BRRTMVC_DEBUG`: `true`/`false` (`1`/`0` also accepted)
//! - `BRRTMVC_HTTP_VERSION`: protocol version of generated responses
//! - `BRRTMVC_CONTROLLER_NAMESPACE`: controller identifier prefix

use crate::controller::DEFAULT_NAMESPACE;
use crate::finalizer::DEFAULT_CHUNK_SIZE;
use crate::router::{HandlerRef, RouteTable, DEFAULT_ACTION, DEFAULT_CONTROLLER};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::warn;

/// One route entry in the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub pattern: String,
    #[serde(default)]
    pub controller: String,
    #[serde(default)]
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Put error messages in `404` bodies instead of `Not Found`.
    pub debug: bool,
    pub http_version: String,
    pub controller_namespace: String,
    pub default_controller: String,
    pub default_action: String,
    pub chunk_size: usize,
    pub routes: Vec<RouteConfig>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            debug: true,
            http_version: "1.1".to_string(),
            controller_namespace: DEFAULT_NAMESPACE.to_string(),
            default_controller: DEFAULT_CONTROLLER.to_string(),
            default_action: DEFAULT_ACTION.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            routes: Vec::new(),
        }
    }
}

impl AppSettings {
    /// Read `path`, then apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut settings = Self::from_file(path)?;
        settings.apply_overrides(|key| env::var(key).ok());
        Ok(settings)
    }

    /// Read `path` without environment overrides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::from_yaml(&text)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("Invalid settings YAML")
    }

    /// Apply `BRRTMVC_*` overrides from `lookup`. Unparsable values are
    /// logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup("BRRTMVC_DEBUG") {
            match parse_bool(&raw) {
                Some(debug) => self.debug = debug,
                None => warn!(value = %raw, "Ignoring invalid BRRTMVC_DEBUG"),
            }
        }
        if let Some(version) = lookup("BRRTMVC_HTTP_VERSION").filter(|v| !v.trim().is_empty()) {
            self.http_version = version.trim().to_string();
        }
        if let Some(ns) = lookup("BRRTMVC_CONTROLLER_NAMESPACE") {
            self.controller_namespace = ns;
        }
    }

    /// Route table described by `routes`, in file order.
    ///
    /// Entries missing a controller or an action are kept; the table skips
    /// them when they match.
    #[must_use]
    pub fn route_table(&self) -> RouteTable {
        let mut table = RouteTable::new();
        for route in &self.routes {
            table.add_route(
                route.pattern.as_str(),
                HandlerRef::action(route.controller.as_str(), route.action.as_str()),
            );
        }
        table
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
