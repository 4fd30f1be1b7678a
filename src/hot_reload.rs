//! # Hot Reload Module
//!
//! Watches the settings file and republishes the route table when it
//! changes, without restarting the server.
//!
//! ## Reload Process
//!
//! 1. The filesystem watcher reports a modification or creation
//! 2. The settings file is parsed again
//! 3. A new [`RouteTable`] is built from its `routes` and stored in the
//!    shared [`ArcSwap`]; requests already resolving keep the snapshot they
//!    loaded
//! 4. The caller's hook runs with the new settings
//!
//! A file that fails to parse is logged and ignored; the previous routes
//! stay active. Only routes are reloaded: debug mode, namespace and defaults
//! need a restart.

use crate::config::AppSettings;
use crate::router::RouteTable;
use anyhow::Result;
use arc_swap::ArcSwap;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Parse `path` and publish its routes into `routes`. Returns the settings
/// that were read.
pub fn reload_routes(path: &Path, routes: &ArcSwap<RouteTable>) -> Result<AppSettings> {
    let settings = AppSettings::from_file(path)?;
    routes.store(Arc::new(settings.route_table()));
    Ok(settings)
}

/// Watch the settings file at `path` and swap `routes` whenever it changes.
///
/// The watcher stops when the returned value is dropped.
pub fn watch_routes<P, F>(
    path: P,
    routes: Arc<ArcSwap<RouteTable>>,
    mut on_reload: F,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
    F: FnMut(&AppSettings) + Send + 'static,
{
    let path: PathBuf = path.as_ref().to_path_buf();
    let watch_path = path.clone();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    return;
                }
                match reload_routes(&watch_path, &routes) {
                    Ok(settings) => {
                        info!(
                            path = %watch_path.display(),
                            routes = settings.routes.len(),
                            "hot-reload: route table replaced"
                        );
                        on_reload(&settings);
                    }
                    Err(e) => warn!(
                        path = %watch_path.display(),
                        error = %format!("{e:#}"),
                        "hot-reload: keeping previous routes"
                    ),
                }
            }
            Err(e) => error!(error = %e, "hot-reload: watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&path, RecursiveMode::NonRecursive)?;
    info!(path = %path.display(), "hot-reload: watching settings file");
    Ok(watcher)
}
