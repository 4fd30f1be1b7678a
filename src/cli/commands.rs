use crate::app::App;
use crate::config::AppSettings;
use crate::echo::EchoController;
use crate::hot_reload::watch_routes;
use crate::router::{HandlerRef, PathResolver};
use crate::server::HttpServer;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Command-line interface for brrtmvc
#[derive(Parser, Debug)]
#[command(name = "brrtmvc")]
#[command(about = "Inspect and serve brrtmvc route configurations", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List configured routes in match order
    Routes {
        /// Settings file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show how a request path resolves
    Resolve {
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// HTTP method used to derive the action method name
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Request path, e.g. /index/hi/Joe
        path: String,
    },
    /// Serve the configuration with the built-in echo controller
    Serve {
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Reload routes when the settings file changes
        #[arg(long, default_value_t = false)]
        watch: bool,

        /// Address and port to bind the server to
        #[arg(long, default_value = "0.0.0.0:8080")]
        addr: String,
    },
}

/// Execute a parsed command.
pub fn run_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Routes { config } => {
            let settings = load_settings(config.as_deref())?;
            print!("{}", describe_routes(&settings));
            Ok(())
        }
        Commands::Resolve {
            config,
            method,
            path,
        } => {
            let settings = load_settings(config.as_deref())?;
            println!("{}", describe_resolution(&settings, &method, &path)?);
            Ok(())
        }
        Commands::Serve {
            config,
            watch,
            addr,
        } => serve(config.as_deref(), watch, &addr),
    }
}

fn load_settings(path: Option<&Path>) -> Result<AppSettings> {
    match path {
        Some(path) => AppSettings::load(path),
        None => {
            let mut settings = AppSettings::default();
            settings.apply_overrides(|key| std::env::var(key).ok());
            Ok(settings)
        }
    }
}

/// One line per route: index, pattern and target.
pub fn describe_routes(settings: &AppSettings) -> String {
    let table = settings.route_table();
    let mut out = String::new();
    if table.is_empty() {
        out.push_str("no routes configured\n");
        return out;
    }
    for (idx, route) in table.iter().enumerate() {
        let target = match route.handler() {
            HandlerRef::Action { controller, action } if route.handler().is_well_formed() => {
                format!("{controller}::{action}")
            }
            HandlerRef::Action { .. } => "<malformed, skipped>".to_string(),
            HandlerRef::Callback(_) => "<callback>".to_string(),
        };
        out.push_str(&format!("{idx:>3}  {:<40}  {target}\n", route.pattern()));
    }
    out
}

/// JSON description of the context `path` resolves to.
pub fn describe_resolution(settings: &AppSettings, method: &str, path: &str) -> Result<String> {
    let mut resolver = PathResolver::new(settings.route_table());
    resolver.set_default_controller(&settings.default_controller)?;
    resolver.set_default_action(&settings.default_action)?;

    let matched = resolver.routes().match_first(path).map(|m| m.pattern.to_string());
    let ctx = resolver.resolve(path).with_method(method);
    let mut controllers = crate::controller::ControllerRegistry::new();
    controllers.set_namespace(&settings.controller_namespace)?;

    let description = json!({
        "path": path,
        "route": matched,
        "controller": ctx.controller,
        "controller_id": controllers.qualify(&ctx.controller),
        "action": ctx.action,
        "method_name": ctx.action_method(),
        "params": ctx.params,
    });
    serde_json::to_string_pretty(&description).context("Failed to encode resolution")
}

fn serve(config: Option<&Path>, watch: bool, addr: &str) -> Result<()> {
    let settings = load_settings(config)?;
    let mut app = App::from_settings(settings.clone())?;

    app.register_controller::<EchoController>("echo");
    app.register_controller::<EchoController>(&settings.default_controller);
    for route in settings.routes.iter().filter(|r| !r.controller.is_empty()) {
        app.register_controller::<EchoController>(&route.controller);
    }
    let app = Arc::new(app);

    let _watcher = match (watch, config) {
        (true, Some(path)) => Some(
            watch_routes(path, app.routes_handle(), |settings| {
                info!(routes = settings.routes.len(), "Routes reloaded");
            })
            .context("Failed to watch settings file")?,
        ),
        (true, None) => return Err(anyhow!("--watch needs --config")),
        (false, _) => None,
    };

    let handle = HttpServer::new(app)
        .start(addr)
        .with_context(|| format!("Failed to bind {addr}"))?;
    handle
        .join()
        .map_err(|e| anyhow!("server stopped abnormally: {e:?}"))?;
    Ok(())
}
