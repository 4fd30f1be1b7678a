//! Unit tests for CLI commands

use crate::cli::{describe_resolution, describe_routes, Cli, Commands};
use crate::config::AppSettings;
use clap::Parser;
use serde_json::Value;

fn settings() -> AppSettings {
    AppSettings::from_yaml(
        r#"
routes:
  - pattern: '/hi/(\w+)'
    controller: Index
    action: hi
  - pattern: '/broken'
    controller: Index
"#,
    )
    .unwrap()
}

#[test]
fn test_resolve_command_parses() {
    let cli = Cli::try_parse_from(["brrtmvc", "resolve", "--method", "post", "/index/hello"])
        .unwrap();
    match cli.command {
        Commands::Resolve {
            config,
            method,
            path,
        } => {
            assert!(config.is_none());
            assert_eq!(method, "post");
            assert_eq!(path, "/index/hello");
        }
        other => panic!("Expected Resolve command, got {other:?}"),
    }
}

#[test]
fn test_serve_defaults() {
    let cli = Cli::try_parse_from(["brrtmvc", "serve"]).unwrap();
    match cli.command {
        Commands::Serve { watch, addr, .. } => {
            assert!(!watch);
            assert_eq!(addr, "0.0.0.0:8080");
        }
        other => panic!("Expected Serve command, got {other:?}"),
    }
}

#[test]
fn test_resolve_requires_a_path() {
    assert!(Cli::try_parse_from(["brrtmvc", "resolve"]).is_err());
}

#[test]
fn test_describe_routes_marks_malformed_entries() {
    let out = describe_routes(&settings());
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains(r"/hi/(\w+)"));
    assert!(lines[0].ends_with("Index::hi"));
    assert!(lines[1].ends_with("<malformed, skipped>"));
    assert_eq!(lines[0], format!("  0  {:<40}  Index::hi", r"/hi/(\w+)"));
    assert!(out.ends_with("<malformed, skipped>\n"));

    assert_eq!(describe_routes(&AppSettings::default()), "no routes configured\n");
}

#[test]
fn test_describe_resolution() {
    let out = describe_resolution(&settings(), "GET", "/hi/Joe").unwrap();
    let v: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["route"], r"/hi/(\w+)");
    assert_eq!(v["controller_id"], "app::controllers::Index");
    assert_eq!(v["method_name"], "hiGet");
    assert_eq!(v["params"], serde_json::json!(["Joe"]));

    let out = describe_resolution(&settings(), "POST", "/blog/archive/2015").unwrap();
    let v: Value = serde_json::from_str(&out).unwrap();
    assert!(v["route"].is_null());
    assert_eq!(v["method_name"], "archivePost");
}
