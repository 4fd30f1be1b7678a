use super::{HandlerRef, PathResolver, RouteTable};
use crate::controller::{ActionOutput, ActionResult};
use crate::http::Request;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn noop(_req: &Request, _params: &[String]) -> ActionResult {
    Ok(ActionOutput::Nothing)
}

#[test]
fn test_match_is_anchored_at_both_ends() {
    let mut table = RouteTable::new();
    table.add_route("/hi", ("Index", "hi"));
    assert!(table.match_first("/hi").is_some());
    assert!(table.match_first("/hi/there").is_none());
    assert!(table.match_first("/say/hi").is_none());
}

#[test]
fn test_alternation_is_anchored_as_a_whole() {
    let mut table = RouteTable::new();
    table.add_route("/a|/b", ("Index", "ab"));
    assert!(table.match_first("/a").is_some());
    assert!(table.match_first("/b").is_some());
    assert!(table.match_first("/a/x").is_none());
    assert!(table.match_first("/x/b").is_none());
}

#[test]
fn test_captures_exclude_whole_match() {
    let mut table = RouteTable::new();
    table.add_route(r"/post/(\d+)/(\w+)", ("Post", "show"));
    let hit = table.match_first("/post/12/intro").unwrap();
    assert_eq!(hit.params, strings(&["12", "intro"]));
    assert_eq!(hit.pattern, r"/post/(\d+)/(\w+)");
}

#[test]
fn test_non_participating_group_keeps_its_slot() {
    let mut table = RouteTable::new();
    table.add_route(r"/v(\d)?/(\w+)", ("Api", "call"));
    let hit = table.match_first("/v/ping").unwrap();
    assert_eq!(hit.params, strings(&["", "ping"]));
}

#[test]
fn test_first_registered_wins() {
    let mut table = RouteTable::new();
    table.add_route(r"/page/(\w+)", ("First", "show"));
    table.add_route(r"/page/(\w+)", ("Second", "show"));
    let hit = table.match_first("/page/about").unwrap();
    match hit.handler {
        HandlerRef::Action { controller, .. } => assert_eq!(controller, "First"),
        other => panic!("unexpected handler {other:?}"),
    }
}

#[test]
fn test_malformed_handler_is_skipped() {
    let mut table = RouteTable::new();
    table.add_route("/test/haha", ("Test", "haha"));
    table.add_route(r"/hi/(\w+)", ["Index"]);
    assert!(table.match_first("/hi/Joe").is_none());

    table.add_route(r"/hi/(\w+)", ["Index", "hi"]);
    let hit = table.match_first("/hi/Joe").unwrap();
    match hit.handler {
        HandlerRef::Action { action, .. } => assert_eq!(action, "hi"),
        other => panic!("unexpected handler {other:?}"),
    }
}

#[test]
fn test_invalid_pattern_is_non_matching() {
    let mut table = RouteTable::new();
    table.add_route(r"/broken/(\w+", ("Broken", "x"));
    table.add_route(r"/broken/(\w+)", ("Fixed", "x"));
    let hit = table.match_first("/broken/abc").unwrap();
    match hit.handler {
        HandlerRef::Action { controller, .. } => assert_eq!(controller, "Fixed"),
        other => panic!("unexpected handler {other:?}"),
    }
    // Compilation is cached; a second lookup behaves identically.
    assert!(table.match_first("/broken/abc").is_some());
}

#[test]
fn test_callback_is_returned_directly() {
    let mut table = RouteTable::new();
    table.add_route(r"/test/(\w+)", HandlerRef::callback(noop));
    let hit = table.match_first("/test/closure").unwrap();
    assert!(matches!(hit.handler, HandlerRef::Callback(_)));
    assert_eq!(hit.params, strings(&["closure"]));
}

#[test]
fn test_empty_path_yields_defaults() {
    let resolver = PathResolver::default();
    for path in ["", "/", "///"] {
        let ctx = resolver.resolve(path);
        assert_eq!(ctx.controller, "index");
        assert_eq!(ctx.action, "index");
        assert!(ctx.params.is_empty());
    }
}

#[test]
fn test_positional_fallback() {
    let resolver = PathResolver::default();
    let ctx = resolver.resolve("/index/hi/Joe").with_method("GET");
    assert_eq!(ctx.controller, "index");
    assert_eq!(ctx.action, "hi");
    assert_eq!(ctx.params, strings(&["Joe"]));
    assert_eq!(ctx.action_method(), "hiGet");

    let ctx = resolver.resolve("/blog/archive/2015/06/");
    assert_eq!(ctx.controller, "blog");
    assert_eq!(ctx.action, "archive");
    assert_eq!(ctx.params, strings(&["2015", "06"]));
}

#[test]
fn test_controller_only_keeps_default_action() {
    let mut resolver = PathResolver::default();
    resolver.set_default_action("about").unwrap();
    let ctx = resolver.resolve("/index");
    assert_eq!(ctx.controller, "index");
    assert_eq!(ctx.action, "about");
    assert!(ctx.params.is_empty());
}

#[test]
fn test_defaults_are_configurable() {
    let mut resolver = PathResolver::default();
    resolver.set_default_controller("Home").unwrap();
    resolver.set_default_action("welcome").unwrap();
    let ctx = resolver.resolve("/");
    assert_eq!((ctx.controller.as_str(), ctx.action.as_str()), ("Home", "welcome"));
}

#[test]
fn test_invalid_default_names_are_rejected() {
    let mut resolver = PathResolver::default();
    assert!(resolver.set_default_controller("").is_err());
    assert!(resolver.set_default_action("  ").is_err());
    assert!(resolver.set_default_action("a/b").is_err());
    assert_eq!(resolver.default_controller(), "index");
    assert_eq!(resolver.default_action(), "index");
}

#[test]
fn test_route_beats_convention() {
    let resolver = PathResolver::default();
    resolver.add_route(r"/hi/(\w+)", ("Index", "hi"));
    let ctx = resolver.resolve("/hi/Joe");
    assert_eq!(ctx.controller, "Index");
    assert_eq!(ctx.action, "hi");
    assert_eq!(ctx.params, strings(&["Joe"]));
    assert!(ctx.callback().is_none());
}

#[test]
fn test_unmatched_malformed_route_falls_through_to_convention() {
    let resolver = PathResolver::default();
    resolver.add_route(r"/hi/(\w+)", ["Index"]);
    let ctx = resolver.resolve("/hi/Joe");
    assert_eq!(ctx.controller, "hi");
    assert_eq!(ctx.action, "Joe");
}

#[test]
fn test_callback_route_resolves_with_callback() {
    let resolver = PathResolver::default();
    resolver.add_route(r"/test/(\w+)", HandlerRef::callback(noop));
    let ctx = resolver.resolve("/test/closure");
    assert!(ctx.callback().is_some());
    assert_eq!(ctx.params, strings(&["closure"]));
}

#[test]
fn test_snapshot_is_stable_while_routes_are_added() {
    let resolver = PathResolver::default();
    resolver.add_route("/one", ("One", "index"));
    let before = resolver.routes();
    resolver.add_route("/two", ("Two", "index"));
    assert_eq!(before.len(), 1);
    assert_eq!(resolver.routes().len(), 2);
}
