use brrtmvc::app::App;
use brrtmvc::controller::{ActionResult, ActionTable, Controller};
use brrtmvc::hot_reload::{reload_routes, watch_routes};
use brrtmvc::http::{Request, Response};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const ROUTES_V1: &str = r#"
routes:
  - pattern: '/greet/(\w+)'
    controller: Pages
    action: hello
"#;

const ROUTES_V2: &str = r#"
routes:
  - pattern: '/greet/(\w+)'
    controller: Pages
    action: bye
"#;

struct Pages;

impl Pages {
    fn hello_get(&mut self, params: &[String]) -> ActionResult {
        Ok(format!("hello {}", params[0]).into())
    }

    fn bye_get(&mut self, params: &[String]) -> ActionResult {
        Ok(format!("bye {}", params[0]).into())
    }
}

impl Controller for Pages {
    fn construct(_request: &Request, _response: Response) -> Self {
        Pages
    }

    fn actions() -> ActionTable<Self> {
        ActionTable::new()
            .get("hello", Self::hello_get)
            .get("bye", Self::bye_get)
    }
}

fn app() -> App {
    let mut app = App::new();
    app.register_controller::<Pages>("pages");
    app
}

fn greet(app: &App) -> String {
    app.handle(&Request::get("/greet/Ann"))
        .body()
        .to_text()
        .unwrap()
}

#[test]
fn test_reload_routes_swaps_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.yaml");
    let app = app();
    let routes = app.routes_handle();

    std::fs::write(&path, ROUTES_V1).unwrap();
    reload_routes(&path, &routes).unwrap();
    assert_eq!(greet(&app), "hello Ann");

    std::fs::write(&path, ROUTES_V2).unwrap();
    let settings = reload_routes(&path, &routes).unwrap();
    assert_eq!(settings.routes[0].action, "bye");
    assert_eq!(greet(&app), "bye Ann");
}

#[test]
fn test_failed_reload_keeps_previous_routes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.yaml");
    let app = app();
    let routes = app.routes_handle();

    std::fs::write(&path, ROUTES_V1).unwrap();
    reload_routes(&path, &routes).unwrap();

    std::fs::write(&path, "routes: [broken").unwrap();
    assert!(reload_routes(&path, &routes).is_err());
    assert_eq!(greet(&app), "hello Ann");
}

#[test]
fn test_watch_routes_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.yaml");
    std::fs::write(&path, ROUTES_V1).unwrap();

    let app = app();
    reload_routes(&path, &app.routes_handle()).unwrap();
    assert_eq!(greet(&app), "hello Ann");

    let reloads: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&reloads);
    let watcher = watch_routes(&path, app.routes_handle(), move |settings| {
        let actions = settings.routes.iter().map(|r| r.action.clone());
        seen.lock().unwrap().extend(actions);
    })
    .expect("watch_routes");

    // allow watcher thread to start
    std::thread::sleep(Duration::from_millis(100));

    std::fs::write(&path, ROUTES_V2).unwrap();

    for _ in 0..40 {
        if reloads.lock().unwrap().iter().any(|a| a == "bye") {
            break;
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    assert!(reloads.lock().unwrap().iter().any(|a| a == "bye"));
    assert_eq!(greet(&app), "bye Ann");
    drop(watcher);
}
