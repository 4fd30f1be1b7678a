//! Controller that reports how a request was resolved. Used by `brrtmvc serve`.

use crate::controller::{
    ActionError, ActionResult, ActionTable, BeforeActionHook, ContainerAware, Controller,
    ControllerBase,
};
use crate::http::{Request, Response};
use crate::router::DispatchContext;
use serde_json::json;

/// Container key counting requests served by the echo controller.
pub const HITS_KEY: &str = "echo.hits";

/// Answers `index` and `show` for every common verb with a JSON description
/// of the request and its resolved context.
pub struct EchoController {
    base: ControllerBase,
    resolved: Option<DispatchContext>,
}

impl EchoController {
    fn echo(&mut self, params: &[String]) -> ActionResult {
        let request = self.base.request();
        let (controller, action, method_name) = match &self.resolved {
            Some(ctx) => (ctx.controller.as_str(), ctx.action.as_str(), ctx.action_method()),
            None => ("", "", String::new()),
        };
        let body = json!({
            "controller": controller,
            "action": action,
            "method_name": method_name,
            "method": request.method(),
            "path": request.path(),
            "query": request.query_params(),
            "params": params,
            "body": String::from_utf8_lossy(request.body()),
            "hits": self
                .base
                .container()
                .map(|c| c.get(HITS_KEY).and_then(|v| v.as_u64()).unwrap_or(0)),
        });
        let text = serde_json::to_string_pretty(&body)?;
        Ok(self
            .base
            .bind_output(text)
            .with_header("Content-Type", "application/json")
            .into())
    }
}

impl BeforeActionHook for EchoController {
    fn before_action(&mut self, ctx: &DispatchContext) -> Result<(), ActionError> {
        if let Some(container) = self.base.container() {
            let hits = container
                .get(HITS_KEY)
                .and_then(|v| v.as_u64())
                .unwrap_or(0);
            container.set(HITS_KEY, hits + 1);
        }
        self.resolved = Some(ctx.clone());
        Ok(())
    }
}

impl Controller for EchoController {
    fn construct(request: &Request, response: Response) -> Self {
        Self {
            base: ControllerBase::new(request, response),
            resolved: None,
        }
    }

    fn actions() -> ActionTable<Self> {
        let mut table = ActionTable::new();
        for action in ["index", "show"] {
            for method in ["GET", "POST", "PUT", "PATCH", "DELETE"] {
                table = table.on(action, method, Self::echo);
            }
        }
        table
    }

    fn before_action_hook(&mut self) -> Option<&mut dyn BeforeActionHook> {
        Some(self)
    }

    fn container_aware(&mut self) -> Option<&mut dyn ContainerAware> {
        Some(&mut self.base)
    }
}
