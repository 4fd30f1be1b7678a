use crate::container::Container;
use crate::http::{Request, Response};
use crate::router::{action_method_name, DispatchContext};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

/// What an action or callback route produced.
#[derive(Debug, Clone)]
pub enum ActionOutput {
    /// A complete response, used as-is.
    Response(Response),
    /// Literal body for a fresh `200` response.
    Text(String),
    /// No value. The dispatcher rejects it as an invalid response.
    Nothing,
}

impl From<Response> for ActionOutput {
    fn from(r: Response) -> Self {
        ActionOutput::Response(r)
    }
}

impl From<String> for ActionOutput {
    fn from(s: String) -> Self {
        ActionOutput::Text(s)
    }
}

impl From<&str> for ActionOutput {
    fn from(s: &str) -> Self {
        ActionOutput::Text(s.to_string())
    }
}

impl From<()> for ActionOutput {
    fn from(_: ()) -> Self {
        ActionOutput::Nothing
    }
}

/// Ways an action can leave without a normal return value.
#[derive(Debug)]
pub enum ActionError {
    /// Stop processing and send this response verbatim (halt, redirect).
    EarlyExit(Response),
    /// The action failed.
    Failed(anyhow::Error),
}

impl ActionError {
    /// Failure carrying a plain message.
    pub fn msg<M>(message: M) -> Self
    where
        M: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        ActionError::Failed(anyhow::Error::msg(message))
    }
}

impl<E> From<E> for ActionError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(e: E) -> Self {
        ActionError::Failed(anyhow::Error::new(e))
    }
}

/// Return type of actions, hooks and callback routes.
pub type ActionResult = Result<ActionOutput, ActionError>;

/// Concrete action method: receives the positional parameters in order.
pub type ActionFn<C> = fn(&mut C, &[String]) -> ActionResult;

/// Optional capability: code that runs before every action of a controller.
pub trait BeforeActionHook {
    /// Runs unconditionally before the action, whichever action it is.
    /// An error is handled exactly like an error returned by the action.
    fn before_action(&mut self, ctx: &DispatchContext) -> Result<(), ActionError>;
}

/// Optional capability: access to the application's service container.
pub trait ContainerAware {
    fn set_container(&mut self, container: Weak<Container>);

    /// The container, while the application that owns it is alive.
    fn container(&self) -> Option<Arc<Container>>;

    /// Entry stored under `key`; `None` without a container.
    fn service(&self, key: &str) -> Option<Value> {
        self.container().and_then(|c| c.get(key))
    }
}

/// A request handler type.
///
/// Instances are built per request from the request and a fresh response,
/// and dropped once the action returns. Actions are exposed through an
/// [`ActionTable`] rather than discovered by name at runtime; the optional
/// capabilities are opted into by returning `Some(self)`.
pub trait Controller: Sized + Send + 'static {
    fn construct(request: &Request, response: Response) -> Self;

    /// Built once when the controller is registered.
    fn actions() -> ActionTable<Self>;

    fn before_action_hook(&mut self) -> Option<&mut dyn BeforeActionHook> {
        None
    }

    fn container_aware(&mut self) -> Option<&mut dyn ContainerAware> {
        None
    }
}

/// Method-name → function map for one controller type.
///
/// Names follow the `<action><Method>` convention (`helloGet`,
/// `helloPost`); the verb helpers compute them with the same rules the
/// dispatcher uses, so `.get("Hello", ..)` registers `helloGet`.
pub struct ActionTable<C> {
    actions: HashMap<String, ActionFn<C>>,
}

impl<C> Default for ActionTable<C> {
    fn default() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }
}

impl<C> ActionTable<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `action` for `http_method`.
    #[must_use]
    pub fn on(self, action: &str, http_method: &str, f: ActionFn<C>) -> Self {
        self.method(&action_method_name(action, http_method), f)
    }

    /// Register under an exact method name such as `"hiGet"`.
    #[must_use]
    pub fn method(mut self, method_name: &str, f: ActionFn<C>) -> Self {
        self.actions.insert(method_name.to_string(), f);
        self
    }

    #[must_use]
    pub fn get(self, action: &str, f: ActionFn<C>) -> Self {
        self.on(action, "GET", f)
    }

    #[must_use]
    pub fn post(self, action: &str, f: ActionFn<C>) -> Self {
        self.on(action, "POST", f)
    }

    #[must_use]
    pub fn put(self, action: &str, f: ActionFn<C>) -> Self {
        self.on(action, "PUT", f)
    }

    #[must_use]
    pub fn patch(self, action: &str, f: ActionFn<C>) -> Self {
        self.on(action, "PATCH", f)
    }

    #[must_use]
    pub fn delete(self, action: &str, f: ActionFn<C>) -> Self {
        self.on(action, "DELETE", f)
    }

    #[must_use]
    pub fn lookup(&self, method_name: &str) -> Option<ActionFn<C>> {
        self.actions.get(method_name).copied()
    }

    #[must_use]
    pub fn contains(&self, method_name: &str) -> bool {
        self.actions.contains_key(method_name)
    }

    /// Registered method names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
