use super::core::{ActionError, ActionResult, ActionTable, Controller};
use crate::container::Container;
use crate::dispatcher::DispatchError;
use crate::http::{Request, Response};
use crate::router::{
    action_method_name, normalize_controller_name, validate_prefix, DispatchContext,
};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

/// Prefix joined with the normalized controller name to form its identifier.
pub const DEFAULT_NAMESPACE: &str = "app::controllers::";

/// A controller built for one request, with its type erased.
pub trait ControllerInstance: Send {
    /// Fully-qualified identifier the instance was registered under.
    fn id(&self) -> &str;

    /// Hand the container to a container-aware controller.
    /// Returns `false` when the controller does not opt in.
    fn attach_container(&mut self, container: Weak<Container>) -> bool;

    /// Run the pre-action hook. `None` when the controller has none.
    fn run_before_action_hook(&mut self, ctx: &DispatchContext) -> Option<Result<(), ActionError>>;

    fn has_action(&self, method_name: &str) -> bool;

    fn invoke(&mut self, method_name: &str, params: &[String]) -> ActionResult;
}

struct Hosted<C> {
    id: String,
    controller: C,
    actions: Arc<ActionTable<C>>,
}

impl<C: Controller> ControllerInstance for Hosted<C> {
    fn id(&self) -> &str {
        &self.id
    }

    fn attach_container(&mut self, container: Weak<Container>) -> bool {
        match self.controller.container_aware() {
            Some(aware) => {
                aware.set_container(container);
                true
            }
            None => false,
        }
    }

    fn run_before_action_hook(&mut self, ctx: &DispatchContext) -> Option<Result<(), ActionError>> {
        self.controller
            .before_action_hook()
            .map(|hook| hook.before_action(ctx))
    }

    fn has_action(&self, method_name: &str) -> bool {
        self.actions.contains(method_name)
    }

    fn invoke(&mut self, method_name: &str, params: &[String]) -> ActionResult {
        match self.actions.lookup(method_name) {
            Some(action) => action(&mut self.controller, params),
            None => Err(ActionError::msg(format!(
                "no method {method_name} on {}",
                self.id
            ))),
        }
    }
}

type ControllerFactory =
    Arc<dyn Fn(&str, &Request, Response) -> Box<dyn ControllerInstance> + Send + Sync>;

/// An action method bound to the controller instance it will run on.
pub struct BoundAction<'a> {
    instance: &'a mut dyn ControllerInstance,
    method_name: String,
}

impl BoundAction<'_> {
    #[must_use]
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Invoke the action with the positional parameters.
    pub fn call(self, params: &[String]) -> ActionResult {
        self.instance.invoke(&self.method_name, params)
    }
}

/// Registered controller constructors, keyed by fully-qualified identifier.
///
/// Identifiers are `namespace + Name`, where `Name` is the controller name
/// with its first letter upper-cased and the rest lower-cased. Because the
/// namespace is applied at registration and again at lookup, changing it
/// later hides controllers registered under the old one.
pub struct ControllerRegistry {
    namespace: String,
    factories: HashMap<String, ControllerFactory>,
    container: Option<Weak<Container>>,
}

impl Default for ControllerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            factories: HashMap::new(),
            container: None,
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Set the identifier prefix, e.g. `"app::controllers::"`. An empty
    /// prefix registers controllers under their bare names.
    pub fn set_namespace(&mut self, namespace: &str) -> Result<(), DispatchError> {
        self.namespace = validate_prefix("controller namespace", namespace)?;
        Ok(())
    }

    /// Container attached to container-aware controllers.
    pub fn set_container(&mut self, container: Weak<Container>) {
        self.container = Some(container);
    }

    /// Identifier `name` resolves to under the current namespace.
    #[must_use]
    pub fn qualify(&self, name: &str) -> String {
        let mut id = self.namespace.clone();
        id.push_str(&normalize_controller_name(name));
        id
    }

    /// Register `C` under `name` in the current namespace.
    pub fn register<C: Controller>(&mut self, name: &str) {
        let id = self.qualify(name);
        self.register_qualified::<C>(&id);
    }

    /// Register `C` under an exact identifier.
    ///
    /// A controller registered again under the same identifier replaces the
    /// previous one.
    pub fn register_qualified<C: Controller>(&mut self, id: &str) {
        let actions = Arc::new(C::actions());
        let action_count = actions.len();
        let factory: ControllerFactory = Arc::new(
            move |id: &str, request: &Request, response: Response| -> Box<dyn ControllerInstance> {
                Box::new(Hosted {
                    id: id.to_string(),
                    controller: C::construct(request, response),
                    actions: Arc::clone(&actions),
                })
            },
        );

        if self.factories.insert(id.to_string(), factory).is_some() {
            warn!(controller = %id, "Replaced existing controller registration");
        }
        info!(
            controller = %id,
            actions = action_count,
            total_controllers = self.factories.len(),
            "Controller registered"
        );
    }

    /// Whether `name` resolves to a registered controller.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(&self.qualify(name))
    }

    /// Registered identifiers, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Build the controller `name` refers to for this request.
    ///
    /// Container-aware controllers receive the registry's container.
    pub fn instantiate(
        &self,
        name: &str,
        request: &Request,
        response: Response,
    ) -> Result<Box<dyn ControllerInstance>, DispatchError> {
        let id = self.qualify(name);
        debug!(
            controller = %id,
            available_controllers = self.factories.len(),
            "Controller lookup"
        );

        let Some(factory) = self.factories.get(&id) else {
            warn!(controller = %id, "Controller not found");
            return Err(DispatchError::ControllerNotFound { name: id });
        };

        let mut instance = factory(&id, request, response);
        if let Some(container) = &self.container {
            if instance.attach_container(Weak::clone(container)) {
                debug!(controller = %id, "Container attached");
            }
        }
        Ok(instance)
    }

    /// Bind `action` for `http_method` on `instance`.
    ///
    /// The method name is `lowercase(action) + Capitalized(method)`; the
    /// instance must expose exactly that name.
    pub fn resolve_action<'a>(
        instance: &'a mut dyn ControllerInstance,
        action: &str,
        http_method: &str,
    ) -> Result<BoundAction<'a>, DispatchError> {
        let method_name = action_method_name(action, http_method);
        if !instance.has_action(&method_name) {
            warn!(controller = %instance.id(), action = %method_name, "Action not found");
            return Err(DispatchError::ActionNotFound {
                controller: instance.id().to_string(),
                action: method_name,
            });
        }
        Ok(BoundAction {
            instance,
            method_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{ActionOutput, BeforeActionHook, ContainerAware, ControllerBase};

    struct Index {
        base: ControllerBase,
        seen: Option<String>,
    }

    impl Index {
        fn hi_get(&mut self, params: &[String]) -> ActionResult {
            Ok(format!("hi {}", params.join(",")).into())
        }

        fn seen_get(&mut self, _params: &[String]) -> ActionResult {
            Ok(self.seen.clone().unwrap_or_default().into())
        }
    }

    impl BeforeActionHook for Index {
        fn before_action(&mut self, ctx: &DispatchContext) -> Result<(), ActionError> {
            self.seen = Some(ctx.action_method());
            Ok(())
        }
    }

    impl Controller for Index {
        fn construct(request: &Request, response: Response) -> Self {
            Self {
                base: ControllerBase::new(request, response),
                seen: None,
            }
        }

        fn actions() -> ActionTable<Self> {
            ActionTable::new()
                .get("hi", Self::hi_get)
                .get("seen", Self::seen_get)
        }

        fn before_action_hook(&mut self) -> Option<&mut dyn BeforeActionHook> {
            Some(self)
        }

        fn container_aware(&mut self) -> Option<&mut dyn ContainerAware> {
            Some(&mut self.base)
        }
    }

    struct Plain;

    impl Controller for Plain {
        fn construct(_request: &Request, _response: Response) -> Self {
            Plain
        }

        fn actions() -> ActionTable<Self> {
            ActionTable::new()
        }
    }

    fn registry() -> ControllerRegistry {
        let mut registry = ControllerRegistry::new();
        registry.register::<Index>("index");
        registry.register::<Plain>("plain");
        registry
    }

    #[test]
    fn test_name_case_is_normalized() {
        let registry = registry();
        let req = Request::get("/");
        for name in ["INDEX", "index", "Index", "iNdEx"] {
            let instance = registry.instantiate(name, &req, Response::default()).unwrap();
            assert_eq!(instance.id(), "app::controllers::Index");
        }
    }

    #[test]
    fn test_unknown_controller() {
        let registry = registry();
        let err = registry
            .instantiate("missing", &Request::get("/"), Response::default())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            DispatchError::ControllerNotFound { ref name } if name == "app::controllers::Missing"
        ));
    }

    #[test]
    fn test_namespace_applies_to_lookup() {
        let mut registry = registry();
        registry.set_namespace("site::").unwrap();
        assert!(!registry.contains("index"));
        registry.register::<Plain>("index");
        assert!(registry.contains("index"));
        assert_eq!(registry.qualify("blog"), "site::Blog");
        assert!(registry.set_namespace("site/admin::").is_err());
        assert_eq!(registry.namespace(), "site::");
    }

    #[test]
    fn test_empty_namespace_uses_bare_names() {
        let mut registry = registry();
        registry.set_namespace("").unwrap();
        registry.register::<Plain>("index");
        assert_eq!(registry.qualify("index"), "Index");
        assert!(registry.contains("INDEX"));
        let err = registry
            .instantiate("blog", &Request::get("/"), Response::default())
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "controller not found: Blog");
    }

    #[test]
    fn test_resolve_action_uses_method_suffix() {
        let registry = registry();
        let mut instance = registry
            .instantiate("index", &Request::get("/"), Response::default())
            .unwrap();

        let bound = ControllerRegistry::resolve_action(instance.as_mut(), "HI", "get").unwrap();
        assert_eq!(bound.method_name(), "hiGet");
        match bound.call(&["Joe".to_string()]).unwrap() {
            ActionOutput::Text(body) => assert_eq!(body, "hi Joe"),
            other => panic!("unexpected {other:?}"),
        }

        let err = ControllerRegistry::resolve_action(instance.as_mut(), "hi", "POST")
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "action not found: app::controllers::Index::hiPost"
        );
    }

    #[test]
    fn test_hook_and_container_are_optional() {
        let registry = registry();
        let ctx = DispatchContext::new("index", "seen", Vec::new()).with_method("GET");

        let mut index = registry
            .instantiate("index", &Request::get("/"), Response::default())
            .unwrap();
        assert!(matches!(index.run_before_action_hook(&ctx), Some(Ok(()))));
        match index.invoke("seenGet", &[]).unwrap() {
            ActionOutput::Text(body) => assert_eq!(body, "seenGet"),
            other => panic!("unexpected {other:?}"),
        }

        let mut plain = registry
            .instantiate("plain", &Request::get("/"), Response::default())
            .unwrap();
        assert!(plain.run_before_action_hook(&ctx).is_none());
        assert!(!plain.attach_container(Weak::new()));
    }
}
