use super::core::{ActionError, ContainerAware};
use crate::container::Container;
use crate::http::{Request, Response};
use std::sync::{Arc, Weak};

const DEFAULT_REDIRECT_STATUS: u16 = 302;

/// State and helpers most controllers want.
///
/// Embed it in a controller, build it in [`Controller::construct`], and
/// forward [`Controller::container_aware`] to it to receive the container.
///
/// ```rust
/// use brrtmvc::controller::{ActionResult, ActionTable, Controller, ControllerBase, ContainerAware};
/// use brrtmvc::http::{Request, Response};
///
/// struct Pages {
///     base: ControllerBase,
/// }
///
/// impl Pages {
///     fn about_get(&mut self, _params: &[String]) -> ActionResult {
///         Ok(self.base.bind_output("about us").into())
///     }
/// }
///
/// impl Controller for Pages {
///     fn construct(request: &Request, response: Response) -> Self {
///         Self { base: ControllerBase::new(request, response) }
///     }
///     fn actions() -> ActionTable<Self> {
///         ActionTable::new().get("about", Self::about_get)
///     }
///     fn container_aware(&mut self) -> Option<&mut dyn ContainerAware> {
///         Some(&mut self.base)
///     }
/// }
/// ```
///
/// [`Controller::construct`]: super::Controller::construct
/// [`Controller::container_aware`]: super::Controller::container_aware
#[derive(Debug, Clone)]
pub struct ControllerBase {
    request: Request,
    response: Response,
    container: Weak<Container>,
}

impl ControllerBase {
    #[must_use]
    pub fn new(request: &Request, response: Response) -> Self {
        Self {
            request: request.clone(),
            response,
            container: Weak::new(),
        }
    }

    #[must_use]
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// The response the dispatcher created for this request.
    #[must_use]
    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn set_response(&mut self, response: Response) {
        self.response = response;
    }

    /// The controller's response with `output` as its body.
    #[must_use]
    pub fn bind_output(&self, output: impl Into<String>) -> Response {
        Self::bind_output_to(output, self.response.clone())
    }

    /// `response` with `output` as its body.
    #[must_use]
    pub fn bind_output_to(output: impl Into<String>, response: Response) -> Response {
        response.with_body(output.into())
    }

    /// Finish the request with `response`, skipping the rest of the action.
    #[must_use]
    pub fn stop(response: Response) -> ActionError {
        ActionError::EarlyExit(response)
    }

    /// Finish with `status` and `message` as the body.
    #[must_use]
    pub fn halt(&self, status: u16, message: impl Into<String>) -> ActionError {
        Self::stop(
            self.response
                .clone()
                .with_status(status)
                .with_body(message.into()),
        )
    }

    /// Finish with a `302` redirect to `url`.
    #[must_use]
    pub fn redirect(&self, url: &str) -> ActionError {
        self.redirect_with_status(url, DEFAULT_REDIRECT_STATUS)
    }

    #[must_use]
    pub fn redirect_with_status(&self, url: &str, status: u16) -> ActionError {
        Self::stop(
            self.response
                .clone()
                .with_status(status)
                .with_header("Location", url),
        )
    }
}

impl ContainerAware for ControllerBase {
    fn set_container(&mut self, container: Weak<Container>) {
        self.container = container;
    }

    fn container(&self) -> Option<Arc<Container>> {
        self.container.upgrade()
    }
}
