use crate::http::Response;
use thiserror::Error;

/// Everything that can stop a dispatch from producing an action's response.
///
/// The `Display` text of each variant is what a client sees in debug mode.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No controller is registered under the qualified identifier.
    #[error("controller not found: {name}")]
    ControllerNotFound { name: String },

    /// The controller has no method with the derived name.
    #[error("action not found: {controller}::{action}")]
    ActionNotFound { controller: String, action: String },

    /// The action produced something that is not a response.
    #[error("invalid response: {reason}")]
    InvalidResponse { reason: String },

    /// Explicit early exit. Not a failure: the response is used as-is.
    #[error("handler raised an early response (status {})", response.status())]
    HandlerRaised { response: Box<Response> },

    /// The action or its pre-action hook returned an error or panicked.
    #[error("action failed: {reason}")]
    ActionFailed {
        controller: String,
        action: String,
        reason: String,
    },

    /// Configuration misuse, such as an empty default controller name.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },
}

impl DispatchError {
    /// Response carried by an early exit.
    #[must_use]
    pub fn into_early_response(self) -> Option<Response> {
        match self {
            DispatchError::HandlerRaised { response } => Some(*response),
            _ => None,
        }
    }

    /// Short machine-readable tag, used as a log field.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::ControllerNotFound { .. } => "controller_not_found",
            DispatchError::ActionNotFound { .. } => "action_not_found",
            DispatchError::InvalidResponse { .. } => "invalid_response",
            DispatchError::HandlerRaised { .. } => "handler_raised",
            DispatchError::ActionFailed { .. } => "action_failed",
            DispatchError::InvalidArgument { .. } => "invalid_argument",
        }
    }
}
