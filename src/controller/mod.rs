//! # Controller Module
//!
//! Controllers are the targets of dispatch. A controller type is built per
//! request from the request and a fresh response, exposes its actions through
//! an [`ActionTable`], and may opt into two capabilities:
//!
//! - [`BeforeActionHook`]: code that runs before every action, receiving the
//!   resolved [`DispatchContext`](crate::router::DispatchContext)
//! - [`ContainerAware`]: a weak handle to the application's
//!   [`Container`](crate::container::Container)
//!
//! ## Resolution
//!
//! [`ControllerRegistry`] maps fully-qualified identifiers to constructors.
//! The identifier for a name is the configured namespace followed by the name
//! with its first letter upper-cased and the rest lower-cased, so `INDEX`,
//! `index` and `Index` all find the same controller. The action method name
//! is `lowercase(action) + Capitalized(method)`: action `hi` requested with
//! `GET` runs `hiGet`.
//!
//! ## Early exit
//!
//! Returning [`ActionError::EarlyExit`] finishes the request with the carried
//! response, whatever its status. [`ControllerBase`] builds these for the
//! usual cases (`stop`, `halt`, `redirect`).

mod base;
mod core;
mod registry;

pub use base::ControllerBase;
pub use core::{
    ActionError, ActionFn, ActionOutput, ActionResult, ActionTable, BeforeActionHook,
    ContainerAware, Controller,
};
pub use registry::{BoundAction, ControllerInstance, ControllerRegistry, DEFAULT_NAMESPACE};
