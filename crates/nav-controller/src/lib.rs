//! Declarative navigation for native navigation widgets
//!
//! Application code describes navigation as a stack of route values and
//! calls [`NavController::push`] / [`NavController::pop`]. The host widget
//! animates the transitions on its own schedule and reports back when
//! screens appear and disappear; the controller applies one operation at a
//! time and only once the previous transition has been reported.
//!
//! # Modules
//!
//! - [`container`] - Route identity and per-route tracking state
//! - [`state`] - Navigation state snapshot, operations and waits
//! - [`controller`] - The controller and its operation engine
//! - [`reconcile`] - Adopting paths changed by the host itself
//! - [`view_models`] - Per-route view model cache

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod container;
pub mod controller;
pub mod reconcile;
pub mod state;
pub mod view_models;

// Re-export commonly used types
pub use container::{RouteContainer, RouteId, RouteState, ROOT_ROUTE_ID};
pub use controller::NavController;
pub use state::{NavOp, NavWait, State};
pub use view_models::ViewModelCache;
