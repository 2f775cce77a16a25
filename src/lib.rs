//! Declarative navigation for the vault mobile apps
//!
//! This crate ties the navigation controller to the application's route
//! catalogue and re-exports the pieces screens need.
//!
//! # Crates
//!
//! - [`nav_controller`] - Navigation state machine and view model cache
//! - [`data_subscription`] - Data Service subscriptions owned by view models
//!
//! # Example
//!
//! ```rust
//! use navsync::{MainNavController, MainRoute};
//!
//! let mut nav = MainNavController::new(MainRoute::Repos);
//! let root = nav.state().root_container.clone();
//! nav.on_appear(&root);
//! nav.on_shown();
//!
//! nav.push(MainRoute::repo_root("repo-1"));
//! assert_eq!(nav.active_route().title(), "Files");
//! assert!(nav.is_navigating());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod routes;

// Re-export commonly used types
pub use data_subscription::{
    subscription_wait, subscription_wait_timeout, DataSource, Subscription,
    SubscriptionCallback, SubscriptionError, SubscriptionId,
};
pub use nav_controller::{
    NavController, NavOp, NavWait, RouteContainer, RouteId, RouteState, State, ViewModelCache,
    ROOT_ROUTE_ID,
};
pub use routes::{MainNavController, MainRoute};
