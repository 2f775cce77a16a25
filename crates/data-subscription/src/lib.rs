//! Data Service bindings for screens
//!
//! Screens read their data from an external Data Service that exposes, per
//! logical subscription, a `subscribe` / `get_data` / `unsubscribe` triple.
//! This crate wraps that contract so a view model can hold a live value
//! that is released as soon as the view model is dropped.
//!
//! # Modules
//!
//! - [`source`] - The [`DataSource`] contract implemented by the Data Service
//! - [`subscription`] - [`Subscription`], a live value tied to its owner
//! - [`wait`] - Waiting for the first available value

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod source;
pub mod subscription;
pub mod wait;

pub use source::{DataSource, SubscriptionCallback, SubscriptionId};
pub use subscription::Subscription;
pub use wait::{subscription_wait, subscription_wait_timeout, Result, SubscriptionError};
