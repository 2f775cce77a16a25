//! Route identity
//!
//! Every route shown by the host widget is wrapped in a [`RouteContainer`]
//! carrying an identity allocated by the controller. The identity, never the
//! route value, is what the controller uses to track the route.

use serde::{Deserialize, Serialize};

/// Identity of a route container. The root container is always `0`.
pub type RouteId = u64;

/// Identity of the root container
pub const ROOT_ROUTE_ID: RouteId = 0;

/// A route value paired with the identity allocated for it
///
/// Two containers holding equal routes are still distinct screens: pushing
/// the same list screen twice yields two containers with different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteContainer<R> {
    /// Identity allocated by the controller
    pub id: RouteId,
    /// Application route value
    pub route: R,
}

impl<R> RouteContainer<R> {
    /// Create a container
    pub fn new(id: RouteId, route: R) -> Self {
        Self { id, route }
    }

    /// Check if this is the root container
    pub fn is_root(&self) -> bool {
        self.id == ROOT_ROUTE_ID
    }
}

/// Membership and visibility of a tracked route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteState<R> {
    /// Identity of the tracked container
    pub id: RouteId,
    /// Route value of the tracked container
    pub route: R,
    /// The container is in the declared path (the root always is)
    pub in_path: bool,
    /// The host reported the container as appeared and not yet disappeared
    pub visible: bool,
}

impl<R> RouteState<R> {
    /// Create a route state
    pub fn new(id: RouteId, route: R, in_path: bool, visible: bool) -> Self {
        Self {
            id,
            route,
            in_path,
            visible,
        }
    }

    /// Return a copy with `in_path` replaced
    pub fn with_in_path(self, in_path: bool) -> Self {
        Self { in_path, ..self }
    }

    /// Return a copy with `visible` replaced
    pub fn with_visible(self, visible: bool) -> Self {
        Self { visible, ..self }
    }

    /// A route is dropped once it is neither in the path nor on screen
    pub fn is_removable(&self) -> bool {
        !self.in_path && !self.visible
    }
}
