//! Navigation state snapshot
//!
//! [`State`] is everything the controller knows at one point in time: the
//! declared path, which routes are tracked, the operations not yet applied
//! and the transitions the host still owes before the next one may run.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

use crate::container::{RouteContainer, RouteId, RouteState, ROOT_ROUTE_ID};

// =============================================================================
// Operations and Waits
// =============================================================================

/// A navigation intent that has not been applied yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "args", rename_all = "lowercase")]
pub enum NavOp<R> {
    /// Push a route on top of the path
    Push(R),
    /// Remove the top of the path
    Pop,
    /// Replace the whole path
    Replace(Vec<R>),
}

/// A transition the host widget must report before the next operation runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "wait", content = "id", rename_all = "lowercase")]
pub enum NavWait {
    /// The container must appear
    Appear(RouteId),
    /// The container must disappear
    Disappear(RouteId),
    /// The host must render its first frame
    Shown,
}

// =============================================================================
// State
// =============================================================================

/// Complete navigation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State<R> {
    /// Declared path, bottom to top, excluding the root
    pub path: Vec<RouteContainer<R>>,
    /// Container shown beneath the path
    pub root_container: RouteContainer<R>,
    /// Next identity to allocate
    pub next_id: RouteId,
    /// Tracked routes by identity
    pub routes_state: BTreeMap<RouteId, RouteState<R>>,
    /// Operations waiting to be applied, oldest first
    pub nav_op_queue: VecDeque<NavOp<R>>,
    /// Transitions still owed by the host, oldest first
    pub nav_wait: VecDeque<NavWait>,
}

impl<R: Clone> State<R> {
    /// Initial state for a controller rooted at `root_route`
    ///
    /// The root is tracked but not visible yet, and nothing may be applied
    /// until the host reports its first frame.
    pub fn new(root_route: R) -> Self {
        let root_container = RouteContainer::new(ROOT_ROUTE_ID, root_route);

        let mut routes_state = BTreeMap::new();
        routes_state.insert(
            root_container.id,
            RouteState::new(root_container.id, root_container.route.clone(), true, false),
        );

        Self {
            path: Vec::new(),
            root_container,
            next_id: ROOT_ROUTE_ID + 1,
            routes_state,
            nav_op_queue: VecDeque::new(),
            nav_wait: VecDeque::from([NavWait::Shown]),
        }
    }
}

impl<R> State<R> {
    /// Container on top of the path, or the root when the path is empty
    pub fn active_container(&self) -> &RouteContainer<R> {
        self.path.last().unwrap_or(&self.root_container)
    }

    /// Route of the active container
    pub fn active_route(&self) -> &R {
        &self.active_container().route
    }

    /// Check if a transition is queued, owed, or still on screen
    pub fn is_navigating(&self) -> bool {
        !self.nav_op_queue.is_empty()
            || !self.nav_wait.is_empty()
            || self.routes_state.values().filter(|s| s.visible).count() > 1
    }

    /// Check if there is anything above the root
    pub fn can_go_back(&self) -> bool {
        !self.path.is_empty()
    }

    /// Check if an identity is still tracked
    pub fn is_tracked(&self, id: RouteId) -> bool {
        self.routes_state.contains_key(&id)
    }
}
