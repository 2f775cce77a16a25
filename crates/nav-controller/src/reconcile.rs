//! Reconciliation with the host's own path
//!
//! The host widget can change the visible stack without going through the
//! controller, for instance with an edge-swipe back gesture. When it reports
//! its path, the controller adopts it and records the disappear transitions
//! it is now owed for the screens that left.

use std::collections::HashSet;
use std::fmt;

use crate::container::{RouteContainer, RouteId};
use crate::controller::NavController;
use crate::state::NavWait;

impl<R: Clone + fmt::Debug> NavController<R> {
    /// Adopt the path reported by the host widget
    ///
    /// Must be called on every report, not only when the path looks
    /// different, since it also keeps route membership current.
    /// Containers the controller no longer tracks are dropped from the
    /// reported path.
    ///
    /// Owed transitions are never purged here. A pushed route the host
    /// drops before reporting its appear is removed, but its `Appear` wait
    /// stays until the host reports it.
    pub fn on_path_changed(&mut self, mut path: Vec<RouteContainer<R>>) {
        tracing::debug!(
            path = ?path.iter().map(|c| c.id).collect::<Vec<_>>(),
            "host path changed"
        );

        path.retain(|container| {
            let tracked = self.state.is_tracked(container.id);
            if !tracked {
                tracing::warn!(id = container.id, "host reported an untracked route");
            }
            tracked
        });

        let ids = path_ids(&path, self.state.root_container.id);
        self.apply_in_path(&ids);

        // screens that left the path but are still on screen must disappear
        // before the next operation, top of the old path first
        for container in self.state.path.iter().rev() {
            let left = self
                .state
                .routes_state
                .get(&container.id)
                .is_some_and(|route_state| !route_state.in_path);

            if left {
                self.state
                    .nav_wait
                    .push_back(NavWait::Disappear(container.id));
            }
        }

        self.state.path = path;
        self.publish();
    }

    /// Recompute membership after the controller changed its own path
    pub(crate) fn refresh_in_path(&mut self) {
        let ids = path_ids(&self.state.path, self.state.root_container.id);
        self.apply_in_path(&ids);
    }

    fn apply_in_path(&mut self, ids: &HashSet<RouteId>) {
        let tracked: Vec<RouteId> = self.state.routes_state.keys().copied().collect();

        for id in tracked {
            if let Some(route_state) = self.state.routes_state.get_mut(&id) {
                route_state.in_path = ids.contains(&id);
            }

            self.cleanup_route(id);
        }
    }
}

fn path_ids<R>(path: &[RouteContainer<R>], root_id: RouteId) -> HashSet<RouteId> {
    path.iter()
        .map(|container| container.id)
        .chain(std::iter::once(root_id))
        .collect()
}
