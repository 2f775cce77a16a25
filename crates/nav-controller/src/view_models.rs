//! Per-route view model cache
//!
//! Screens keep their state objects here instead of on the transient view
//! objects the host recreates during navigation. Entries are keyed by route
//! identity and then by the Rust type of the object, and live exactly as
//! long as the controller keeps tracking the route.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::container::RouteId;

/// A cached object together with its type name for diagnostics
struct CachedViewModel {
    type_name: &'static str,
    value: Rc<dyn Any>,
}

/// View models of every tracked route
#[derive(Default)]
pub struct ViewModelCache {
    routes: HashMap<RouteId, HashMap<TypeId, CachedViewModel>>,
}

impl ViewModelCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Start accepting view models for a route
    pub(crate) fn insert_route(&mut self, id: RouteId) {
        self.routes.entry(id).or_default();
    }

    /// Drop every view model of a route, returning how many were cached
    pub(crate) fn remove_route(&mut self, id: RouteId) -> usize {
        self.routes.remove(&id).map_or(0, |entries| entries.len())
    }

    /// Check if the route still accepts view models
    pub fn contains_route(&self, id: RouteId) -> bool {
        self.routes.contains_key(&id)
    }

    /// Get the cached view model of type `T` for a route
    pub fn get<T: 'static>(&self, id: RouteId) -> Option<Rc<T>> {
        self.routes
            .get(&id)?
            .get(&TypeId::of::<T>())
            .and_then(|cached| Rc::clone(&cached.value).downcast::<T>().ok())
    }

    /// Return the cached `T` for a route or build one with `create`
    ///
    /// The new value is only cached while the route exists. For a route that
    /// is gone, every call builds and returns a fresh value.
    pub(crate) fn ensure<T: 'static>(&mut self, id: RouteId, create: impl FnOnce() -> T) -> Rc<T> {
        let Some(entries) = self.routes.get_mut(&id) else {
            tracing::trace!(id, "route no longer tracked, view model not cached");
            return Rc::new(create());
        };

        if let Some(cached) = entries.get(&TypeId::of::<T>()) {
            if let Ok(value) = Rc::clone(&cached.value).downcast::<T>() {
                return value;
            }
        }

        let value = Rc::new(create());
        let type_name = std::any::type_name::<T>();
        tracing::trace!(id, type_name, "view model created");

        entries.insert(
            TypeId::of::<T>(),
            CachedViewModel {
                type_name,
                value: Rc::clone(&value) as Rc<dyn Any>,
            },
        );

        value
    }

    /// Number of view models cached for a route
    pub fn len_for(&self, id: RouteId) -> usize {
        self.routes.get(&id).map_or(0, |entries| entries.len())
    }

    /// Identities with a cache entry, in ascending order
    pub fn route_ids(&self) -> Vec<RouteId> {
        let mut ids: Vec<_> = self.routes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl fmt::Debug for ViewModelCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for id in self.route_ids() {
            let names: Vec<_> = self.routes[&id].values().map(|c| c.type_name).collect();
            map.entry(&id, &names);
        }
        map.finish()
    }
}
