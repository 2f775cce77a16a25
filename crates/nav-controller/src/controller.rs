//! Navigation controller
//!
//! [`NavController`] turns `push`/`pop` calls into changes of the declared
//! path, one at a time. Every applied operation leaves behind the
//! transitions ([`NavWait`]) the host widget must report before the next
//! operation may run, so a second push never reaches a widget that is still
//! animating the first one.
//!
//! # Example
//!
//! ```rust
//! use nav_controller::{NavController, NavWait};
//!
//! let mut nav = NavController::new("repos");
//! let root = nav.state().root_container.clone();
//!
//! // Nothing is applied before the host renders its first frame.
//! nav.push("files");
//! assert!(nav.path().is_empty());
//!
//! nav.on_appear(&root);
//! nav.on_shown();
//! assert_eq!(nav.path().len(), 1);
//!
//! let files = nav.active_container().clone();
//! assert_eq!(
//!     nav.state().nav_wait.iter().copied().collect::<Vec<_>>(),
//!     vec![NavWait::Appear(files.id), NavWait::Disappear(root.id)]
//! );
//! ```

use std::fmt;
use std::rc::Rc;
use tokio::sync::watch;

use crate::container::{RouteContainer, RouteId, RouteState};
use crate::state::{NavOp, NavWait, State};
use crate::view_models::ViewModelCache;

/// Declarative navigation controller for a host navigation widget
///
/// All methods must be called from the thread that owns the host widget.
/// Callers only read the state; it changes exclusively through the
/// operation API and the host callbacks.
pub struct NavController<R> {
    pub(crate) state: State<R>,
    pub(crate) view_models: ViewModelCache,
    state_tx: watch::Sender<State<R>>,
}

impl<R: Clone + fmt::Debug> NavController<R> {
    /// Create a controller showing `root_route` beneath an empty path
    pub fn new(root_route: R) -> Self {
        let state = State::new(root_route);

        let mut view_models = ViewModelCache::new();
        view_models.insert_route(state.root_container.id);

        let (state_tx, _) = watch::channel(state.clone());

        tracing::debug!(root = ?state.root_container.route, "navigation controller created");

        Self {
            state,
            view_models,
            state_tx,
        }
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Current state snapshot
    pub fn state(&self) -> &State<R> {
        &self.state
    }

    /// Declared path, bottom to top, excluding the root
    pub fn path(&self) -> &[RouteContainer<R>] {
        &self.state.path
    }

    /// Container on top of the path, or the root
    pub fn active_container(&self) -> &RouteContainer<R> {
        self.state.active_container()
    }

    /// Route of the active container
    pub fn active_route(&self) -> &R {
        self.state.active_route()
    }

    /// Check if a transition is queued, owed, or still on screen
    pub fn is_navigating(&self) -> bool {
        self.state.is_navigating()
    }

    /// Check if there is anything above the root
    pub fn can_go_back(&self) -> bool {
        self.state.can_go_back()
    }

    /// Tracked state of a route
    pub fn route_state(&self, id: RouteId) -> Option<&RouteState<R>> {
        self.state.routes_state.get(&id)
    }

    /// View models of the tracked routes
    pub fn view_models(&self) -> &ViewModelCache {
        &self.view_models
    }

    /// Watch every state the controller settles in
    ///
    /// The receiver starts at the current state and is updated once per
    /// operation or host callback.
    pub fn subscribe(&self) -> watch::Receiver<State<R>> {
        self.state_tx.subscribe()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Push a route on top of the path
    pub fn push(&mut self, route: R) {
        tracing::debug!(route = ?route, "push");

        self.enqueue(NavOp::Push(route));
    }

    /// Remove the top of the path. Does nothing if only the root is left.
    pub fn pop(&mut self) {
        tracing::debug!("pop");

        self.enqueue(NavOp::Pop);
    }

    /// Replace the whole path with new containers for `routes`
    pub fn replace(&mut self, routes: Vec<R>) {
        tracing::debug!(routes = ?routes, "replace");

        self.enqueue(NavOp::Replace(routes));
    }

    /// Remove everything above the root
    pub fn pop_to_root(&mut self) {
        self.replace(Vec::new());
    }

    /// Return the view model of type `T` for a route, creating it if needed
    ///
    /// The value lives as long as the route is tracked. Once the route is
    /// gone nothing is cached anymore and every call creates a new value.
    pub fn ensure_view_model<T: 'static>(
        &mut self,
        container: &RouteContainer<R>,
        create: impl FnOnce() -> T,
    ) -> Rc<T> {
        self.view_models.ensure(container.id, create)
    }

    // =========================================================================
    // Host Callbacks
    // =========================================================================

    /// The host mounted a container on screen
    pub fn on_appear(&mut self, container: &RouteContainer<R>) {
        tracing::debug!(id = container.id, route = ?container.route, "route appeared");

        if let Some(route_state) = self.state.routes_state.get_mut(&container.id) {
            route_state.visible = true;
        }

        self.process_nav_wait(NavWait::Appear(container.id));
        self.publish();
    }

    /// The host unmounted a container
    ///
    /// Callbacks for containers that are no longer tracked are ignored.
    pub fn on_disappear(&mut self, container: &RouteContainer<R>) {
        tracing::debug!(id = container.id, route = ?container.route, "route disappeared");

        let Some(route_state) = self.state.routes_state.get_mut(&container.id) else {
            tracing::trace!(id = container.id, "ignoring disappear of untracked route");
            return;
        };
        route_state.visible = false;

        self.cleanup_route(container.id);
        if self.state.is_tracked(container.id) {
            self.process_nav_wait(NavWait::Disappear(container.id));
        } else {
            self.settle_removed_route(container.id);
        }
        self.publish();
    }

    /// The host rendered its first frame
    pub fn on_shown(&mut self) {
        tracing::debug!("navigation shown");

        self.process_nav_wait(NavWait::Shown);
        self.publish();
    }

    // =========================================================================
    // Engine
    // =========================================================================

    fn enqueue(&mut self, op: NavOp<R>) {
        self.state.nav_op_queue.push_back(op);

        self.process_nav_ops();
        self.publish();
    }

    fn process_nav_ops(&mut self) {
        while self.state.nav_wait.is_empty() {
            let Some(op) = self.state.nav_op_queue.pop_front() else {
                break;
            };

            self.process_nav_op(op);
        }
    }

    fn process_nav_op(&mut self, op: NavOp<R>) {
        tracing::trace!(op = ?op, "applying nav op");

        match op {
            NavOp::Push(route) => self.process_nav_op_push(route),
            NavOp::Pop => self.process_nav_op_pop(),
            NavOp::Replace(routes) => self.process_nav_op_replace(routes),
        }
    }

    fn process_nav_op_push(&mut self, route: R) {
        let old_active_id = self.state.active_container().id;
        let container = self.build_route_container(route);
        let new_id = container.id;

        self.state.path.push(container);

        // the new route must appear and the old one disappear before the
        // next operation
        self.state.nav_wait.push_back(NavWait::Appear(new_id));
        self.state.nav_wait.push_back(NavWait::Disappear(old_active_id));
    }

    fn process_nav_op_pop(&mut self) {
        let Some(container) = self.state.path.pop() else {
            tracing::trace!("pop on empty path ignored");
            return;
        };

        self.refresh_in_path();

        if self.state.is_tracked(container.id) {
            self.state.nav_wait.push_back(NavWait::Disappear(container.id));
        }
    }

    fn process_nav_op_replace(&mut self, routes: Vec<R>) {
        let old_active_id = self.state.active_container().id;

        let path: Vec<_> = routes
            .into_iter()
            .map(|route| self.build_route_container(route))
            .collect();
        self.state.path = path;

        self.refresh_in_path();

        let new_active_id = self.state.active_container().id;
        if new_active_id == old_active_id {
            return;
        }

        // back at the root only the leaving screen is awaited, as with a pop
        if !self.state.path.is_empty() {
            self.state.nav_wait.push_back(NavWait::Appear(new_active_id));
        }

        if self.state.is_tracked(old_active_id) {
            self.state.nav_wait.push_back(NavWait::Disappear(old_active_id));
        }
    }

    fn build_route_container(&mut self, route: R) -> RouteContainer<R> {
        let id = self.state.next_id;
        debug_assert!(
            !self.state.routes_state.contains_key(&id),
            "route id {id} allocated twice"
        );
        self.state.next_id += 1;

        self.state
            .routes_state
            .insert(id, RouteState::new(id, route.clone(), true, false));
        self.view_models.insert_route(id);

        RouteContainer::new(id, route)
    }

    fn process_nav_wait(&mut self, nav_wait: NavWait) {
        if self.state.nav_wait.front() != Some(&nav_wait) {
            tracing::trace!(
                nav_wait = ?nav_wait,
                pending = ?self.state.nav_wait.front(),
                "nav wait not pending"
            );
            return;
        }

        self.state.nav_wait.pop_front();
        tracing::trace!(nav_wait = ?nav_wait, "nav wait resolved");

        self.process_nav_ops();
    }

    /// Settle the disappear owed by a route that was just removed
    ///
    /// A removed route never reports again, so its wait is dropped wherever
    /// it sits in the queue.
    fn settle_removed_route(&mut self, id: RouteId) {
        let owed = self.state.nav_wait.len();
        self.state
            .nav_wait
            .retain(|nav_wait| *nav_wait != NavWait::Disappear(id));

        if self.state.nav_wait.len() != owed {
            tracing::trace!(id, "nav wait resolved by route removal");
            self.process_nav_ops();
        }
    }

    /// Remove a route and its view models once it is neither in the path
    /// nor visible
    pub(crate) fn cleanup_route(&mut self, id: RouteId) {
        let removable = self
            .state
            .routes_state
            .get(&id)
            .is_some_and(RouteState::is_removable);

        if removable {
            self.state.routes_state.remove(&id);
            let dropped = self.view_models.remove_route(id);

            tracing::debug!(id, view_models = dropped, "route removed");
        }
    }

    pub(crate) fn publish(&self) {
        self.state_tx.send_replace(self.state.clone());
    }
}

impl<R: fmt::Debug> fmt::Debug for NavController<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavController")
            .field("state", &self.state)
            .field("view_models", &self.view_models)
            .finish()
    }
}
