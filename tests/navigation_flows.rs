//! End-to-end navigation flows
//!
//! Drives a [`MainNavController`] the way the host navigation widget does,
//! with view models that hold live subscriptions to an in-memory Data
//! Service.

use navsync::{
    subscription_wait, DataSource, MainNavController, MainRoute, NavWait, RouteContainer,
    State, Subscription, SubscriptionCallback, SubscriptionId, ROOT_ROUTE_ID,
};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// =============================================================================
// Test Fixtures
// =============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// In-memory Data Service serving the repository list
#[derive(Default)]
struct FakeDataService {
    next_id: AtomicU32,
    callbacks: Mutex<HashMap<SubscriptionId, SubscriptionCallback>>,
    repos: Mutex<Option<Vec<String>>>,
}

impl FakeDataService {
    fn with_repos(names: &[&str]) -> Arc<Self> {
        let service = Self::default();
        *service.repos.lock() = Some(names.iter().map(|n| n.to_string()).collect());
        Arc::new(service)
    }

    fn set_repos(&self, names: &[&str]) {
        *self.repos.lock() = Some(names.iter().map(|n| n.to_string()).collect());

        for callback in self.callbacks.lock().values() {
            callback();
        }
    }

    fn active_subscriptions(&self) -> usize {
        self.callbacks.lock().len()
    }
}

impl DataSource for FakeDataService {
    type Data = Vec<String>;

    fn subscribe(&self, callback: SubscriptionCallback) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.callbacks.lock().insert(id, callback);
        id
    }

    fn get_data(&self, _id: SubscriptionId) -> Option<Vec<String>> {
        self.repos.lock().clone()
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.callbacks.lock().remove(&id);
    }
}

struct ReposViewModel {
    repos: Subscription<FakeDataService>,
}

impl ReposViewModel {
    fn new(service: &Arc<FakeDataService>) -> Self {
        Self {
            repos: Subscription::new(Arc::clone(service)),
        }
    }
}

struct RepoFilesViewModel {
    repo_id: String,
    _repos: Subscription<FakeDataService>,
}

impl RepoFilesViewModel {
    fn new(service: &Arc<FakeDataService>, route: &MainRoute) -> Self {
        Self {
            repo_id: route.repo_id().unwrap_or_default().to_string(),
            _repos: Subscription::new(Arc::clone(service)),
        }
    }
}

/// Controller whose root has been shown, with a view model on the root
fn shown_controller(service: &Arc<FakeDataService>) -> MainNavController {
    let mut nav = MainNavController::new(MainRoute::Repos);
    let root = nav.state().root_container.clone();

    let _ = nav.ensure_view_model(&root, || ReposViewModel::new(service));
    nav.on_appear(&root);
    nav.on_shown();

    nav
}

fn root(nav: &MainNavController) -> RouteContainer<MainRoute> {
    nav.state().root_container.clone()
}

fn path_ids(nav: &MainNavController) -> Vec<u64> {
    nav.path().iter().map(|c| c.id).collect()
}

// =============================================================================
// Flows
// =============================================================================

#[test]
fn test_open_repo_and_go_back() {
    init_tracing();

    let service = FakeDataService::with_repos(&["Photos"]);
    let mut nav = shown_controller(&service);
    let root = root(&nav);
    assert_eq!(service.active_subscriptions(), 1);

    nav.push(MainRoute::repo_root("r1"));
    let files = nav.active_container().clone();
    assert!(files.route.requires_unlock());

    let files_vm = nav.ensure_view_model(&files, || RepoFilesViewModel::new(&service, &files.route));
    assert_eq!(files_vm.repo_id, "r1");
    assert_eq!(service.active_subscriptions(), 2);
    drop(files_vm);

    nav.on_appear(&files);
    nav.on_disappear(&root);
    assert!(!nav.is_navigating());
    assert!(nav.can_go_back());

    // the root keeps its view model while covered
    assert!(nav.view_models().get::<ReposViewModel>(ROOT_ROUTE_ID).is_some());

    nav.pop();
    assert_eq!(
        nav.state().nav_wait.iter().copied().collect::<Vec<_>>(),
        vec![NavWait::Disappear(files.id)]
    );

    nav.on_appear(&root);
    assert_eq!(service.active_subscriptions(), 2);

    nav.on_disappear(&files);
    assert!(nav.route_state(files.id).is_none());
    assert_eq!(service.active_subscriptions(), 1);
    assert!(!nav.is_navigating());
    assert!(!nav.can_go_back());
}

#[test]
fn test_back_gesture_releases_subscriptions() {
    init_tracing();

    let service = FakeDataService::with_repos(&["Photos"]);
    let mut nav = shown_controller(&service);
    let root = root(&nav);

    nav.push(MainRoute::repo_root("r1"));
    let files = nav.active_container().clone();
    let _ = nav.ensure_view_model(&files, || RepoFilesViewModel::new(&service, &files.route));
    nav.on_appear(&files);
    nav.on_disappear(&root);

    nav.push(MainRoute::RepoFilesDetails {
        repo_id: "r1".to_string(),
        encrypted_path: "/a.jpg".to_string(),
    });
    let details = nav.active_container().clone();
    let _ = nav.ensure_view_model(&details, || RepoFilesViewModel::new(&service, &details.route));
    nav.on_appear(&details);
    nav.on_disappear(&files);
    assert_eq!(service.active_subscriptions(), 3);

    // the user swipes back past both screens at once
    nav.on_path_changed(Vec::new());
    assert!(nav.path().is_empty());
    assert!(nav.route_state(files.id).is_none());
    assert_eq!(service.active_subscriptions(), 2);

    nav.on_appear(&root);
    nav.on_disappear(&details);
    assert_eq!(service.active_subscriptions(), 1);
    assert_eq!(nav.view_models().route_ids(), vec![ROOT_ROUTE_ID]);
    assert!(!nav.is_navigating());
}

#[test]
fn test_deep_link_then_pop_to_root() {
    init_tracing();

    let service = FakeDataService::with_repos(&["Photos"]);
    let mut nav = shown_controller(&service);
    let root = root(&nav);

    nav.replace(vec![
        MainRoute::RepoInfo {
            repo_id: "r1".to_string(),
        },
        MainRoute::repo_root("r1"),
    ]);
    assert_eq!(path_ids(&nav), vec![1, 2]);

    let info = nav.path()[0].clone();
    let files = nav.active_container().clone();
    nav.on_appear(&files);
    nav.on_disappear(&root);
    assert!(!nav.is_navigating());

    // the screen below the top is tracked without ever being shown
    let info_state = nav.route_state(info.id).cloned();
    assert!(info_state.is_some_and(|s| s.in_path && !s.visible));

    nav.pop_to_root();
    assert!(nav.route_state(info.id).is_none());
    assert_eq!(
        nav.state().nav_wait.iter().copied().collect::<Vec<_>>(),
        vec![NavWait::Disappear(files.id)]
    );

    // the host reports the leaving screen first
    nav.on_disappear(&files);
    nav.on_appear(&root);
    assert_eq!(nav.state().routes_state.len(), 1);
    assert!(!nav.is_navigating());
    assert_eq!(nav.active_route(), &MainRoute::Repos);
}

#[test]
fn test_rapid_taps_are_serialized() {
    init_tracing();

    let service = FakeDataService::with_repos(&[]);
    let mut nav = shown_controller(&service);
    let root = root(&nav);

    nav.push(MainRoute::RepoCreate);
    nav.push(MainRoute::RepoCreate);
    assert_eq!(nav.path().len(), 1);
    assert_eq!(nav.state().nav_op_queue.len(), 1);

    let first = nav.active_container().clone();
    nav.on_appear(&first);
    nav.on_disappear(&root);

    // the second tap is applied once the first push settled
    assert_eq!(path_ids(&nav), vec![1, 2]);
    assert_eq!(nav.path()[0].route, nav.path()[1].route);
}

#[test]
fn test_view_model_follows_data_updates() {
    init_tracing();

    let service = Arc::new(FakeDataService::default());
    let mut nav = shown_controller(&service);
    let root = root(&nav);

    let repos_vm = nav.ensure_view_model(&root, || ReposViewModel::new(&service));
    assert_eq!(repos_vm.repos.data(), None);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let listener_seen = Arc::clone(&seen);
    repos_vm
        .repos
        .set_on_data(move |repos| listener_seen.lock().push(repos.map(|r| r.len())));

    service.set_repos(&["Photos", "Documents"]);
    assert_eq!(
        repos_vm.repos.data(),
        Some(vec!["Photos".to_string(), "Documents".to_string()])
    );
    assert_eq!(*seen.lock(), vec![None, Some(2)]);
}

#[tokio::test]
async fn test_state_watch_follows_navigation() {
    init_tracing();

    let service = FakeDataService::with_repos(&["Photos"]);
    let mut nav = shown_controller(&service);
    let mut rx = nav.subscribe();
    assert!(rx.borrow_and_update().path.is_empty());

    nav.push(MainRoute::repo_root("r1"));
    rx.changed().await.unwrap();

    let state = rx.borrow_and_update().clone();
    assert_eq!(state.active_route(), &MainRoute::repo_root("r1"));
    assert!(state.is_navigating());
}

#[tokio::test]
async fn test_wait_for_first_repo_list() {
    init_tracing();

    let service = Arc::new(FakeDataService::default());
    let wait = tokio::spawn(subscription_wait(Arc::clone(&service)));

    while service.active_subscriptions() == 0 {
        tokio::task::yield_now().await;
    }
    service.set_repos(&["Photos"]);

    let repos = wait.await.unwrap().unwrap();
    assert_eq!(repos, vec!["Photos".to_string()]);
    assert_eq!(service.active_subscriptions(), 0);
}

#[test]
fn test_state_snapshot_serialization() {
    init_tracing();

    let service = FakeDataService::with_repos(&[]);
    let mut nav = shown_controller(&service);
    nav.push(MainRoute::repo_root("r1"));

    let value = serde_json::to_value(nav.state()).unwrap();
    assert_eq!(
        value["path"],
        json!([{
            "id": 1,
            "route": {
                "route": "RepoFiles",
                "params": { "repo_id": "r1", "encrypted_path": "/" }
            }
        }])
    );
    assert_eq!(
        value["nav_wait"],
        json!([{ "wait": "appear", "id": 1 }, { "wait": "disappear", "id": 0 }])
    );

    let restored: State<MainRoute> = serde_json::from_value(value).unwrap();
    assert_eq!(&restored, nav.state());
}
