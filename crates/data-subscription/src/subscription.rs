//! Live subscription values
//!
//! A [`Subscription`] subscribes on creation, keeps the latest value the
//! Data Service produced, and unsubscribes when dropped. View models own
//! their subscriptions, so removing a route from navigation releases them.

use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::source::{DataSource, SubscriptionCallback, SubscriptionId};

type DataListener<T> = Arc<dyn Fn(Option<T>) + Send + Sync>;

/// State shared between a subscription and its change callback
struct Shared<T> {
    id: OnceLock<SubscriptionId>,
    data: Mutex<Option<T>>,
    on_data: Mutex<Option<DataListener<T>>>,
}

impl<T: Clone> Shared<T> {
    fn refresh<S: DataSource<Data = T> + ?Sized>(&self, source: &S) {
        // callbacks fired from inside `subscribe` arrive before the id is known
        let Some(&id) = self.id.get() else {
            return;
        };

        let data = source.get_data(id);
        *self.data.lock() = data.clone();

        let listener = self.on_data.lock().clone();
        if let Some(listener) = listener {
            listener(data);
        }
    }
}

/// A subscription to one Data Service value
///
/// # Example
///
/// ```rust
/// use data_subscription::{DataSource, Subscription, SubscriptionCallback, SubscriptionId};
/// use std::sync::Arc;
///
/// struct Repos;
///
/// impl DataSource for Repos {
///     type Data = Vec<String>;
///
///     fn subscribe(&self, _callback: SubscriptionCallback) -> SubscriptionId {
///         1
///     }
///
///     fn get_data(&self, _id: SubscriptionId) -> Option<Vec<String>> {
///         Some(vec!["My safe box".to_string()])
///     }
///
///     fn unsubscribe(&self, _id: SubscriptionId) {}
/// }
///
/// let repos = Subscription::new(Arc::new(Repos));
/// assert_eq!(repos.data(), Some(vec!["My safe box".to_string()]));
/// ```
pub struct Subscription<S: DataSource> {
    source: Arc<S>,
    id: SubscriptionId,
    shared: Arc<Shared<S::Data>>,
}

impl<S> Subscription<S>
where
    S: DataSource + 'static,
    S::Data: Clone + Send + 'static,
{
    /// Subscribe and read the initial value
    pub fn new(source: Arc<S>) -> Self {
        let shared = Arc::new(Shared {
            id: OnceLock::new(),
            data: Mutex::new(None),
            on_data: Mutex::new(None),
        });

        let weak_source = Arc::downgrade(&source);
        let weak_shared = Arc::downgrade(&shared);
        let callback: SubscriptionCallback = Box::new(move || {
            if let (Some(source), Some(shared)) = (weak_source.upgrade(), weak_shared.upgrade()) {
                shared.refresh(&*source);
            }
        });

        let id = source.subscribe(callback);
        let _ = shared.id.set(id);
        shared.refresh(&*source);

        tracing::debug!(id, "subscribed");

        Self { source, id, shared }
    }

    /// Latest value, `None` until the Data Service has one
    pub fn data(&self) -> Option<S::Data> {
        self.shared.data.lock().clone()
    }

    /// Call `listener` now with the current value and after every change
    ///
    /// The listener must not call `set_on_data` itself.
    pub fn set_on_data(&self, listener: impl Fn(Option<S::Data>) + Send + Sync + 'static) {
        let listener: DataListener<S::Data> = Arc::new(listener);

        // a concurrent refresh reports only after this first call
        let mut on_data = self.shared.on_data.lock();
        *on_data = Some(Arc::clone(&listener));
        listener(self.data());
    }
}

impl<S: DataSource> Subscription<S> {
    /// Handle allocated by the Data Service
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl<S: DataSource> Drop for Subscription<S> {
    fn drop(&mut self) {
        tracing::debug!(id = self.id, "unsubscribed");

        self.source.unsubscribe(self.id);
    }
}

impl<S: DataSource> fmt::Debug for Subscription<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
