//! Waiting for a first value
//!
//! Some flows only need a value once, e.g. a dialog that needs the repo
//! list before it can render. [`subscription_wait`] subscribes, resolves
//! with the first value the Data Service produces and unsubscribes again.

use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::source::{DataSource, SubscriptionCallback, SubscriptionId};

/// Subscription wait errors
#[derive(Debug, Error)]
pub enum SubscriptionError {
    /// The Data Service dropped the callback before producing a value
    #[error("Subscription closed before data was available")]
    Closed,

    /// No value arrived in time
    #[error("Subscription timeout after {0:?}")]
    Timeout(Duration),
}

/// Result type for subscription waits
pub type Result<T> = std::result::Result<T, SubscriptionError>;

/// Unsubscribes when the wait completes or is cancelled
struct UnsubscribeGuard<'a, S: DataSource> {
    source: &'a S,
    id: SubscriptionId,
}

impl<S: DataSource> Drop for UnsubscribeGuard<'_, S> {
    fn drop(&mut self) {
        self.source.unsubscribe(self.id);
    }
}

/// Wait for the first value of a subscription
///
/// Fails with [`SubscriptionError::Closed`] if the Data Service drops the
/// callback without ever producing a value.
pub async fn subscription_wait<S>(source: Arc<S>) -> Result<S::Data>
where
    S: DataSource + 'static,
    S::Data: Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    let tx = Arc::new(Mutex::new(Some(tx)));
    let id_slot: Arc<OnceLock<SubscriptionId>> = Arc::new(OnceLock::new());

    let callback: SubscriptionCallback = {
        let weak_source = Arc::downgrade(&source);
        let tx = Arc::clone(&tx);
        let id_slot = Arc::clone(&id_slot);

        Box::new(move || {
            let (Some(source), Some(&id)) = (weak_source.upgrade(), id_slot.get()) else {
                return;
            };

            if let Some(data) = source.get_data(id) {
                if let Some(tx) = tx.lock().take() {
                    let _ = tx.send(data);
                }
            }
        })
    };

    let id = source.subscribe(callback);
    let _ = id_slot.set(id);
    let _guard = UnsubscribeGuard {
        source: &*source,
        id,
    };

    if let Some(data) = source.get_data(id) {
        tracing::debug!(id, "subscription data already available");
        return Ok(data);
    }

    // from here on only the callback keeps the sender alive
    drop(tx);

    let data = rx.await.map_err(|_| SubscriptionError::Closed)?;
    tracing::debug!(id, "subscription data available");

    Ok(data)
}

/// [`subscription_wait`] with an upper bound on the waiting time
pub async fn subscription_wait_timeout<S>(source: Arc<S>, timeout: Duration) -> Result<S::Data>
where
    S: DataSource + 'static,
    S::Data: Send + 'static,
{
    tokio::time::timeout(timeout, subscription_wait(source))
        .await
        .map_err(|_| SubscriptionError::Timeout(timeout))?
}
