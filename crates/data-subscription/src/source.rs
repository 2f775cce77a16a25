//! Data Service contract

/// Handle of one subscription, allocated by the Data Service
pub type SubscriptionId = u32;

/// Called by the Data Service whenever the subscribed value may have changed
pub type SubscriptionCallback = Box<dyn Fn() + Send + Sync>;

/// One logical subscription of the Data Service
///
/// The Data Service may invoke callbacks from its own threads. It keeps a
/// callback until the matching [`DataSource::unsubscribe`] and must ignore
/// unknown ids.
#[cfg_attr(test, mockall::automock(type Data = String;))]
pub trait DataSource: Send + Sync {
    /// Value produced by this subscription
    type Data;

    /// Register a change callback
    fn subscribe(&self, callback: SubscriptionCallback) -> SubscriptionId;

    /// Current value for a subscription, if available yet
    fn get_data(&self, id: SubscriptionId) -> Option<Self::Data>;

    /// Drop a subscription and its callback
    fn unsubscribe(&self, id: SubscriptionId);
}
