//! Subscription entitlement refresh seam.
//!
//! Subscription state itself lives outside this library; the bridge
//! only needs a way to ask for a refresh when one of the subscription
//! push events arrives.

use async_trait::async_trait;

/// External collaborator holding subscription entitlement state.
#[async_trait]
pub trait SubscriptionRefresher: Send + Sync {
    /// Re-fetch entitlement state from wherever it lives.
    async fn refresh(&self);
}

/// No-op refresher for applications without a subscription feature.
pub struct NullSubscriptionRefresher;

#[async_trait]
impl SubscriptionRefresher for NullSubscriptionRefresher {
    async fn refresh(&self) {
        tracing::debug!("Subscription refresh requested, no refresher configured");
    }
}
