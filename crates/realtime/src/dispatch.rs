//! Event-to-refresh dispatch.
//!
//! Maps each parsed [`PushEvent`] to the partial refresh it demands.
//! Reactions are spawned, not awaited: events are dispatched strictly
//! in arrival order, but a slow refresh never delays the next event.
//! Overlapping reloads are safe under the store's sequence guard.

use std::sync::Arc;

use async_trait::async_trait;

use crate::messages::PushEvent;

/// The refresh operations the bridge can trigger on the rest of the
/// client. Implemented by the session context over the job store, the
/// provider directory, and the subscription collaborator.
#[async_trait]
pub trait RefreshHandler: Send + Sync {
    /// Re-fetch the creator perspective of the job store.
    async fn reload_creator_jobs(&self);

    /// Mark one directory entry as revealed (narrow update).
    async fn reveal_provider(&self, user_id: &str);

    /// Full directory reload, including the browsing list.
    async fn reload_directory(&self);

    /// Refresh subscription entitlement state (external collaborator).
    async fn refresh_subscription(&self);
}

/// Kick off the reaction for one event.
pub fn dispatch_event(event: PushEvent, handler: &Arc<dyn RefreshHandler>) {
    let handler = Arc::clone(handler);
    match event {
        PushEvent::JobPaymentSucceeded => {
            tracing::debug!("Job payment succeeded, reloading creator jobs");
            tokio::spawn(async move { handler.reload_creator_jobs().await });
        }
        PushEvent::UserInfoPaymentSucceeded {
            user_id: Some(user_id),
        } => {
            tracing::debug!(user_id = %user_id, "User-info payment succeeded");
            tokio::spawn(async move {
                handler.reveal_provider(&user_id).await;
                // The browsing list must be re-fetched either way.
                handler.reload_directory().await;
            });
        }
        PushEvent::UserInfoPaymentSucceeded { user_id: None } => {
            tracing::debug!("User-info payment without target, full directory reload");
            tokio::spawn(async move { handler.reload_directory().await });
        }
        event if event.is_subscription_event() => {
            tracing::debug!(?event, "Subscription event, refreshing entitlements");
            tokio::spawn(async move { handler.refresh_subscription().await });
        }
        event => {
            // Unreachable today; kept so adding a variant forces a choice.
            tracing::trace!(?event, "Push event with no mapped reaction");
        }
    }
}
