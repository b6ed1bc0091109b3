//! Session context and manager.

use std::sync::Arc;

use async_trait::async_trait;
use worklink_core::SessionIdentity;
use worklink_directory::ProviderDirectory;
use worklink_gateway::{HttpGateway, JobGateway, UserGateway};
use worklink_realtime::{
    BridgeHandle, BridgeStatus, RealtimeBridge, ReconnectConfig, RefreshHandler,
};
use worklink_store::JobStore;

use crate::subscription::SubscriptionRefresher;

/// Builds gateway clients for an identity. Lets tests substitute
/// in-memory gateways for the HTTP ones.
pub trait GatewayFactory: Send + Sync {
    fn job_gateway(&self, identity: &SessionIdentity) -> Arc<dyn JobGateway>;
    fn user_gateway(&self, identity: &SessionIdentity) -> Arc<dyn UserGateway>;
}

/// Production factory: one shared [`HttpGateway`] per identity.
pub struct HttpGatewayFactory;

impl GatewayFactory for HttpGatewayFactory {
    fn job_gateway(&self, identity: &SessionIdentity) -> Arc<dyn JobGateway> {
        Arc::new(HttpGateway::new(identity))
    }

    fn user_gateway(&self, identity: &SessionIdentity) -> Arc<dyn UserGateway> {
        Arc::new(HttpGateway::new(identity))
    }
}

/// Everything that lives exactly as long as one session identity.
pub struct SessionContext {
    identity: SessionIdentity,
    store: Arc<JobStore>,
    directory: Arc<ProviderDirectory>,
    bridge: BridgeHandle,
}

impl SessionContext {
    /// Build the store, directory and bridge for `identity`, then issue
    /// the initial full reload before returning.
    pub async fn open(
        identity: SessionIdentity,
        job_gateway: Arc<dyn JobGateway>,
        user_gateway: Arc<dyn UserGateway>,
        subscription: Arc<dyn SubscriptionRefresher>,
        reconnect: ReconnectConfig,
    ) -> Self {
        let store = JobStore::new(job_gateway);
        let directory = ProviderDirectory::new(user_gateway);

        let refresher: Arc<dyn RefreshHandler> = Arc::new(SessionRefresher {
            store: store.clone(),
            directory: directory.clone(),
            subscription,
        });
        let bridge = RealtimeBridge::start(identity.clone(), refresher, reconnect);

        tracing::info!(user_id = %identity.user_id, "Session opened, loading replica");
        store.reload_all().await;

        Self {
            identity,
            store,
            directory,
            bridge,
        }
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    pub fn store(&self) -> &Arc<JobStore> {
        &self.store
    }

    pub fn directory(&self) -> &Arc<ProviderDirectory> {
        &self.directory
    }

    /// Watch the realtime bridge's connection state.
    pub fn bridge_status(&self) -> tokio::sync::watch::Receiver<BridgeStatus> {
        self.bridge.status()
    }

    /// Tear everything down: the store stops applying in-flight
    /// results, and the push connection is closed.
    pub async fn close(self) {
        tracing::info!(user_id = %self.identity.user_id, "Closing session");
        self.store.close().await;
        self.bridge.shutdown().await;
    }
}

/// Fans push-event reactions out to the session's components.
struct SessionRefresher {
    store: Arc<JobStore>,
    directory: Arc<ProviderDirectory>,
    subscription: Arc<dyn SubscriptionRefresher>,
}

#[async_trait]
impl RefreshHandler for SessionRefresher {
    async fn reload_creator_jobs(&self) {
        self.store.reload_creator().await;
    }

    async fn reveal_provider(&self, user_id: &str) {
        self.directory.mark_revealed(user_id).await;
    }

    async fn reload_directory(&self) {
        self.directory.reload().await;
    }

    async fn refresh_subscription(&self) {
        self.subscription.refresh().await;
    }
}

/// Top-level owner of the current session context.
///
/// Callers feed it `Some(identity)` once all three identity fields are
/// defined (and again on every change) and `None` on logout; the
/// manager opens and closes contexts accordingly.
pub struct SessionManager {
    gateways: Arc<dyn GatewayFactory>,
    subscription: Arc<dyn SubscriptionRefresher>,
    reconnect: ReconnectConfig,
    current: Option<SessionContext>,
}

impl SessionManager {
    pub fn new(
        gateways: Arc<dyn GatewayFactory>,
        subscription: Arc<dyn SubscriptionRefresher>,
        reconnect: ReconnectConfig,
    ) -> Self {
        Self {
            gateways,
            subscription,
            reconnect,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&SessionContext> {
        self.current.as_ref()
    }

    /// Apply the trigger policy for an identity change.
    ///
    /// An unchanged identity is a no-op; anything else closes the old
    /// context (if any) and opens a fresh one (if an identity remains).
    pub async fn set_identity(&mut self, identity: Option<SessionIdentity>) {
        if self.current.as_ref().map(SessionContext::identity) == identity.as_ref() {
            return;
        }

        if let Some(context) = self.current.take() {
            context.close().await;
        }

        if let Some(identity) = identity {
            let context = SessionContext::open(
                identity.clone(),
                self.gateways.job_gateway(&identity),
                self.gateways.user_gateway(&identity),
                self.subscription.clone(),
                self.reconnect.clone(),
            )
            .await;
            self.current = Some(context);
        }
    }
}
