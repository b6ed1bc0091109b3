//! Shared fixtures for session tests: an in-memory backend standing in
//! for the HTTP gateway, and a recording subscription refresher.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::{mpsc, Mutex};
use worklink_core::{Bucket, DirectoryEntry, Job, Perspective, SessionIdentity};
use worklink_gateway::{CompletionOptions, GatewayError, JobGateway, UserGateway};
use worklink_realtime::ReconnectConfig;
use worklink_session::{GatewayFactory, SubscriptionRefresher};

/// In-memory stand-in for the remote authority.
pub struct MockBackend {
    buckets: Mutex<HashMap<(Perspective, Bucket), Vec<Job>>>,
    others: Mutex<Vec<DirectoryEntry>>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            buckets: Mutex::new(HashMap::new()),
            others: Mutex::new(Vec::new()),
        })
    }

    pub async fn set_bucket(&self, perspective: Perspective, bucket: Bucket, jobs: Vec<Job>) {
        self.buckets
            .lock()
            .await
            .insert((perspective, bucket), jobs);
    }

    pub async fn set_others(&self, entries: Vec<DirectoryEntry>) {
        *self.others.lock().await = entries;
    }
}

#[async_trait]
impl JobGateway for MockBackend {
    async fn list_jobs(
        &self,
        perspective: Perspective,
        bucket: Bucket,
    ) -> Result<Vec<Job>, GatewayError> {
        Ok(self
            .buckets
            .lock()
            .await
            .get(&(perspective, bucket))
            .cloned()
            .unwrap_or_default())
    }

    async fn get_job(&self, id: &str) -> Result<Job, GatewayError> {
        Err(GatewayError::Api {
            status: 404,
            message: format!("job {id} not found"),
        })
    }

    async fn delete_job(&self, _id: &str) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn close_job(&self, _id: &str) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn mark_done(&self, _id: &str, _options: &CompletionOptions) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn assign_executor(&self, _id: &str, _executor_id: &str) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn unassign_executor(&self, _id: &str) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn nominate_provider(&self, _id: &str) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn withdraw_provider(&self, _id: &str) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn is_provider_in_job(&self, _id: &str) -> Result<bool, GatewayError> {
        Ok(false)
    }
}

#[async_trait]
impl UserGateway for MockBackend {
    async fn list_other_users(&self) -> Result<Vec<DirectoryEntry>, GatewayError> {
        Ok(self.others.lock().await.clone())
    }

    async fn get_user(&self, id: &str) -> Result<DirectoryEntry, GatewayError> {
        self.others
            .lock()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(GatewayError::Api {
                status: 404,
                message: format!("user {id} not found"),
            })
    }
}

/// Hands the same backend out for every identity.
pub struct FixedGatewayFactory {
    pub backend: Arc<MockBackend>,
}

impl GatewayFactory for FixedGatewayFactory {
    fn job_gateway(&self, _identity: &SessionIdentity) -> Arc<dyn JobGateway> {
        self.backend.clone()
    }

    fn user_gateway(&self, _identity: &SessionIdentity) -> Arc<dyn UserGateway> {
        self.backend.clone()
    }
}

/// Sends a marker for every requested entitlement refresh.
pub struct RecordingSubscription {
    pub tx: mpsc::UnboundedSender<()>,
}

#[async_trait]
impl SubscriptionRefresher for RecordingSubscription {
    async fn refresh(&self) {
        let _ = self.tx.send(());
    }
}

/// Reconnect settings that fail fast when no push server exists.
pub fn quiet_reconnect() -> ReconnectConfig {
    ReconnectConfig {
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(2),
        jitter: 0.0,
        max_attempts: 1,
        ..Default::default()
    }
}

/// Reconnect settings for tests that do run a push server.
pub fn fast_reconnect() -> ReconnectConfig {
    ReconnectConfig {
        initial_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(50),
        jitter: 0.0,
        max_attempts: 20,
        ..Default::default()
    }
}

pub fn job(id: &str) -> Job {
    Job {
        id: id.to_string(),
        job_type: "repair".into(),
        subtype: None,
        profession: "plumber".into(),
        description: String::new(),
        price: Decimal::new(100, 0),
        image_urls: vec![],
        location: None,
        starts_at: None,
        ends_at: None,
        creator_id: "creator-1".into(),
        executor_id: None,
        provider_ids: vec![],
        comment: None,
        history: vec![],
    }
}

pub fn entry(id: &str, name: &str) -> DirectoryEntry {
    DirectoryEntry {
        id: id.to_string(),
        name: name.to_string(),
        surname: String::new(),
        avatar_url: None,
        professions: vec![],
        job_types: vec![],
        phone: None,
        email: None,
        revealed: false,
    }
}

/// Opt into log output for a test run.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_test_writer()
        .try_init();
}
