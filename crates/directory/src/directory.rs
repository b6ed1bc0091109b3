//! The directory cache proper.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, Mutex, RwLock};
use worklink_core::{DirectoryEntry, UserId};
use worklink_gateway::UserGateway;

use crate::error::DirectoryError;

type FetchResult = Result<DirectoryEntry, String>;

#[derive(Default)]
struct DirectoryState {
    /// Ids shown on the browsing list, in server order. Replaced
    /// wholesale by every successful reload.
    listing: Vec<UserId>,
    /// Merge-only profile cache. Never evicted.
    cache: HashMap<UserId, DirectoryEntry>,
    loading: bool,
    error: Option<String>,
}

/// Lazily-populated cache of other users' profiles for one session.
pub struct ProviderDirectory {
    gateway: Arc<dyn UserGateway>,
    state: RwLock<DirectoryState>,
    /// Single-entry fetches currently in flight, keyed by user id.
    /// Concurrent misses for the same id join the first fetch instead
    /// of issuing a redundant one.
    inflight: Mutex<HashMap<UserId, broadcast::Sender<FetchResult>>>,
}

impl ProviderDirectory {
    pub fn new(gateway: Arc<dyn UserGateway>) -> Arc<Self> {
        Arc::new(Self {
            gateway,
            state: RwLock::new(DirectoryState::default()),
            inflight: Mutex::new(HashMap::new()),
        })
    }

    // ---- accessors ----

    /// Profiles on the browsing list, in server order.
    pub async fn browsing_list(&self) -> Vec<DirectoryEntry> {
        let state = self.state.read().await;
        state
            .listing
            .iter()
            .filter_map(|id| state.cache.get(id).cloned())
            .collect()
    }

    /// Cached profile, if any. Never touches the network.
    pub async fn cached_user(&self, id: &str) -> Option<DirectoryEntry> {
        self.state.read().await.cache.get(id).cloned()
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn loading(&self) -> bool {
        self.state.read().await.loading
    }

    // ---- operations ----

    /// Fetch the full "other users" list: replace the browsing list and
    /// merge every entry into the cache. Ids absent from the batch keep
    /// their cached entries; a previously set `revealed` flag survives
    /// the overwrite. Failures are recorded and leave everything as-is.
    pub async fn reload(&self) {
        self.state.write().await.loading = true;

        match self.gateway.list_other_users().await {
            Ok(entries) => {
                let mut state = self.state.write().await;
                state.listing = entries.iter().map(|e| e.id.clone()).collect();
                for mut entry in entries {
                    if let Some(existing) = state.cache.get(&entry.id) {
                        entry.revealed = entry.revealed || existing.revealed;
                    }
                    state.cache.insert(entry.id.clone(), entry);
                }
                state.loading = false;
                state.error = None;
                tracing::debug!(count = state.listing.len(), "Directory reloaded");
            }
            Err(e) => {
                let mut state = self.state.write().await;
                state.loading = false;
                state.error = Some(e.to_string());
                tracing::warn!(error = %e, "Directory reload failed, keeping cache");
            }
        }
    }

    /// Look a user up: cache hit returns immediately, a miss fetches
    /// the single profile and caches it. Concurrent misses for the same
    /// id share one in-flight request.
    pub async fn get_user_by_id(&self, id: &str) -> Result<DirectoryEntry, DirectoryError> {
        if let Some(entry) = self.cached_user(id).await {
            return Ok(entry);
        }

        let mut follower = {
            let mut inflight = self.inflight.lock().await;
            match inflight.get(id) {
                Some(tx) => Some(tx.subscribe()),
                None => {
                    let (tx, _) = broadcast::channel(1);
                    inflight.insert(id.to_string(), tx);
                    None
                }
            }
        };

        if let Some(rx) = follower.as_mut() {
            return match rx.recv().await {
                Ok(Ok(entry)) => Ok(entry),
                Ok(Err(message)) => Err(DirectoryError::SharedFetch(message)),
                Err(_) => Err(DirectoryError::SharedFetch(
                    "concurrent profile fetch was dropped".to_string(),
                )),
            };
        }

        let result = self.gateway.get_user(id).await;

        if let Ok(entry) = &result {
            let mut state = self.state.write().await;
            let mut entry = entry.clone();
            if let Some(existing) = state.cache.get(id) {
                entry.revealed = entry.revealed || existing.revealed;
            }
            state.cache.insert(entry.id.clone(), entry);
        }

        let tx = self.inflight.lock().await.remove(id);
        if let Some(tx) = tx {
            let shared = result
                .as_ref()
                .map(|entry| entry.clone())
                .map_err(|e| e.to_string());
            let _ = tx.send(shared);
        }

        Ok(result?)
    }

    /// Narrow update: mark one cached entry as revealed (its contact
    /// details were paid for). No-op when the entry is not cached yet.
    pub async fn mark_revealed(&self, id: &str) -> bool {
        let mut state = self.state.write().await;
        match state.cache.get_mut(id) {
            Some(entry) => {
                entry.revealed = true;
                true
            }
            None => {
                tracing::debug!(user_id = %id, "Reveal for uncached entry ignored");
                false
            }
        }
    }
}
