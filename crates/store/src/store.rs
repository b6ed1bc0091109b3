//! The canonical local job replica.
//!
//! [`JobStore`] is created per session identity and shared via `Arc`.
//! Reloads fetch every bucket of a perspective concurrently and swap
//! the snapshot only when all fetches succeed; a failed reload leaves
//! the previous snapshot in place and records the error. Mutations
//! perform one authoritative write and then trigger a full reload
//! before resolving -- no optimistic local mutation.
//!
//! Every reload captures a per-perspective sequence ticket at start; a
//! result is applied only while its ticket is still the newest and the
//! store is still open. Closing the store bumps both sequences, so a
//! late-resolving response from a torn-down session can never mutate
//! state, and a slow stale reload can never overwrite a fresher one.

use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use worklink_core::{Bucket, Job, Perspective};
use worklink_gateway::{CompletionOptions, GatewayError, JobGateway};

use crate::error::StoreError;
use crate::snapshot::{CreatorJobs, ExecutorJobs};

/// Buffer capacity for the store-update broadcast channel.
const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Notification that one perspective's snapshot was replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreUpdate {
    pub perspective: Perspective,
}

/// Per-perspective sync bookkeeping.
#[derive(Debug, Default)]
struct SyncSlot {
    loading: bool,
    error: Option<String>,
    /// Bumped by every reload start and by [`JobStore::close`].
    seq: u64,
}

#[derive(Debug, Default)]
struct StoreState {
    creator: CreatorJobs,
    executor: ExecutorJobs,
    creator_sync: SyncSlot,
    executor_sync: SyncSlot,
    /// Cleared on teardown; no result is applied afterwards.
    open: bool,
}

/// The authoritative local replica of jobs for one session identity.
pub struct JobStore {
    gateway: Arc<dyn JobGateway>,
    state: RwLock<StoreState>,
    update_tx: broadcast::Sender<StoreUpdate>,
}

impl JobStore {
    /// Create an open store. No reload is issued here; the session
    /// context triggers the first one when the identity is complete.
    pub fn new(gateway: Arc<dyn JobGateway>) -> Arc<Self> {
        let (update_tx, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Arc::new(Self {
            gateway,
            state: RwLock::new(StoreState {
                open: true,
                ..Default::default()
            }),
            update_tx,
        })
    }

    /// Subscribe to snapshot-replacement notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreUpdate> {
        self.update_tx.subscribe()
    }

    /// Tear the store down. Bumps both reload sequences so in-flight
    /// responses are discarded, and wakes subscribers so derived tasks
    /// can observe the closed store and exit.
    pub async fn close(&self) {
        let mut state = self.state.write().await;
        state.open = false;
        state.creator_sync.seq += 1;
        state.executor_sync.seq += 1;
        drop(state);
        let _ = self.update_tx.send(StoreUpdate {
            perspective: Perspective::Creator,
        });
        let _ = self.update_tx.send(StoreUpdate {
            perspective: Perspective::Executor,
        });
        tracing::debug!("Job store closed");
    }

    pub async fn is_open(&self) -> bool {
        self.state.read().await.open
    }

    // ---- snapshot accessors ----

    pub async fn creator_jobs(&self) -> CreatorJobs {
        self.state.read().await.creator.clone()
    }

    pub async fn executor_jobs(&self) -> ExecutorJobs {
        self.state.read().await.executor.clone()
    }

    /// First bucket of `perspective` currently containing `id`.
    pub async fn locate_job(&self, perspective: Perspective, id: &str) -> Option<Bucket> {
        let state = self.state.read().await;
        match perspective {
            Perspective::Creator => state.creator.locate(id),
            Perspective::Executor => state.executor.locate(id),
        }
    }

    pub async fn creator_error(&self) -> Option<String> {
        self.state.read().await.creator_sync.error.clone()
    }

    pub async fn executor_error(&self) -> Option<String> {
        self.state.read().await.executor_sync.error.clone()
    }

    pub async fn creator_loading(&self) -> bool {
        self.state.read().await.creator_sync.loading
    }

    pub async fn executor_loading(&self) -> bool {
        self.state.read().await.executor_sync.loading
    }

    // ---- reloads ----

    /// Reload every creator bucket. All-or-nothing: on any fetch error
    /// the previous snapshot stays and the error slot is set.
    pub async fn reload_creator(&self) {
        let Some(ticket) = self.begin_reload(Perspective::Creator).await else {
            return;
        };

        let result = futures::try_join!(
            self.gateway.list_jobs(Perspective::Creator, Bucket::Waiting),
            self.gateway
                .list_jobs(Perspective::Creator, Bucket::InProgress),
            self.gateway.list_jobs(Perspective::Creator, Bucket::Done),
        );

        let mut state = self.state.write().await;
        if !state.open || state.creator_sync.seq != ticket {
            tracing::debug!(ticket, "Discarding superseded creator reload");
            return;
        }
        match result {
            Ok((waiting, in_progress, done)) => {
                state.creator = CreatorJobs {
                    waiting,
                    in_progress,
                    done,
                };
                state.creator_sync.loading = false;
                state.creator_sync.error = None;
                drop(state);
                let _ = self.update_tx.send(StoreUpdate {
                    perspective: Perspective::Creator,
                });
                tracing::debug!("Creator snapshot replaced");
            }
            Err(e) => {
                state.creator_sync.loading = false;
                state.creator_sync.error = Some(e.to_string());
                tracing::warn!(error = %e, "Creator reload failed, keeping stale snapshot");
            }
        }
    }

    /// Reload every executor bucket. Same all-or-nothing policy as
    /// [`reload_creator`](Self::reload_creator); the two perspectives
    /// are independent failure domains.
    pub async fn reload_executor(&self) {
        let Some(ticket) = self.begin_reload(Perspective::Executor).await else {
            return;
        };

        let result = futures::try_join!(
            self.gateway.list_jobs(Perspective::Executor, Bucket::New),
            self.gateway.list_jobs(Perspective::Executor, Bucket::Waiting),
            self.gateway
                .list_jobs(Perspective::Executor, Bucket::InProgress),
            self.gateway.list_jobs(Perspective::Executor, Bucket::Done),
        );

        let mut state = self.state.write().await;
        if !state.open || state.executor_sync.seq != ticket {
            tracing::debug!(ticket, "Discarding superseded executor reload");
            return;
        }
        match result {
            Ok((new, waiting, in_progress, done)) => {
                state.executor = ExecutorJobs {
                    new,
                    waiting,
                    in_progress,
                    done,
                };
                state.executor_sync.loading = false;
                state.executor_sync.error = None;
                drop(state);
                let _ = self.update_tx.send(StoreUpdate {
                    perspective: Perspective::Executor,
                });
                tracing::debug!("Executor snapshot replaced");
            }
            Err(e) => {
                state.executor_sync.loading = false;
                state.executor_sync.error = Some(e.to_string());
                tracing::warn!(error = %e, "Executor reload failed, keeping stale snapshot");
            }
        }
    }

    /// Reload both perspectives concurrently.
    pub async fn reload_all(&self) {
        tokio::join!(self.reload_creator(), self.reload_executor());
    }

    /// Claim a reload ticket, or `None` when the store is closed.
    async fn begin_reload(&self, perspective: Perspective) -> Option<u64> {
        let mut state = self.state.write().await;
        if !state.open {
            return None;
        }
        let sync = match perspective {
            Perspective::Creator => &mut state.creator_sync,
            Perspective::Executor => &mut state.executor_sync,
        };
        sync.seq += 1;
        sync.loading = true;
        Some(sync.seq)
    }

    // ---- point reads ----

    /// Direct, uncached point read (e.g. for deep links).
    pub async fn get_job_by_id(&self, id: &str) -> Result<Job, StoreError> {
        Ok(self.gateway.get_job(id).await?)
    }

    /// Best-effort: whether the current user is nominated for the job.
    /// Degrades to `false` on any failure instead of propagating.
    pub async fn check_is_provider_in_job(&self, id: &str) -> bool {
        match self.gateway.is_provider_in_job(id).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(job_id = %id, error = %e, "Provider membership check failed");
                false
            }
        }
    }

    // ---- mutations (write, then reload everything) ----

    pub async fn delete_job(&self, id: &str) -> Result<(), StoreError> {
        self.mutate("delete_job", id, self.gateway.delete_job(id))
            .await
    }

    /// Creator confirms the job, closing it to further nominations.
    pub async fn confirm_job(&self, id: &str) -> Result<(), StoreError> {
        self.mutate("confirm_job", id, self.gateway.close_job(id))
            .await
    }

    pub async fn mark_job_done(
        &self,
        id: &str,
        options: &CompletionOptions,
    ) -> Result<(), StoreError> {
        self.mutate("mark_job_done", id, self.gateway.mark_done(id, options))
            .await
    }

    /// Approve a candidate provider as the job's executor.
    pub async fn approve_provider(&self, id: &str, executor_id: &str) -> Result<(), StoreError> {
        self.mutate(
            "approve_provider",
            id,
            self.gateway.assign_executor(id, executor_id),
        )
        .await
    }

    pub async fn remove_executor(&self, id: &str) -> Result<(), StoreError> {
        self.mutate("remove_executor", id, self.gateway.unassign_executor(id))
            .await
    }

    /// Self-nomination by the current user.
    pub async fn add_provider(&self, id: &str) -> Result<(), StoreError> {
        self.mutate("add_provider", id, self.gateway.nominate_provider(id))
            .await
    }

    /// Self-withdrawal by the current user.
    pub async fn remove_provider(&self, id: &str) -> Result<(), StoreError> {
        self.mutate("remove_provider", id, self.gateway.withdraw_provider(id))
            .await
    }

    /// Shared mutation path: one authoritative write, then a full
    /// reload before resolving. Mutation success is independent of the
    /// trailing reload's outcome (a reload failure lands in the error
    /// slots, not in the returned result).
    async fn mutate(
        &self,
        action: &'static str,
        job_id: &str,
        write: impl std::future::Future<Output = Result<(), GatewayError>>,
    ) -> Result<(), StoreError> {
        if !self.is_open().await {
            return Err(StoreError::Closed);
        }

        write.await.map_err(|e| {
            tracing::warn!(action, job_id = %job_id, error = %e, "Job mutation failed");
            StoreError::from(e)
        })?;

        tracing::debug!(action, job_id = %job_id, "Job mutation applied, reloading");
        self.reload_all().await;
        Ok(())
    }
}
