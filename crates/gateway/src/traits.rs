//! Gateway trait seams.
//!
//! The store and directory crates depend on these traits rather than on
//! the concrete HTTP client, so tests can substitute in-memory gateways.

use async_trait::async_trait;
use worklink_core::{Bucket, DirectoryEntry, Job, Perspective};

use crate::error::GatewayError;
use crate::types::CompletionOptions;

/// Read and mutate jobs on the remote authority.
#[async_trait]
pub trait JobGateway: Send + Sync {
    /// Fetch one bucket of one perspective.
    async fn list_jobs(
        &self,
        perspective: Perspective,
        bucket: Bucket,
    ) -> Result<Vec<Job>, GatewayError>;

    /// Uncached point read, for jobs not guaranteed to be in any loaded
    /// bucket (e.g. deep links).
    async fn get_job(&self, id: &str) -> Result<Job, GatewayError>;

    async fn delete_job(&self, id: &str) -> Result<(), GatewayError>;

    /// Creator confirms the job (closes it to further nominations).
    async fn close_job(&self, id: &str) -> Result<(), GatewayError>;

    /// Creator marks the job done, optionally rating the executor.
    async fn mark_done(&self, id: &str, options: &CompletionOptions) -> Result<(), GatewayError>;

    /// Creator approves a candidate provider as the executor.
    async fn assign_executor(&self, id: &str, executor_id: &str) -> Result<(), GatewayError>;

    /// Creator removes the currently assigned executor.
    async fn unassign_executor(&self, id: &str) -> Result<(), GatewayError>;

    /// The calling provider nominates themself for the job.
    async fn nominate_provider(&self, id: &str) -> Result<(), GatewayError>;

    /// The calling provider withdraws their nomination.
    async fn withdraw_provider(&self, id: &str) -> Result<(), GatewayError>;

    /// Whether the calling provider is currently nominated for the job.
    async fn is_provider_in_job(&self, id: &str) -> Result<bool, GatewayError>;
}

/// Read other users' profiles for the provider directory.
#[async_trait]
pub trait UserGateway: Send + Sync {
    /// Full "other users" listing.
    async fn list_other_users(&self) -> Result<Vec<DirectoryEntry>, GatewayError>;

    /// Single profile fetch.
    async fn get_user(&self, id: &str) -> Result<DirectoryEntry, GatewayError>;
}
