//! The job record as returned by the remote gateway.
//!
//! A job's lifecycle status is implied by which bucket the gateway
//! returned it in; it is never stored on the record itself.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{JobId, Timestamp, UserId};

/// A job request, as seen by either perspective.
///
/// The gateway is the single source of truth; instances held by the
/// store are a read replica and are replaced wholesale on reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub job_type: String,
    #[serde(default)]
    pub subtype: Option<String>,
    pub profession: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub starts_at: Option<Timestamp>,
    #[serde(default)]
    pub ends_at: Option<Timestamp>,
    pub creator_id: UserId,
    /// Set once a provider has been approved as the executor.
    #[serde(default)]
    pub executor_id: Option<UserId>,
    /// Candidate providers who nominated themselves, in nomination order.
    #[serde(default)]
    pub provider_ids: Vec<UserId>,
    #[serde(default)]
    pub comment: Option<JobComment>,
    /// Ordered change history, oldest first.
    #[serde(default)]
    pub history: Vec<JobHistoryEntry>,
}

/// The single optional comment attached to a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobComment {
    pub author_id: UserId,
    pub text: String,
    pub created_at: Timestamp,
}

/// One entry in a job's change-history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobHistoryEntry {
    pub changed_at: Timestamp,
    /// What changed, as reported by the gateway (e.g. "price", "status").
    pub field: String,
    #[serde(default)]
    pub detail: Option<String>,
}
