//! Perspectives and lifecycle buckets.
//!
//! A job set is always viewed from one of two perspectives: the creator
//! side ("my requests") or the executor side ("work I might take").
//! Within a perspective, every job sits in exactly one lifecycle bucket.

use serde::{Deserialize, Serialize};

/// The role-side a job list is viewed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Perspective {
    /// The user originated the job request.
    Creator,
    /// The user fulfils (or may fulfil) the job request.
    Executor,
}

/// A lifecycle stage within a perspective.
///
/// `New` only exists on the executor side (jobs open for nomination).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bucket {
    New,
    Waiting,
    InProgress,
    Done,
}

/// Creator-side buckets in fixed scan order.
pub const CREATOR_BUCKETS: &[Bucket] = &[Bucket::Waiting, Bucket::InProgress, Bucket::Done];

/// Executor-side buckets in fixed scan order.
pub const EXECUTOR_BUCKETS: &[Bucket] =
    &[Bucket::New, Bucket::Waiting, Bucket::InProgress, Bucket::Done];

impl Perspective {
    /// URL path segment for this perspective's bucket endpoints.
    pub fn path_segment(self) -> &'static str {
        match self {
            Perspective::Creator => "as-creator",
            Perspective::Executor => "as-executor",
        }
    }

    /// The buckets that exist for this perspective, in the fixed order
    /// used for both fetching and bucket scans.
    pub fn buckets(self) -> &'static [Bucket] {
        match self {
            Perspective::Creator => CREATOR_BUCKETS,
            Perspective::Executor => EXECUTOR_BUCKETS,
        }
    }
}

impl Bucket {
    /// URL path segment for this bucket's endpoint.
    pub fn path_segment(self) -> &'static str {
        match self {
            Bucket::New => "new",
            Bucket::Waiting => "waiting",
            Bucket::InProgress => "in-progress",
            Bucket::Done => "done",
        }
    }
}

impl std::fmt::Display for Perspective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Perspective::Creator => "creator",
            Perspective::Executor => "executor",
        })
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path_segment())
    }
}
