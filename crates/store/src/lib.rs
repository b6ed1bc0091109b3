//! The job store: the local, role-partitioned replica of jobs.
//!
//! [`JobStore`] owns eight ordered job lists (creator waiting /
//! in-progress / done, executor new / waiting / in-progress / done),
//! reloads them all-or-nothing per perspective, and serializes every
//! mutation through a reload-after-write policy.
//!
//! [`JobLocationTracker`] is the derived read-side state machine that
//! detail views use to detect a job moving between buckets.

pub mod error;
pub mod snapshot;
pub mod store;
pub mod tracker;

pub use error::StoreError;
pub use snapshot::{CreatorJobs, ExecutorJobs};
pub use store::{JobStore, StoreUpdate};
pub use tracker::{watch_job, BucketTransition, JobLocationTracker, TrackerUpdate};
