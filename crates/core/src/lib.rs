//! Domain types shared across the worklink client crates.
//!
//! This crate is I/O-free: it defines the job model, the
//! perspective/bucket lifecycle vocabulary, directory (other-user)
//! profiles, and the session identity that every stateful component is
//! keyed off.

pub mod bucket;
pub mod job;
pub mod profile;
pub mod session;
pub mod types;

pub use bucket::{Bucket, Perspective};
pub use job::{Job, JobComment, JobHistoryEntry};
pub use profile::DirectoryEntry;
pub use session::SessionIdentity;
pub use types::{JobId, Timestamp, UserId};
