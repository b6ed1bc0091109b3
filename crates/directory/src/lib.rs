//! The provider directory: a merge-only cache of other users' profiles.
//!
//! Answers "who is this user" cheaply after the first full fetch while
//! tolerating partial knowledge. Entries are inserted on first fetch
//! and overwritten by later fetches; nothing is ever evicted (the cache
//! is intentionally unbounded for the expected directory sizes).

pub mod directory;
pub mod error;

pub use directory::ProviderDirectory;
pub use error::DirectoryError;
