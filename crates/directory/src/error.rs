//! Directory errors.

use worklink_gateway::GatewayError;

/// Errors surfaced by [`ProviderDirectory`](crate::ProviderDirectory)
/// lookups. Full-reload failures never take this path; they are
/// recorded in the directory's error slot.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A lookup that joined another caller's in-flight fetch, relaying
    /// that fetch's failure message.
    #[error("{0}")]
    SharedFetch(String),
}
