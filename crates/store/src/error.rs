//! Store-level errors.

use worklink_gateway::GatewayError;

/// Errors surfaced by [`JobStore`](crate::JobStore) operations.
///
/// Reload failures never take this path -- they are recorded in the
/// per-perspective error slots instead. Mutations and point reads
/// propagate so the UI can show an actionable message.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The store was closed (identity torn down) before the call.
    #[error("store is closed")]
    Closed,
}
