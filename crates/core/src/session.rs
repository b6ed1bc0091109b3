//! Session identity: the tuple every stateful component is keyed off.

use crate::types::UserId;

/// An opaque session handle: server base URL, bearer token, user id.
///
/// Components never interpret the token. A change to any field is a new
/// identity and forces re-initialization (fresh reload, fresh socket).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    /// HTTP base URL, e.g. `https://api.example.com`.
    pub server_url: String,
    pub token: String,
    pub user_id: UserId,
}

impl SessionIdentity {
    pub fn new(
        server_url: impl Into<String>,
        token: impl Into<String>,
        user_id: impl Into<UserId>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            token: token.into(),
            user_id: user_id.into(),
        }
    }
}
