//! Directory entries: profiles of other marketplace users.

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// A user profile held by the provider directory cache.
///
/// `revealed` is client-local state (set when a user-info payment
/// succeeds) and is never sent by the gateway; cache merges preserve it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub professions: Vec<String>,
    /// Job types this provider is interested in.
    #[serde(default)]
    pub job_types: Vec<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, skip_serializing)]
    pub revealed: bool,
}
