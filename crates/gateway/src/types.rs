//! Request body types for gateway mutations.

use serde::{Deserialize, Serialize};

/// Options sent when a creator marks a job done (`PATCH /jobs/{id}/done`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOptions {
    /// 1-5 rating for the executor, if the creator left one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
}

/// Body for `POST /jobs/{id}/assign-executor`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AssignExecutorBody<'a> {
    pub executor_id: &'a str,
}

/// Response of `GET /jobs/{id}/providers/me`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProviderMembership {
    pub is_provider: bool,
}
