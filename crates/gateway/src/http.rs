//! Production gateway client over HTTP.
//!
//! Wraps the marketplace REST API using [`reqwest`]. All requests carry
//! the session's bearer token; non-2xx responses are normalized via
//! [`GatewayError::api`] so callers always see a human-readable message.

use async_trait::async_trait;
use worklink_core::{Bucket, DirectoryEntry, Job, Perspective, SessionIdentity};

use crate::error::GatewayError;
use crate::traits::{JobGateway, UserGateway};
use crate::types::{AssignExecutorBody, CompletionOptions, ProviderMembership};

/// HTTP client for one session identity.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpGateway {
    /// Create a gateway client for the given session identity.
    pub fn new(identity: &SessionIdentity) -> Self {
        Self::with_client(reqwest::Client::new(), identity)
    }

    /// Create a gateway client reusing an existing [`reqwest::Client`]
    /// (connection pooling across components of one session).
    pub fn with_client(client: reqwest::Client, identity: &SessionIdentity) -> Self {
        Self {
            client,
            base_url: identity.server_url.trim_end_matches('/').to_string(),
            token: identity.token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`GatewayError::Api`] built
    /// from the status and body on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::api(status.as_u16(), &body));
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), GatewayError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl JobGateway for HttpGateway {
    async fn list_jobs(
        &self,
        perspective: Perspective,
        bucket: Bucket,
    ) -> Result<Vec<Job>, GatewayError> {
        let response = self
            .client
            .get(self.url(&format!(
                "/jobs/{}/{}",
                perspective.path_segment(),
                bucket.path_segment()
            )))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn get_job(&self, id: &str) -> Result<Job, GatewayError> {
        let response = self
            .client
            .get(self.url(&format!("/jobs/{id}")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn delete_job(&self, id: &str) -> Result<(), GatewayError> {
        let response = self
            .client
            .delete(self.url(&format!("/jobs/{id}")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::check_status(response).await
    }

    async fn close_job(&self, id: &str) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(self.url(&format!("/jobs/{id}/close")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::check_status(response).await
    }

    async fn mark_done(&self, id: &str, options: &CompletionOptions) -> Result<(), GatewayError> {
        let response = self
            .client
            .patch(self.url(&format!("/jobs/{id}/done")))
            .bearer_auth(&self.token)
            .json(options)
            .send()
            .await?;
        Self::check_status(response).await
    }

    async fn assign_executor(&self, id: &str, executor_id: &str) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(self.url(&format!("/jobs/{id}/assign-executor")))
            .bearer_auth(&self.token)
            .json(&AssignExecutorBody { executor_id })
            .send()
            .await?;
        Self::check_status(response).await
    }

    async fn unassign_executor(&self, id: &str) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(self.url(&format!("/jobs/{id}/unassign-executor")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::check_status(response).await
    }

    async fn nominate_provider(&self, id: &str) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(self.url(&format!("/jobs/{id}/providers")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::check_status(response).await
    }

    async fn withdraw_provider(&self, id: &str) -> Result<(), GatewayError> {
        let response = self
            .client
            .delete(self.url(&format!("/jobs/{id}/providers")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::check_status(response).await
    }

    async fn is_provider_in_job(&self, id: &str) -> Result<bool, GatewayError> {
        let response = self
            .client
            .get(self.url(&format!("/jobs/{id}/providers/me")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let membership: ProviderMembership = Self::parse_response(response).await?;
        Ok(membership.is_provider)
    }
}

#[async_trait]
impl UserGateway for HttpGateway {
    async fn list_other_users(&self) -> Result<Vec<DirectoryEntry>, GatewayError> {
        let response = self
            .client
            .get(self.url("/users/others"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn get_user(&self, id: &str) -> Result<DirectoryEntry, GatewayError> {
        let response = self
            .client
            .get(self.url(&format!("/users/{id}")))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::parse_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let identity = SessionIdentity::new("https://api.example.com/", "t", "u1");
        let gateway = HttpGateway::new(&identity);
        assert_eq!(
            gateway.url("/jobs/as-creator/waiting"),
            "https://api.example.com/jobs/as-creator/waiting"
        );
    }
}
