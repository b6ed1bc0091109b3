//! WebSocket client for the realtime push channel.
//!
//! [`RealtimeClient`] derives the push URL from the session's server
//! address (scheme upgraded to its WebSocket equivalent, user id as a
//! query parameter) and establishes live [`RealtimeConnection`]s.

use tokio_tungstenite::{connect_async, MaybeTlsStream};
use worklink_core::SessionIdentity;

/// Connection configuration for one session identity.
pub struct RealtimeClient {
    identity: SessionIdentity,
}

/// A live WebSocket connection to the push channel.
pub struct RealtimeConnection {
    /// Client-generated id (UUID v4) used to correlate log lines of one
    /// connection's lifetime.
    pub connection_id: String,
    /// The raw WebSocket stream for reading frames.
    pub ws_stream: tokio_tungstenite::WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

/// Errors from the realtime client.
#[derive(Debug, thiserror::Error)]
pub enum RealtimeClientError {
    /// The server URL does not carry an upgradeable scheme.
    #[error("cannot derive a WebSocket URL from '{0}'")]
    UnsupportedScheme(String),

    /// Failed to establish the WebSocket connection.
    #[error("connection error: {0}")]
    Connection(String),
}

impl RealtimeClient {
    pub fn new(identity: SessionIdentity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    /// The push-channel URL: server URL with the scheme upgraded to its
    /// (in)secure WebSocket equivalent and the user id appended.
    pub fn ws_url(&self) -> Result<String, RealtimeClientError> {
        let base = self.identity.server_url.trim_end_matches('/');
        let upgraded = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else if base.starts_with("wss://") || base.starts_with("ws://") {
            base.to_string()
        } else {
            return Err(RealtimeClientError::UnsupportedScheme(
                self.identity.server_url.clone(),
            ));
        };
        Ok(format!("{upgraded}/ws?userId={}", self.identity.user_id))
    }

    /// Connect to the push channel.
    pub async fn connect(&self) -> Result<RealtimeConnection, RealtimeClientError> {
        let url = self.ws_url()?;
        let connection_id = uuid::Uuid::new_v4().to_string();

        let (ws_stream, _response) = connect_async(&url).await.map_err(|e| {
            RealtimeClientError::Connection(format!(
                "failed to connect to push channel at {url}: {e}"
            ))
        })?;

        tracing::info!(
            connection_id = %connection_id,
            user_id = %self.identity.user_id,
            "Connected to push channel",
        );

        Ok(RealtimeConnection {
            connection_id,
            ws_stream,
        })
    }
}
