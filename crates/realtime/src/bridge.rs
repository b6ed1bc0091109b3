//! Bridge lifecycle: one connection per identity, for as long as the
//! session lives.
//!
//! [`RealtimeBridge::start`] spawns the long-lived connection task
//! (connect -> process frames -> reconnect) and returns a
//! [`BridgeHandle`] that owns it. The handle is the only writer of
//! "is this socket open" state; nothing else may open a second
//! connection for the same identity.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use worklink_core::SessionIdentity;

use crate::client::{RealtimeClient, RealtimeConnection};
use crate::dispatch::{dispatch_event, RefreshHandler};
use crate::messages::parse_event;
use crate::reconnect::{reconnect_loop, ReconnectConfig};

/// How long shutdown waits for the connection task to exit cleanly.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection state, surfaced to the UI via a watch channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeStatus {
    Disconnected,
    Connecting,
    Connected,
    /// Waiting out the backoff delay before reconnect attempt `attempt`.
    Backoff { attempt: u32 },
    /// The attempt ceiling was hit; the bridge stays idle until the
    /// identity changes.
    GaveUp,
}

/// Entry point for starting a bridge.
pub struct RealtimeBridge;

/// Owner of one running bridge task.
pub struct BridgeHandle {
    cancel: CancellationToken,
    task: tokio::task::JoinHandle<()>,
    status_rx: watch::Receiver<BridgeStatus>,
}

impl RealtimeBridge {
    /// Start the bridge for one session identity.
    ///
    /// The task keeps exactly one connection alive (reconnecting with
    /// backoff on drops) until the handle is shut down.
    pub fn start(
        identity: SessionIdentity,
        handler: Arc<dyn RefreshHandler>,
        config: ReconnectConfig,
    ) -> BridgeHandle {
        let (status_tx, status_rx) = watch::channel(BridgeStatus::Disconnected);
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let task = tokio::spawn(async move {
            let client = RealtimeClient::new(identity);
            run_connection_loop(&client, &handler, &config, &task_cancel, &status_tx).await;
            // GaveUp is terminal; it must stay visible on the watch
            // channel after the task exits.
            status_tx.send_if_modified(|status| {
                if *status == BridgeStatus::GaveUp {
                    return false;
                }
                *status = BridgeStatus::Disconnected;
                true
            });
            tracing::info!(user_id = %client.identity().user_id, "Bridge task exited");
        });

        BridgeHandle {
            cancel,
            task,
            status_rx,
        }
    }
}

impl BridgeHandle {
    /// Watch the bridge's connection state.
    pub fn status(&self) -> watch::Receiver<BridgeStatus> {
        self.status_rx.clone()
    }

    /// Close the connection and stop the task, waiting up to
    /// [`SHUTDOWN_TIMEOUT`] for a clean exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if tokio::time::timeout(SHUTDOWN_TIMEOUT, self.task).await.is_err() {
            tracing::warn!("Bridge task did not exit within shutdown timeout");
        }
    }
}

/// Core loop: connect -> process frames -> reconnect, until cancelled
/// or the reconnect ceiling is hit.
async fn run_connection_loop(
    client: &RealtimeClient,
    handler: &Arc<dyn RefreshHandler>,
    config: &ReconnectConfig,
    cancel: &CancellationToken,
    status_tx: &watch::Sender<BridgeStatus>,
) {
    let mut first_attempt = true;

    loop {
        let conn = if first_attempt {
            first_attempt = false;
            let _ = status_tx.send(BridgeStatus::Connecting);
            match client.connect().await {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!(
                        user_id = %client.identity().user_id,
                        error = %e,
                        "Initial connect failed, entering reconnect loop",
                    );
                    match reconnect_loop(client, config, cancel, status_tx).await {
                        Some(conn) => conn,
                        None => return,
                    }
                }
            }
        } else {
            match reconnect_loop(client, config, cancel, status_tx).await {
                Some(conn) => conn,
                None => return,
            }
        };

        let _ = status_tx.send(BridgeStatus::Connected);
        process_frames(conn, handler, cancel).await;
        let _ = status_tx.send(BridgeStatus::Disconnected);

        if cancel.is_cancelled() {
            return;
        }
        tracing::info!(
            user_id = %client.identity().user_id,
            "Push channel dropped, entering reconnect loop",
        );
    }
}

/// Read frames until the connection drops or the bridge is cancelled.
///
/// Text frames are parsed into push events and dispatched; anything
/// else is ignored. On cancellation the connection is explicitly
/// closed before returning.
async fn process_frames(
    conn: RealtimeConnection,
    handler: &Arc<dyn RefreshHandler>,
    cancel: &CancellationToken,
) {
    let connection_id = conn.connection_id;
    let mut ws_stream = conn.ws_stream;

    loop {
        let frame = tokio::select! {
            _ = cancel.cancelled() => {
                let _ = ws_stream.close(None).await;
                tracing::info!(connection_id = %connection_id, "Push channel closed on teardown");
                return;
            }
            frame = ws_stream.next() => frame,
        };

        match frame {
            Some(Ok(Message::Text(text))) => match parse_event(&text) {
                Ok(event) => dispatch_event(event, handler),
                Err(_) => {
                    // Unrecognized types are ignored by contract.
                    tracing::trace!(
                        connection_id = %connection_id,
                        raw_message = %text,
                        "Ignoring unrecognized push message",
                    );
                }
            },
            Some(Ok(Message::Binary(_))) => {
                tracing::trace!(connection_id = %connection_id, "Ignoring binary frame");
            }
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                // Handled automatically by tungstenite.
            }
            Some(Ok(Message::Close(frame))) => {
                tracing::info!(connection_id = %connection_id, ?frame, "Push channel closed by server");
                return;
            }
            Some(Ok(Message::Frame(_))) => {}
            Some(Err(e)) => {
                tracing::error!(connection_id = %connection_id, error = %e, "Push channel receive error");
                return;
            }
            None => return,
        }
    }
}
