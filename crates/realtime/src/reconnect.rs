//! Reconnect state machine for the push channel.
//!
//! When the connection drops, [`reconnect_loop`] keeps retrying with
//! jittered exponential backoff until the connection is restored, the
//! attempt ceiling is hit, or the [`CancellationToken`] fires. Progress
//! is published on the bridge's status channel so the UI can render
//! the current state.

use std::time::Duration;

use rand::Rng;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::bridge::BridgeStatus;
use crate::client::{RealtimeClient, RealtimeConnection};

/// Tunable parameters for the backoff strategy.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before the first reconnection attempt.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
    /// Fractional jitter applied to each delay: a delay `d` sleeps a
    /// uniformly random duration in `[d * (1 - jitter), d * (1 + jitter)]`.
    pub jitter: f64,
    /// Give up after this many failed attempts.
    pub max_attempts: u32,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: 0.2,
            max_attempts: 10,
        }
    }
}

/// Calculate the next base delay from the current delay and config.
///
/// The result is clamped to [`ReconnectConfig::max_delay`]. Jitter is
/// applied separately, at sleep time, so the growth sequence stays
/// deterministic.
pub fn next_delay(current: Duration, config: &ReconnectConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_delay)
}

/// Apply the configured jitter fraction to a base delay.
pub fn jittered(delay: Duration, config: &ReconnectConfig) -> Duration {
    if config.jitter <= 0.0 {
        return delay;
    }
    let factor = rand::rng().random_range(1.0 - config.jitter..=1.0 + config.jitter);
    Duration::from_millis((delay.as_millis() as f64 * factor).max(0.0) as u64)
}

/// Attempt to reconnect with backoff.
///
/// Returns `Some(connection)` once a connection succeeds, or `None`
/// when cancelled or when [`ReconnectConfig::max_attempts`] consecutive
/// attempts have failed (the status channel then reads
/// [`BridgeStatus::GaveUp`]).
pub async fn reconnect_loop(
    client: &RealtimeClient,
    config: &ReconnectConfig,
    cancel: &CancellationToken,
    status_tx: &watch::Sender<BridgeStatus>,
) -> Option<RealtimeConnection> {
    let mut delay = config.initial_delay;

    for attempt in 1..=config.max_attempts {
        let _ = status_tx.send(BridgeStatus::Backoff { attempt });

        // Wait before the attempt, respecting cancellation.
        tokio::select! {
            _ = cancel.cancelled() => return None,
            _ = tokio::time::sleep(jittered(delay, config)) => {}
        }

        let _ = status_tx.send(BridgeStatus::Connecting);
        tracing::info!(
            user_id = %client.identity().user_id,
            attempt,
            delay_ms = delay.as_millis() as u64,
            "Reconnecting to push channel",
        );

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(user_id = %client.identity().user_id, "Reconnect cancelled");
                return None;
            }
            result = client.connect() => {
                match result {
                    Ok(conn) => {
                        tracing::info!(
                            user_id = %client.identity().user_id,
                            attempt,
                            "Reconnected to push channel",
                        );
                        return Some(conn);
                    }
                    Err(e) => {
                        tracing::warn!(
                            user_id = %client.identity().user_id,
                            error = %e,
                            "Reconnect attempt {attempt} failed",
                        );
                    }
                }
            }
        }

        delay = next_delay(delay, config);
    }

    tracing::warn!(
        user_id = %client.identity().user_id,
        attempts = config.max_attempts,
        "Giving up on push-channel reconnect",
    );
    let _ = status_tx.send(BridgeStatus::GaveUp);
    None
}
