//! Push-event message types and parser.
//!
//! The realtime channel delivers UTF-8 JSON objects with a `"type"`
//! discriminator and a flat payload. This module deserializes them into
//! a strongly-typed [`PushEvent`] enum. Messages with an unrecognized
//! type fail to parse; callers ignore them and continue.

use serde::Deserialize;
use worklink_core::UserId;

/// All known push-event types.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PushEvent {
    /// A job payment went through; the creator replica is stale.
    JobPaymentSucceeded,

    /// A payment for a user's contact info went through. With a target
    /// id only that directory entry is revealed; without one the whole
    /// directory must be re-fetched.
    #[serde(rename_all = "camelCase")]
    UserInfoPaymentSucceeded {
        #[serde(default)]
        user_id: Option<UserId>,
    },

    SubscriptionActivated,
    SubscriptionCancelled,
    SubscriptionExpired,
    SubscriptionUpgradeInitiated,
    SubscriptionDowngradeScheduled,
    SubscriptionPlanChanged,
    SubscriptionPaymentSucceeded,
}

impl PushEvent {
    /// Whether this event refreshes subscription entitlement state.
    pub fn is_subscription_event(&self) -> bool {
        matches!(
            self,
            PushEvent::SubscriptionActivated
                | PushEvent::SubscriptionCancelled
                | PushEvent::SubscriptionExpired
                | PushEvent::SubscriptionUpgradeInitiated
                | PushEvent::SubscriptionDowngradeScheduled
                | PushEvent::SubscriptionPlanChanged
                | PushEvent::SubscriptionPaymentSucceeded
        )
    }
}

/// Parse a realtime text frame into a typed event.
///
/// Returns `Err` for malformed JSON or unknown `type` values; the
/// bridge logs those at trace level and moves on.
pub fn parse_event(text: &str) -> Result<PushEvent, serde_json::Error> {
    serde_json::from_str(text)
}
