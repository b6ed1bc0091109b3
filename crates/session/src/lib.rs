//! Identity-scoped wiring of the worklink client components.
//!
//! A [`SessionContext`] owns one job store, one provider directory and
//! one realtime bridge for a single session identity. The
//! [`SessionManager`] implements the trigger policy: a context is
//! opened when the identity first becomes complete, torn down and
//! reopened whenever any identity field changes, and torn down on
//! logout. Consumers receive handles from the context instead of
//! relying on ambient globals.

pub mod context;
pub mod subscription;

pub use context::{GatewayFactory, HttpGatewayFactory, SessionContext, SessionManager};
pub use subscription::{NullSubscriptionRefresher, SubscriptionRefresher};
