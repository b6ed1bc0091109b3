//! Client for the remote job gateway (the marketplace HTTP API).
//!
//! The gateway is the single source of truth for jobs and user
//! profiles. This crate defines the [`JobGateway`] and [`UserGateway`]
//! trait seams consumed by the store and directory crates, plus the
//! production [`HttpGateway`] implementation over `reqwest`.

pub mod error;
pub mod http;
pub mod traits;
pub mod types;

pub use error::GatewayError;
pub use http::HttpGateway;
pub use traits::{JobGateway, UserGateway};
pub use types::CompletionOptions;
