//! # Frontdesk Gateway Crate
//!
//! Typed client for the hotel operations REST API. Every request carries the
//! bearer token of the current session, and every failure comes back as an
//! [`ApiError`].
//!
//! ## Layout
//!
//! - **client**: the `ApiClient` itself and the generic collection calls
//! - **rest**: request/response types and one function per backend operation
//! - **wire**: lenient decoding for the loosely typed documents the backend stores
//! - **error**: the normalized error taxonomy
//!
//! ## Usage
//!
//! ```rust,no_run
//! use frontdesk_config::ApiConfig;
//! use frontdesk_gateway::ApiClient;
//! use frontdesk_session::{load, MemoryTokenStore};
//!
//! # async fn run() -> Result<(), frontdesk_gateway::ApiError> {
//! let (session, _writer) = load(MemoryTokenStore::default());
//! let client = ApiClient::new(&ApiConfig::default(), session)?;
//! let guests = client.guests().await?;
//! println!("{} guests", guests.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod rest;
pub mod wire;

pub use client::{ApiClient, Resource};
pub use error::{ApiError, GatewayResult};
pub use rest::*;

pub use frontdesk_session::{EntityId, User};
