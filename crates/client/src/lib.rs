//! TelDrive API client.
//!
//! One [`ApiClient`] per driver instance: it owns the `reqwest` client with
//! the auth cookie and User-Agent baked in, and learns the owner id during
//! [`ApiClient::init`]. There is no process-wide state.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock-server"))]
pub mod mock_server;

pub use client::{ApiClient, ClientConfig, USER_AGENT};
pub use error::ClientError;
