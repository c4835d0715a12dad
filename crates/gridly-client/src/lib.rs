//! # Gridly API Client
//!
//! Thin async client for the Gridly REST API: configuration, a transport seam
//! with a `reqwest` implementation, and JSON / no-content response handling.
//! Endpoint mapping lives with the callers; this crate only knows how to send
//! an [`ApiRequest`] and normalize what comes back.

pub mod client;
pub mod config;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod transport;

pub use client::GridlyClient;
pub use config::{ClientConfig, API_KEY_ENV, DEFAULT_BASE_URL};
pub use error::{ClientError, ClientResult};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, ReqwestTransport};
