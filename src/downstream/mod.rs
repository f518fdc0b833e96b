//! Downstream tier access.
//!
//! # Data Flow
//! ```text
//! RemoteCatalog / RemoteForecasts
//!     → sources.rs (ResilientDownstream: executor around each call)
//!     → client.rs (HttpDownstream: GET, decode, classify)
//!     → next tier over HTTP
//! ```
//!
//! # Design Decisions
//! - Endpoint addresses are fixed at startup from configuration
//! - The full endpoint URL is the breaker key

pub mod client;
pub mod sources;

pub use client::{DownstreamError, HttpDownstream};
pub use sources::{RemoteCatalog, RemoteForecasts, ResilientDownstream};
