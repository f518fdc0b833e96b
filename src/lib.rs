//! Three-tier weather forecast cascade.

pub mod admin;
pub mod config;
pub mod downstream;
pub mod forecast;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::schema::{CascadeConfig, Tier};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
