//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, span)
//!     → handlers.rs (tier operation over a CategorySource / ForecastSource)
//!     → response.rs (classified failure → status + JSON body)
//!     → Send to caller
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::ErrorBody;
pub use server::{catalog_app, forecast_app, HttpServer, OPERATION_PATH};
