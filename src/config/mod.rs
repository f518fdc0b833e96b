//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CascadeConfig (validated, immutable)
//!     → CLI flags override bind address / downstream URL
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; downstream addresses are fixed per process
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{CascadeConfig, ResilienceConfig, Tier};
pub use validation::{validate_for_tier, ValidationError};
