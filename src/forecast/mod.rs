//! Tier services.
//!
//! # Data Flow
//! ```text
//! caller → Converter ──ForecastSource──▶ Synthesizer ──CategorySource──▶ StaticCatalog
//!            │                              │
//!            ▼                              ▼
//!        convert_records                synthesize (5 records)
//! ```
//!
//! Between processes the sources are `downstream::RemoteForecasts` and
//! `downstream::RemoteCatalog`; in-process the tiers plug into each other
//! directly.

use std::future::Future;

pub mod catalog;
pub mod converter;
pub mod random;
pub mod synthesizer;
pub mod types;

pub use catalog::StaticCatalog;
pub use converter::{to_fahrenheit, Converter};
pub use random::{RandomSource, SequenceRandom, ThreadRandom};
pub use synthesizer::Synthesizer;
pub use types::{CategorySet, ForecastRecord};

use crate::resilience::outcome::CallOutcome;

/// Anything that can hand out the category set.
pub trait CategorySource: Send + Sync {
    fn categories(&self) -> impl Future<Output = CallOutcome<CategorySet>> + Send;
}

/// Anything that can hand out forecast records.
pub trait ForecastSource: Send + Sync {
    fn forecasts(&self) -> impl Future<Output = CallOutcome<Vec<ForecastRecord>>> + Send;
}
