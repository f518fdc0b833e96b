//! Catalog provider: the fixed category set.

use std::sync::Arc;

use crate::forecast::types::CategorySet;
use crate::forecast::CategorySource;
use crate::resilience::outcome::CallOutcome;

/// Labels served when the configuration does not override them.
pub const DEFAULT_CATEGORIES: [&str; 10] = [
    "Freezing",
    "Bracing",
    "Chilly",
    "Cool",
    "Mild",
    "Warm",
    "Balmy",
    "Hot",
    "Sweltering",
    "Scorching",
];

/// In-memory catalog, fixed at startup.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    categories: Arc<CategorySet>,
}

impl StaticCatalog {
    pub fn new(categories: CategorySet) -> Self {
        Self {
            categories: Arc::new(categories),
        }
    }

    pub fn categories_ref(&self) -> &CategorySet {
        &self.categories
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORIES.into_iter().collect())
    }
}

impl CategorySource for StaticCatalog {
    async fn categories(&self) -> CallOutcome<CategorySet> {
        Ok(CategorySet::clone(&self.categories))
    }
}
