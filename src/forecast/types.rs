//! Records exchanged between tiers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One forecast entry. Produced fresh per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRecord {
    /// Day the forecast applies to.
    pub date: NaiveDate,
    /// Temperature in the unit of the tier that produced it.
    pub temperature: i32,
    /// Category label drawn from the catalog.
    pub summary: String,
}

/// Ordered, immutable list of category labels.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySet(Vec<String>);

impl CategorySet {
    pub fn new(labels: Vec<String>) -> Self {
        Self(labels)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Label for a random draw, folded into `[0, len)`. `None` only when empty.
    pub fn pick(&self, draw: i32) -> Option<&str> {
        let len = i64::try_from(self.0.len()).ok().filter(|len| *len > 0)?;
        let index = usize::try_from(i64::from(draw).rem_euclid(len)).ok()?;
        self.get(index)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for CategorySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
