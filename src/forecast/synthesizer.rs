//! Synthesizer: random forecast records tagged with catalog categories.

use chrono::{Days, Local, NaiveDate};

use crate::forecast::random::RandomSource;
use crate::forecast::types::{CategorySet, ForecastRecord};
use crate::forecast::{CategorySource, ForecastSource};
use crate::resilience::outcome::{CallError, CallOutcome};

/// Records produced per request.
pub const RECORD_COUNT: u64 = 5;
/// Lowest generated temperature (inclusive).
pub const MIN_TEMPERATURE: i32 = -20;
/// Upper bound for generated temperatures (exclusive).
pub const MAX_TEMPERATURE: i32 = 55;

/// Generate `RECORD_COUNT` records dated `today + 1` through `today + 5`.
///
/// Each record draws its temperature, then its category (uniformly, with
/// replacement) from `rng`.
pub fn synthesize<R>(
    categories: &CategorySet,
    today: NaiveDate,
    rng: &R,
) -> CallOutcome<Vec<ForecastRecord>>
where
    R: RandomSource + ?Sized,
{
    if categories.is_empty() {
        return Err(CallError::EmptyCategorySet);
    }
    let len = i32::try_from(categories.len()).unwrap_or(i32::MAX);

    (1..=RECORD_COUNT)
        .map(|offset| -> CallOutcome<ForecastRecord> {
            let temperature = rng.next_int(MIN_TEMPERATURE, MAX_TEMPERATURE);
            let summary = categories
                .pick(rng.next_int(0, len))
                .ok_or(CallError::EmptyCategorySet)?
                .to_string();
            Ok(ForecastRecord {
                date: today + Days::new(offset),
                temperature,
                summary,
            })
        })
        .collect()
}

/// Middle tier: fetches categories, then synthesizes records.
#[derive(Debug)]
pub struct Synthesizer<C, R> {
    catalog: C,
    rng: R,
}

impl<C, R> Synthesizer<C, R>
where
    C: CategorySource,
    R: RandomSource,
{
    pub fn new(catalog: C, rng: R) -> Self {
        Self { catalog, rng }
    }

    /// Fetch categories and generate records dated relative to `today`.
    ///
    /// Catalog failures are returned unchanged; nothing is generated locally.
    pub async fn generate_on(&self, today: NaiveDate) -> CallOutcome<Vec<ForecastRecord>> {
        let categories = self.catalog.categories().await?;
        let records = synthesize(&categories, today, &self.rng)?;
        tracing::debug!(
            categories = categories.len(),
            records = records.len(),
            "Synthesized forecast records"
        );
        Ok(records)
    }
}

impl<C, R> ForecastSource for Synthesizer<C, R>
where
    C: CategorySource,
    R: RandomSource,
{
    async fn forecasts(&self) -> CallOutcome<Vec<ForecastRecord>> {
        self.generate_on(Local::now().date_naive()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::catalog::StaticCatalog;
    use crate::forecast::random::{SequenceRandom, ThreadRandom};
    use crate::resilience::outcome::{AttemptError, FailureKind};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    struct FailingCatalog(FailureKind);

    impl CategorySource for FailingCatalog {
        async fn categories(&self) -> CallOutcome<CategorySet> {
            Err(match self.0 {
                FailureKind::CircuitOpen => CallError::CircuitOpen {
                    endpoint: "http://catalog".into(),
                },
                _ => CallError::DownstreamUnavailable {
                    endpoint: "http://catalog".into(),
                    attempts: 4,
                    last: AttemptError::Status(503),
                },
            })
        }
    }

    #[test]
    fn test_deterministic_records() {
        let set: CategorySet = ["Cold", "Mild", "Hot"].into_iter().collect();
        // (temperature, category index) pairs
        let rng = SequenceRandom::new(vec![10, 0, -20, 2, 54, 1, 0, 1, 31, 2]);

        let records = synthesize(&set, day(), &rng).unwrap();
        let got: Vec<(NaiveDate, i32, &str)> = records
            .iter()
            .map(|r| (r.date, r.temperature, r.summary.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                (NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(), 10, "Cold"),
                (NaiveDate::from_ymd_opt(2026, 10, 21).unwrap(), -20, "Hot"),
                (NaiveDate::from_ymd_opt(2026, 10, 22).unwrap(), 54, "Mild"),
                (NaiveDate::from_ymd_opt(2026, 10, 23).unwrap(), 0, "Mild"),
                (NaiveDate::from_ymd_opt(2026, 10, 24).unwrap(), 31, "Hot"),
            ]
        );
    }

    /// Ignores the requested range.
    struct NegativeRandom;

    impl RandomSource for NegativeRandom {
        fn next_int(&self, _low: i32, _high: i32) -> i32 {
            -1
        }
    }

    #[test]
    fn test_out_of_range_index_draw_still_picks_a_label() {
        let set: CategorySet = ["Cold", "Mild", "Hot"].into_iter().collect();
        let records = synthesize(&set, day(), &NegativeRandom).unwrap();
        assert_eq!(records.len(), 5);
        assert!(records.iter().all(|r| r.summary == "Hot"));
    }

    #[test]
    fn test_random_records_respect_bounds() {
        let set: CategorySet = ["Cold", "Mild", "Hot"].into_iter().collect();
        for _ in 0..200 {
            let records = synthesize(&set, day(), &ThreadRandom).unwrap();
            assert_eq!(records.len(), 5);
            for r in &records {
                assert!((MIN_TEMPERATURE..MAX_TEMPERATURE).contains(&r.temperature));
                assert!(set.contains(&r.summary));
            }
        }
    }

    #[test]
    fn test_empty_set_is_an_error() {
        let err = synthesize(&CategorySet::default(), day(), &ThreadRandom).unwrap_err();
        assert_eq!(err.kind(), FailureKind::EmptyCategorySet);
    }

    #[tokio::test]
    async fn test_generate_uses_catalog() {
        let synth = Synthesizer::new(StaticCatalog::default(), ThreadRandom);
        let records = synth.forecasts().await.unwrap();
        assert_eq!(records.len(), 5);
        let catalog = StaticCatalog::default();
        assert!(records.iter().all(|r| catalog.categories_ref().contains(&r.summary)));
    }

    #[tokio::test]
    async fn test_catalog_failure_propagates_unchanged() {
        for kind in [FailureKind::CircuitOpen, FailureKind::DownstreamUnavailable] {
            let synth = Synthesizer::new(FailingCatalog(kind), ThreadRandom);
            let err = synth.generate_on(day()).await.unwrap_err();
            assert_eq!(err.kind(), kind);
        }
    }

    #[tokio::test]
    async fn test_empty_catalog_is_fatal() {
        let synth = Synthesizer::new(StaticCatalog::new(CategorySet::default()), ThreadRandom);
        let err = synth.generate_on(day()).await.unwrap_err();
        assert!(matches!(err, CallError::EmptyCategorySet));
    }
}
