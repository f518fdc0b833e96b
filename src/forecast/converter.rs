//! Converter: Celsius records in, Fahrenheit records out.

use crate::forecast::types::ForecastRecord;
use crate::forecast::ForecastSource;
use crate::resilience::outcome::CallOutcome;

const FREEZING_POINT_F: i32 = 32;
const CELSIUS_PER_FAHRENHEIT: f64 = 0.5556;

/// `32 + trunc(celsius / 0.5556)`, truncating toward zero.
pub fn to_fahrenheit(celsius: i32) -> i32 {
    FREEZING_POINT_F + (f64::from(celsius) / CELSIUS_PER_FAHRENHEIT) as i32
}

/// Convert every record's temperature; date and summary are untouched.
pub fn convert_records(records: Vec<ForecastRecord>) -> Vec<ForecastRecord> {
    records
        .into_iter()
        .map(|record| ForecastRecord {
            temperature: to_fahrenheit(record.temperature),
            ..record
        })
        .collect()
}

/// Front tier over any forecast source.
#[derive(Debug)]
pub struct Converter<F> {
    source: F,
}

impl<F: ForecastSource> Converter<F> {
    pub fn new(source: F) -> Self {
        Self { source }
    }
}

impl<F: ForecastSource> ForecastSource for Converter<F> {
    async fn forecasts(&self) -> CallOutcome<Vec<ForecastRecord>> {
        let records = self.source.forecasts().await?;
        Ok(convert_records(records))
    }
}
