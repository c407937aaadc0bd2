use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of observed weather, as handed over by the data-fetching layer.
///
/// Measurements are optional because the archive provider leaves gaps; a `NaN`
/// value is treated the same as a missing one. Nothing is clipped or corrected
/// here, so a negative rain total stays negative all the way into the model.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub temp_max: Option<f64>, // °C
    pub temp_min: Option<f64>, // °C
    pub rain: Option<f64>,     // mm
    pub wind: Option<f64>,     // km/h
    pub humidity: Option<f64>, // %
}

impl DailyRecord {
    /// Creates a record with every measurement present.
    pub fn new(
        date: NaiveDate,
        temp_max: f64,
        temp_min: f64,
        rain: f64,
        wind: f64,
        humidity: f64,
    ) -> Self {
        Self {
            date,
            temp_max: Some(temp_max),
            temp_min: Some(temp_min),
            rain: Some(rain),
            wind: Some(wind),
            humidity: Some(humidity),
        }
    }

    /// The daily maximum, if it was observed.
    pub fn observed_temp_max(&self) -> Option<f64> {
        observed(self.temp_max)
    }

    /// The daily minimum, if it was observed.
    pub fn observed_temp_min(&self) -> Option<f64> {
        observed(self.temp_min)
    }

    /// The daily rain total, if it was observed.
    pub fn observed_rain(&self) -> Option<f64> {
        observed(self.rain)
    }

    /// All five measurements in feature order, or `None` if any is missing.
    pub(crate) fn measurements(&self) -> Option<[f64; 5]> {
        Some([
            observed(self.temp_max)?,
            observed(self.temp_min)?,
            observed(self.rain)?,
            observed(self.wind)?,
            observed(self.humidity)?,
        ])
    }

    /// Checks that every measurement the feature encoding needs is present.
    pub fn is_complete(&self) -> bool {
        self.measurements().is_some()
    }
}

fn observed(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}
