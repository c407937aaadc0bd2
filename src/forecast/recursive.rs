//! Autoregressive multi-day projection of a one-step model.

use crate::config::OutlookConfig;
use crate::error::{OutlookError, Stage};
use crate::model::OneStepModel;
use crate::types::feature_vector::FeatureVector;
use crate::types::summary::ForecastPoint;
use crate::utils::round2;
use bon::bon;
use chrono::{DateTime, NaiveDate, Utc};

/// Largest fraction of the minimum temperature that may be lost in one step.
const MIN_TEMP_DECAY: f64 = 0.9;
/// Largest absolute drop of the minimum temperature in one step, in °C.
const MIN_TEMP_STEP: f64 = 1.0;

/// One projected day with the unrounded prediction and the model input that the
/// next day will be predicted from.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastStep {
    pub date: NaiveDate,
    pub prediction: f64,
    pub state: FeatureVector,
}

/// Drives a [`OneStepModel`] forward day by day, feeding each prediction back in as
/// the next day's maximum temperature.
///
/// Only the temperature slots move. The minimum decays towards zero by at most 10%
/// and at most 1 °C per day; rain, wind and humidity stay at their last observed
/// values for the whole horizon.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use climate_outlook::RecursiveForecaster;
///
/// let reference = Utc.with_ymd_and_hms(2025, 3, 14, 18, 30, 0).unwrap();
/// let forecaster = RecursiveForecaster::builder().reference(reference).build();
/// assert_eq!(forecaster.horizon_days(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveForecaster {
    reference_date: NaiveDate,
    horizon_days: u32,
}

#[bon]
impl RecursiveForecaster {
    /// Creates a forecaster whose first outlook day is the UTC calendar day after
    /// `reference`.
    #[builder]
    pub fn new(reference: DateTime<Utc>, #[builder(default = 5)] horizon_days: u32) -> Self {
        Self {
            reference_date: reference.date_naive(),
            horizon_days,
        }
    }

    pub fn from_config(config: &OutlookConfig, reference: DateTime<Utc>) -> Self {
        Self::builder()
            .reference(reference)
            .horizon_days(config.horizon_days)
            .build()
    }

    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    /// Projects `horizon_days` days, returning each step's date, raw prediction and
    /// updated model input.
    ///
    /// `last` is copied into a working vector owned by this call; the caller's value is
    /// never touched.
    ///
    /// # Errors
    ///
    /// Returns [`OutlookError::DateOutOfRange`] if the horizon runs past the last
    /// representable calendar date.
    pub fn trajectory<M: OneStepModel + ?Sized>(
        &self,
        model: &M,
        last: &FeatureVector,
    ) -> Result<Vec<ForecastStep>, OutlookError> {
        let mut working = *last;
        let mut date = self.reference_date;
        let mut steps = Vec::with_capacity(self.horizon_days as usize);

        for _ in 0..self.horizon_days {
            let prediction = model.predict(&working);
            working = advance(working, prediction);
            date = date.succ_opt().ok_or(OutlookError::DateOutOfRange {
                stage: Stage::Forecasting,
                date,
            })?;
            steps.push(ForecastStep {
                date,
                prediction,
                state: working,
            });
        }
        Ok(steps)
    }

    /// Projects the outlook, with predictions rounded to two decimals.
    pub fn forecast<M: OneStepModel + ?Sized>(
        &self,
        model: &M,
        last: &FeatureVector,
    ) -> Result<Vec<ForecastPoint>, OutlookError> {
        Ok(self
            .trajectory(model, last)?
            .into_iter()
            .map(|step| ForecastPoint {
                date: step.date,
                predicted_max_temp: round2(step.prediction),
            })
            .collect())
    }
}

/// Synthesizes the next day's model input from today's input and predicted maximum.
fn advance(working: FeatureVector, prediction: f64) -> FeatureVector {
    let previous_min = working.temp_min();
    let next_min = (MIN_TEMP_DECAY * previous_min).max(previous_min - MIN_TEMP_STEP);
    working.with_temperatures(prediction, next_min, prediction - next_min)
}
