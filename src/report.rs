//! This module provides the main entry point: one report per request, combining the
//! historical climate summary with the model-only temperature outlook.

use crate::aggregation::historical::summarize;
use crate::config::OutlookConfig;
use crate::error::OutlookError;
use crate::features::feature_engineer::{engineer_features, TrainingSet};
use crate::forecast::recursive::RecursiveForecaster;
use crate::model::forest::ForestRegressor;
use crate::types::daily_record::DailyRecord;
use crate::types::feature_vector::{FEATURE_COUNT, FEATURE_NAMES};
use crate::types::summary::{ForecastPoint, HistoricalSummary};
use bon::bon;
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;
use tokio::task;

/// How much one feature slot contributed to the fitted ensemble.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: &'static str,
    pub importance: f64,
}

/// Facts about the model fitted for one outlook.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDiagnostics {
    pub training_examples: usize,
    pub dropped_records: usize,
    /// One entry per feature slot, in slot order.
    pub feature_importances: Vec<FeatureImportance>,
    /// In-sample R², `None` when the targets do not vary beyond rounding noise.
    pub r2: Option<f64>,
}

/// The model outlook together with diagnostics of the model that produced it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelOutlook {
    pub points: Vec<ForecastPoint>,
    /// `None` when too little data was available to train a model.
    pub diagnostics: Option<ModelDiagnostics>,
}

impl ModelOutlook {
    /// Engineers features, fits a fresh forest and projects it forward.
    ///
    /// With fewer than `config.min_training_examples` usable examples no model is
    /// trained and the outlook is empty; that is not an error.
    ///
    /// # Errors
    ///
    /// [`OutlookError::UpstreamData`] for an empty record sequence, and any training
    /// or forecasting error.
    pub fn build(
        records: &[DailyRecord],
        reference: DateTime<Utc>,
        config: &OutlookConfig,
    ) -> Result<Self, OutlookError> {
        let training = engineer_features(records)?;
        let Some(last) = training.last_features() else {
            info!("Model outlook skipped: no usable training examples");
            return Ok(ModelOutlook::default());
        };
        if training.len() < config.min_training_examples {
            info!(
                "Model outlook skipped: {} usable training examples, {} required",
                training.len(),
                config.min_training_examples
            );
            return Ok(ModelOutlook::default());
        }

        let features = training.feature_matrix();
        let targets = training.targets();
        let model = ForestRegressor::fit(&features, &targets, config)?;
        let points = RecursiveForecaster::from_config(config, reference).forecast(&model, &last)?;
        let diagnostics = diagnose(&model, &training, &features, &targets);
        debug!(
            "Projected {} outlook days from a {}-tree model",
            points.len(),
            model.n_trees()
        );
        Ok(ModelOutlook {
            points,
            diagnostics: Some(diagnostics),
        })
    }
}

fn diagnose(
    model: &ForestRegressor,
    training: &TrainingSet,
    features: &[[f64; FEATURE_COUNT]],
    targets: &[f64],
) -> ModelDiagnostics {
    let feature_importances = FEATURE_NAMES
        .iter()
        .zip(model.feature_importances())
        .map(|(&feature, importance)| FeatureImportance {
            feature,
            importance,
        })
        .collect();
    ModelDiagnostics {
        training_examples: training.len(),
        dropped_records: training.dropped,
        feature_importances,
        r2: model.r2_score(features, targets),
    }
}

/// Everything derived from one request's daily records.
///
/// Serializes with the field names a web frontend expects: `historical`,
/// `modelForecast`, `datasetSize` and `diagnostics`.
///
/// # Examples
///
/// ```rust
/// use chrono::{Days, NaiveDate, Utc};
/// use climate_outlook::{ClimateReport, DailyRecord, OutlookError};
///
/// # fn main() -> Result<(), OutlookError> {
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let records: Vec<DailyRecord> = (0..60)
///     .map(|i| DailyRecord::new(start + Days::new(i), 12.0, 4.0, 0.0, 9.0, 70.0))
///     .collect();
///
/// let report = ClimateReport::from_records(&records)
///     .reference(Utc::now())
///     .call()?;
/// assert_eq!(report.model_forecast.len(), 5);
/// assert_eq!(report.dataset_size, 60);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateReport {
    pub historical: HistoricalSummary,
    pub model_forecast: Vec<ForecastPoint>,
    pub dataset_size: usize,
    pub diagnostics: Option<ModelDiagnostics>,
}

#[bon]
impl ClimateReport {
    /// Builds a report for `records` on the calling thread.
    ///
    /// Optional builder arguments:
    /// *   `.reference(DateTime<Utc>)`: the instant the outlook starts after (default: now).
    /// *   `.config(&OutlookConfig)`: model and horizon settings
    ///     (default: [`OutlookConfig::default`]).
    ///
    /// Training is CPU-bound; inside an async service prefer
    /// [`ClimateReport::from_records_async`].
    ///
    /// # Errors
    ///
    /// Returns [`OutlookError::UpstreamData`] when `records` is empty, otherwise any
    /// training or forecasting error.
    #[builder(start_fn = from_records)]
    #[doc(hidden)]
    pub fn build_from_records(
        #[builder(start_fn)] records: &[DailyRecord],
        reference: Option<DateTime<Utc>>,
        config: Option<&OutlookConfig>,
    ) -> Result<Self, OutlookError> {
        let default_config = OutlookConfig::default();
        let config = config.unwrap_or(&default_config);
        let reference = reference.unwrap_or_else(Utc::now);

        let historical = summarize(records)?;
        let outlook = ModelOutlook::build(records, reference, config)?;
        info!(
            "Built climate report from {} daily records ({} outlook days)",
            records.len(),
            outlook.points.len()
        );
        Ok(ClimateReport {
            historical,
            model_forecast: outlook.points,
            dataset_size: records.len(),
            diagnostics: outlook.diagnostics,
        })
    }

    /// Builds a report on tokio's blocking pool so that training never stalls the
    /// async executor. Takes the same optional arguments as
    /// [`ClimateReport::from_records`].
    ///
    /// # Errors
    ///
    /// The errors of [`ClimateReport::from_records`], plus [`OutlookError::TaskJoin`]
    /// if the blocking task panics.
    #[builder(start_fn = from_records_async)]
    #[doc(hidden)]
    pub async fn build_from_records_async(
        #[builder(start_fn)] records: Vec<DailyRecord>,
        reference: Option<DateTime<Utc>>,
        config: Option<OutlookConfig>,
    ) -> Result<Self, OutlookError> {
        task::spawn_blocking(move || {
            ClimateReport::from_records(&records)
                .maybe_reference(reference)
                .maybe_config(config.as_ref())
                .call()
        })
        .await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::summary::Season;
    use chrono::{Days, NaiveDate, TimeZone};

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap()
    }

    fn constant_records(n: u64) -> Vec<DailyRecord> {
        let start = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        (0..n)
            .map(|i| DailyRecord::new(start + Days::new(i), 20.0, 10.0, 0.0, 5.0, 50.0))
            .collect()
    }

    fn seasonal_year() -> Vec<DailyRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..366)
            .map(|i| {
                let phase = i as f64 / 366.0 * std::f64::consts::TAU;
                let temp_max = 14.0 - 10.0 * phase.cos() + (i % 7) as f64 * 0.3;
                let rain = if i % 5 == 0 { 3.5 } else { 0.0 };
                DailyRecord::new(
                    start + Days::new(i),
                    temp_max,
                    temp_max - 9.0,
                    rain,
                    8.0 + (i % 4) as f64,
                    55.0 + (i % 9) as f64,
                )
            })
            .collect()
    }

    #[test]
    fn test_constant_scenario() -> Result<(), OutlookError> {
        let records = constant_records(30);
        let report = ClimateReport::from_records(&records)
            .reference(reference())
            .call()?;

        assert_eq!(report.dataset_size, 30);
        assert_eq!(report.model_forecast.len(), 5);
        let first = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        for (i, point) in report.model_forecast.iter().enumerate() {
            assert_eq!(point.date, first + Days::new(i as u64));
            assert_eq!(point.predicted_max_temp, 20.0);
        }

        let diagnostics = report.diagnostics.expect("model was trained");
        assert_eq!(diagnostics.training_examples, 29);
        assert_eq!(diagnostics.r2, None);
        assert_eq!(diagnostics.feature_importances.len(), 8);
        assert_eq!(diagnostics.feature_importances[6].feature, "rain_binary");
        Ok(())
    }

    #[test]
    fn test_guard_boundary() -> Result<(), OutlookError> {
        // 10 records give 9 examples: below the guard
        let config = OutlookConfig::default();
        let outlook = ModelOutlook::build(&constant_records(10), reference(), &config)?;
        assert!(outlook.points.is_empty());
        assert!(outlook.diagnostics.is_none());

        // 11 records give exactly 10 examples
        let outlook = ModelOutlook::build(&constant_records(11), reference(), &config)?;
        assert_eq!(outlook.points.len(), 5);
        Ok(())
    }

    #[test]
    fn test_fractional_constant_scenario_has_no_r2() -> Result<(), OutlookError> {
        let start = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let records: Vec<DailyRecord> = (0..30)
            .map(|i| DailyRecord::new(start + Days::new(i), 23.7, 11.3, 0.0, 5.0, 50.0))
            .collect();
        let report = ClimateReport::from_records(&records)
            .reference(reference())
            .call()?;

        assert!(report.model_forecast.iter().all(|p| p.predicted_max_temp == 23.7));
        let diagnostics = report.diagnostics.expect("model was trained");
        assert_eq!(diagnostics.r2, None);
        Ok(())
    }

    #[test]
    fn test_guard_counts_usable_examples_only() -> Result<(), OutlookError> {
        let mut records = constant_records(12);
        records[3].humidity = None;
        records[7].rain = None;
        let outlook = ModelOutlook::build(&records, reference(), &OutlookConfig::default())?;
        assert!(outlook.points.is_empty());
        Ok(())
    }

    #[test]
    fn test_empty_records_are_service_unavailable() {
        let err = ClimateReport::from_records(&[])
            .reference(reference())
            .call()
            .unwrap_err();
        assert!(err.is_service_unavailable());
    }

    #[test]
    fn test_small_dataset_still_has_history() -> Result<(), OutlookError> {
        let report = ClimateReport::from_records(&constant_records(5))
            .reference(reference())
            .call()?;
        assert!(report.model_forecast.is_empty());
        assert!(report.diagnostics.is_none());
        assert_eq!(report.historical.month(5).and_then(|m| m.temp), Some(20.0));
        Ok(())
    }

    #[test]
    fn test_runs_are_deterministic() -> Result<(), OutlookError> {
        let records = seasonal_year();
        let config = OutlookConfig::builder().n_trees(40).build();
        let first = ClimateReport::from_records(&records)
            .reference(reference())
            .config(&config)
            .call()?;
        let second = ClimateReport::from_records(&records)
            .reference(reference())
            .config(&config)
            .call()?;
        assert_eq!(first, second);
        assert_eq!(first.model_forecast.len(), 5);
        Ok(())
    }

    #[test]
    fn test_full_year_report() -> Result<(), OutlookError> {
        let records = seasonal_year();
        let config = OutlookConfig::builder().n_trees(30).horizon_days(7).build();
        let report = ClimateReport::from_records(&records)
            .reference(reference())
            .config(&config)
            .call()?;

        assert_eq!(report.model_forecast.len(), 7);
        assert!(report.historical.monthly.iter().all(|m| m.temp.is_some()));
        let winter = report.historical.season(Season::Aurora).temp.unwrap();
        let summer = report.historical.season(Season::Solstice).temp.unwrap();
        assert!(summer > winter);

        let diagnostics = report.diagnostics.unwrap();
        assert_eq!(diagnostics.training_examples, 365);
        assert!(diagnostics.r2.unwrap() > 0.8);
        let total: f64 = diagnostics.feature_importances.iter().map(|f| f.importance).sum();
        assert!((total - 1.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_report_json_shape() -> Result<(), Box<dyn std::error::Error>> {
        let report = ClimateReport::from_records(&constant_records(30))
            .reference(reference())
            .call()?;
        let json = serde_json::to_value(&report)?;
        assert_eq!(json["datasetSize"], 30);
        assert_eq!(json["modelForecast"][0]["date"], "2025-07-01");
        assert_eq!(json["modelForecast"][0]["predicted_max_temp_c"], 20.0);
        assert_eq!(json["historical"]["seasonal"][1]["label"], "Zephyr");
        assert_eq!(json["diagnostics"]["trainingExamples"], 29);
        Ok(())
    }

    #[tokio::test]
    async fn test_async_matches_blocking() -> Result<(), OutlookError> {
        let records = seasonal_year();
        let config = OutlookConfig::builder().n_trees(20).build();
        let blocking = ClimateReport::from_records(&records)
            .reference(reference())
            .config(&config)
            .call()?;
        let offloaded = ClimateReport::from_records_async(records)
            .reference(reference())
            .config(config)
            .call()
            .await?;
        assert_eq!(blocking, offloaded);
        Ok(())
    }
}
