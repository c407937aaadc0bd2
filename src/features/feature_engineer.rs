//! Turns an ordered daily record sequence into next-day supervised examples.

use crate::error::{OutlookError, Stage};
use crate::types::daily_record::DailyRecord;
use crate::types::feature_vector::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use chrono::NaiveDate;
use log::{debug, warn};
use polars::prelude::{df, CsvWriter, DataFrame, SerWriter};
use std::fs::File;
use std::path::Path;

/// A day's features paired with the following day's maximum temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExample {
    pub date: NaiveDate,
    pub features: FeatureVector,
    pub target: f64,
}

/// The examples engineered from one record sequence, in input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrainingSet {
    examples: Vec<TrainingExample>,
    /// Records skipped because a measurement was missing.
    pub dropped: usize,
}

impl TrainingSet {
    pub fn examples(&self) -> &[TrainingExample] {
        &self.examples
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Row-major feature matrix, one row per example.
    pub fn feature_matrix(&self) -> Vec<[f64; FEATURE_COUNT]> {
        self.examples.iter().map(|e| *e.features.values()).collect()
    }

    pub fn targets(&self) -> Vec<f64> {
        self.examples.iter().map(|e| e.target).collect()
    }

    /// Features of the most recent example: the seed of a recursive forecast.
    pub fn last_features(&self) -> Option<FeatureVector> {
        self.examples.last().map(|e| e.features)
    }

    /// Exports the cleaned dataset: a `date` column, the eight feature columns and `target`.
    pub fn to_frame(&self) -> Result<DataFrame, OutlookError> {
        let column = |idx: usize| -> Vec<f64> {
            self.examples.iter().map(|e| e.features.values()[idx]).collect()
        };
        let dates: Vec<NaiveDate> = self.examples.iter().map(|e| e.date).collect();
        df!(
            "date" => dates,
            FEATURE_NAMES[0] => column(0),
            FEATURE_NAMES[1] => column(1),
            FEATURE_NAMES[2] => column(2),
            FEATURE_NAMES[3] => column(3),
            FEATURE_NAMES[4] => column(4),
            FEATURE_NAMES[5] => column(5),
            FEATURE_NAMES[6] => column(6),
            FEATURE_NAMES[7] => column(7),
            "target" => self.targets(),
        )
        .map_err(OutlookError::polars(Stage::FeatureEngineering))
    }

    /// Writes [`TrainingSet::to_frame`] to `path` as CSV with a header row.
    pub fn export_csv(&self, path: impl AsRef<Path>) -> Result<(), OutlookError> {
        let path = path.as_ref();
        let mut frame = self.to_frame()?;
        let mut file = File::create(path).map_err(|source| OutlookError::CsvWrite {
            stage: Stage::FeatureEngineering,
            path: path.to_path_buf(),
            source,
        })?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut frame)
            .map_err(OutlookError::polars(Stage::FeatureEngineering))?;
        debug!("Exported {} training examples to {}", self.len(), path.display());
        Ok(())
    }
}

/// Builds one example per record that has a complete set of measurements and a
/// successor with an observed maximum temperature.
///
/// Records are paired by position: the target of record `i` is the maximum of record
/// `i + 1`, whatever its date. A record with a gap is dropped as an example but can
/// still serve as its predecessor's target. The final record never has a target.
/// Values are encoded as-is, without clipping.
///
/// # Errors
///
/// Returns [`OutlookError::UpstreamData`] when `records` is empty.
pub fn engineer_features(records: &[DailyRecord]) -> Result<TrainingSet, OutlookError> {
    if records.is_empty() {
        return Err(OutlookError::UpstreamData {
            stage: Stage::FeatureEngineering,
        });
    }

    let mut examples = Vec::with_capacity(records.len() - 1);
    let mut dropped = 0;
    for pair in records.windows(2) {
        let (today, tomorrow) = (&pair[0], &pair[1]);
        let Some([temp_max, temp_min, rain, wind, humidity]) = today.measurements() else {
            debug!("Dropping incomplete record for {}", today.date);
            dropped += 1;
            continue;
        };
        let Some(target) = tomorrow.observed_temp_max() else {
            debug!("Dropping record for {}: no maximum on the following day", today.date);
            dropped += 1;
            continue;
        };
        examples.push(TrainingExample {
            date: today.date,
            features: FeatureVector::from_observation(temp_max, temp_min, rain, wind, humidity),
            target,
        });
    }

    if dropped > 0 {
        warn!(
            "Dropped {} of {} daily records with missing measurements",
            dropped,
            records.len()
        );
    }
    Ok(TrainingSet { examples, dropped })
}
