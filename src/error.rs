use chrono::NaiveDate;
use polars::error::PolarsError;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use thiserror::Error;

/// The pipeline stage an [`OutlookError`] originated from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Stage {
    Ingestion,
    FeatureEngineering,
    Training,
    Forecasting,
    Aggregation,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Ingestion => "ingestion",
            Stage::FeatureEngineering => "feature engineering",
            Stage::Training => "training",
            Stage::Forecasting => "forecasting",
            Stage::Aggregation => "aggregation",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum OutlookError {
    #[error("[{stage}] daily record sequence is missing or empty")]
    UpstreamData { stage: Stage },

    #[error("[{stage}] cannot fit model: {reason}")]
    Training { stage: Stage, reason: String },

    #[error("[{stage}] outlook date past {date} is out of range")]
    DateOutOfRange { stage: Stage, date: NaiveDate },

    #[error("[{stage}] required column '{column}' not found in daily frame")]
    MissingColumn {
        stage: Stage,
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("[{stage}] unparseable date '{value}' in daily frame")]
    InvalidDate { stage: Stage, value: String },

    #[error("[{stage}] polars operation failed")]
    Polars {
        stage: Stage,
        #[source]
        source: PolarsError,
    },

    #[error("[{stage}] failed to read daily CSV '{path}'")]
    CsvRead {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("[{stage}] failed to write CSV '{path}'")]
    CsvWrite {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Background report task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl OutlookError {
    /// The stage that produced this error, `None` for a failed background task.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            OutlookError::UpstreamData { stage }
            | OutlookError::Training { stage, .. }
            | OutlookError::DateOutOfRange { stage, .. }
            | OutlookError::MissingColumn { stage, .. }
            | OutlookError::InvalidDate { stage, .. }
            | OutlookError::Polars { stage, .. }
            | OutlookError::CsvRead { stage, .. }
            | OutlookError::CsvWrite { stage, .. } => Some(*stage),
            OutlookError::TaskJoin(_) => None,
        }
    }

    /// Whether a hosting service should answer with "service unavailable".
    ///
    /// Only missing upstream data qualifies; everything else is an internal failure.
    pub fn is_service_unavailable(&self) -> bool {
        matches!(self, OutlookError::UpstreamData { .. })
    }

    pub(crate) fn polars(stage: Stage) -> impl FnOnce(PolarsError) -> OutlookError {
        move |source| OutlookError::Polars { stage, source }
    }
}
