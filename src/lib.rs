mod aggregation;
mod config;
mod error;
mod features;
mod forecast;
mod frames;
mod model;
mod report;
mod types;
mod utils;

pub use config::OutlookConfig;
pub use error::{OutlookError, Stage};
pub use report::*;

pub use aggregation::historical::summarize;
pub use features::feature_engineer::{engineer_features, TrainingExample, TrainingSet};
pub use forecast::recursive::{ForecastStep, RecursiveForecaster};
pub use frames::daily_frame::DailyFrame;
pub use model::forest::ForestRegressor;
pub use model::OneStepModel;

pub use types::daily_record::DailyRecord;
pub use types::feature_vector::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use types::summary::{ClimateEntry, ForecastPoint, HistoricalSummary, Season, YearlyEntry};
pub use types::weather_code::WeatherCode;
