// daily_frame.rs

//! Contains the `DailyFrame` structure, the boundary where columnar daily weather data
//! is validated once and turned into typed [`DailyRecord`]s.

use crate::error::{OutlookError, Stage};
use crate::types::daily_record::DailyRecord;
use chrono::{Days, NaiveDate};
use log::{info, warn};
use polars::prelude::*;
use std::path::Path;

pub const COL_DATE: &str = "date";
pub const COL_TEMP_MAX: &str = "temp_max"; // °C
pub const COL_TEMP_MIN: &str = "temp_min"; // °C
pub const COL_RAIN: &str = "rain"; // mm
pub const COL_WIND: &str = "wind"; // km/h
pub const COL_HUMIDITY: &str = "humidity"; // %

/// Archive provider column names and the names this crate uses for them.
const PROVIDER_COLUMNS: [(&str, &str); 6] = [
    ("time", COL_DATE),
    ("temperature_2m_max", COL_TEMP_MAX),
    ("temperature_2m_min", COL_TEMP_MIN),
    ("precipitation_sum", COL_RAIN),
    ("wind_speed_10m_max", COL_WIND),
    ("relative_humidity_2m_mean", COL_HUMIDITY),
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Retrieves a column by name from a DataFrame.
fn get_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, OutlookError> {
    df.column(name).map_err(|e| OutlookError::MissingColumn {
        stage: Stage::Ingestion,
        column: name.to_string(),
        source: e,
    })
}

/// Reads a measurement column as optional floats. Cells that cannot be read as a
/// number become `None`.
fn get_opt_floats(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, OutlookError> {
    let column = get_column(df, name)?
        .cast(&DataType::Float64)
        .map_err(OutlookError::polars(Stage::Ingestion))?;
    let values = column
        .f64()
        .map_err(OutlookError::polars(Stage::Ingestion))?
        .into_iter()
        .collect();
    Ok(values)
}

/// Reads the date column, accepting polars dates, datetimes or `YYYY-MM-DD` strings.
fn get_opt_dates(df: &DataFrame) -> Result<Vec<Option<NaiveDate>>, OutlookError> {
    let column = get_column(df, COL_DATE)?;
    if column.dtype() == &DataType::String {
        return column
            .str()
            .map_err(OutlookError::polars(Stage::Ingestion))?
            .into_iter()
            .map(|opt| {
                opt.map(|s| {
                    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| {
                        OutlookError::InvalidDate {
                            stage: Stage::Ingestion,
                            value: s.to_string(),
                        }
                    })
                })
                .transpose()
            })
            .collect();
    }

    let days = column
        .cast(&DataType::Date)
        .and_then(|c| c.cast(&DataType::Int32))
        .map_err(OutlookError::polars(Stage::Ingestion))?;
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    let dates = days
        .i32()
        .map_err(OutlookError::polars(Stage::Ingestion))?
        .into_iter()
        .map(|opt| opt.and_then(|d| days_from_epoch(epoch, d)))
        .collect();
    Ok(dates)
}

fn days_from_epoch(epoch: NaiveDate, days: i32) -> Option<NaiveDate> {
    if days >= 0 {
        epoch.checked_add_days(Days::new(days as u64))
    } else {
        epoch.checked_sub_days(Days::new(days.unsigned_abs() as u64))
    }
}

/// A wrapper around a Polars `LazyFrame` holding one row per day with the columns
/// `date, temp_max, temp_min, rain, wind, humidity`.
///
/// Filtering stays lazy; [`DailyFrame::collect_records`] is the single point where
/// the data is materialized, checked and converted.
///
/// # Errors
///
/// Operations that trigger computation can return [`OutlookError::Polars`], and a
/// frame lacking one of the six columns fails with [`OutlookError::MissingColumn`].
#[derive(Clone)]
pub struct DailyFrame {
    /// The underlying Polars LazyFrame containing the daily data.
    pub frame: LazyFrame,
}

impl DailyFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Renames the weather archive's column names (`time`, `temperature_2m_max`,
    /// `temperature_2m_min`, `precipitation_sum`, `wind_speed_10m_max`,
    /// `relative_humidity_2m_mean`) to this crate's names. Columns that are not
    /// present are left alone.
    pub fn with_provider_names(self) -> Self {
        let (existing, new): (Vec<&str>, Vec<&str>) = PROVIDER_COLUMNS.iter().copied().unzip();
        DailyFrame::new(self.frame.rename(existing, new, false))
    }

    /// Builds a frame from already-typed records, e.g. to filter them lazily.
    pub fn from_records(records: &[DailyRecord]) -> Result<Self, OutlookError> {
        let df = df!(
            COL_DATE => records.iter().map(|r| r.date).collect::<Vec<NaiveDate>>(),
            COL_TEMP_MAX => records.iter().map(|r| r.temp_max).collect::<Vec<_>>(),
            COL_TEMP_MIN => records.iter().map(|r| r.temp_min).collect::<Vec<_>>(),
            COL_RAIN => records.iter().map(|r| r.rain).collect::<Vec<_>>(),
            COL_WIND => records.iter().map(|r| r.wind).collect::<Vec<_>>(),
            COL_HUMIDITY => records.iter().map(|r| r.humidity).collect::<Vec<_>>(),
        )
        .map_err(OutlookError::polars(Stage::Ingestion))?;
        Ok(DailyFrame::new(df.lazy()))
    }

    /// Reads a daily CSV file with a header row.
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self, OutlookError> {
        let path = path.as_ref().to_path_buf();
        let csv_error = |source: PolarsError| OutlookError::CsvRead {
            stage: Stage::Ingestion,
            path: path.clone(),
            source,
        };
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.clone()))
            .map_err(csv_error)?
            .finish()
            .map_err(csv_error)?;
        info!("Read {} daily rows from {}", df.height(), path.display());
        Ok(DailyFrame::new(df.lazy()))
    }

    /// Filters the daily data based on a Polars predicate expression.
    pub fn filter(&self, predicate: Expr) -> DailyFrame {
        DailyFrame::new(self.frame.clone().filter(predicate))
    }

    /// Keeps the days from `start` to `end` inclusive. Expects a `Date`-typed `date`
    /// column, as produced by [`DailyFrame::from_records`].
    pub fn get_range(&self, start: NaiveDate, end: NaiveDate) -> DailyFrame {
        self.filter(
            col(COL_DATE)
                .gt_eq(lit(start))
                .and(col(COL_DATE).lt_eq(lit(end))),
        )
    }

    /// Collects the frame into records sorted by date.
    ///
    /// Measurement cells that are null or not numeric become `None`; those records are
    /// kept here and dropped later by feature engineering. Rows without a date cannot be
    /// placed in the sequence and are skipped.
    ///
    /// # Errors
    ///
    /// [`OutlookError::MissingColumn`] if a required column is absent,
    /// [`OutlookError::InvalidDate`] for a date string that is not `YYYY-MM-DD`, and
    /// [`OutlookError::Polars`] if evaluating the frame fails.
    pub fn collect_records(self) -> Result<Vec<DailyRecord>, OutlookError> {
        let df = self
            .frame
            .collect()
            .map_err(OutlookError::polars(Stage::Ingestion))?;

        let dates = get_opt_dates(&df)?;
        let temp_max = get_opt_floats(&df, COL_TEMP_MAX)?;
        let temp_min = get_opt_floats(&df, COL_TEMP_MIN)?;
        let rain = get_opt_floats(&df, COL_RAIN)?;
        let wind = get_opt_floats(&df, COL_WIND)?;
        let humidity = get_opt_floats(&df, COL_HUMIDITY)?;

        let mut records = Vec::with_capacity(df.height());
        for (idx, date) in dates.into_iter().enumerate() {
            let Some(date) = date else {
                continue;
            };
            records.push(DailyRecord {
                date,
                temp_max: temp_max[idx],
                temp_min: temp_min[idx],
                rain: rain[idx],
                wind: wind[idx],
                humidity: humidity[idx],
            });
        }
        if records.len() < df.height() {
            warn!(
                "Skipped {} daily rows without a date",
                df.height() - records.len()
            );
        }
        records.sort_by_key(|r| r.date);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_from_records_round_trip() -> Result<(), OutlookError> {
        let mut second = DailyRecord::new(date(1, 2), 9.0, 1.0, 0.0, 11.0, 80.0);
        second.wind = None;
        let records = vec![DailyRecord::new(date(1, 1), 8.5, 0.5, 1.2, 14.0, 77.0), second];

        let collected = DailyFrame::from_records(&records)?.collect_records()?;
        assert_eq!(collected, records);
        Ok(())
    }

    #[test]
    fn test_get_range_is_inclusive() -> Result<(), OutlookError> {
        let records: Vec<DailyRecord> = (1..=10)
            .map(|d| DailyRecord::new(date(3, d), 10.0 + d as f64, 2.0, 0.0, 5.0, 50.0))
            .collect();
        let collected = DailyFrame::from_records(&records)?
            .get_range(date(3, 3), date(3, 6))
            .collect_records()?;

        let dates: Vec<NaiveDate> = collected.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(3, 3), date(3, 4), date(3, 5), date(3, 6)]);
        Ok(())
    }

    #[test]
    fn test_filter_by_expression() -> Result<(), OutlookError> {
        let records: Vec<DailyRecord> = (1..=6)
            .map(|d| DailyRecord::new(date(7, d), 20.0 + d as f64, 12.0, 0.0, 5.0, 50.0))
            .collect();
        let hot = DailyFrame::from_records(&records)?
            .filter(col(COL_TEMP_MAX).gt(lit(24.0f64)))
            .collect_records()?;
        assert_eq!(hot.len(), 2);
        Ok(())
    }

    #[test]
    fn test_read_csv_with_string_dates_and_gaps() -> Result<(), OutlookError> {
        let file = write_csv(
            "date,temp_max,temp_min,rain,wind,humidity\n\
             2024-05-02,18.5,9.0,0.0,12.0,61\n\
             2024-05-01,17.0,8.5,2.4,10.5,70\n\
             2024-05-03,,9.5,n/a,11.0,66\n",
        );
        let records = DailyFrame::read_csv(file.path())?.collect_records()?;

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].date, date(5, 1));
        assert_eq!(records[0].rain, Some(2.4));
        assert_eq!(records[1].humidity, Some(61.0));
        assert_eq!(records[2].temp_max, None);
        assert_eq!(records[2].rain, None);
        assert!(!records[2].is_complete());
        Ok(())
    }

    #[test]
    fn test_provider_column_names_are_renamed() -> Result<(), OutlookError> {
        let file = write_csv(
            "time,temperature_2m_max,temperature_2m_min,\
             precipitation_sum,wind_speed_10m_max,relative_humidity_2m_mean\n\
             2024-02-01,5.5,-1.0,0.3,22.1,88\n",
        );
        let records = DailyFrame::read_csv(file.path())?
            .with_provider_names()
            .collect_records()?;
        assert_eq!(
            records,
            vec![DailyRecord::new(date(2, 1), 5.5, -1.0, 0.3, 22.1, 88.0)]
        );
        Ok(())
    }

    #[test]
    fn test_missing_column_is_reported() {
        let file = write_csv("date,temp_max,temp_min,rain,wind\n2024-02-01,5.5,-1.0,0.3,22.1\n");
        let err = DailyFrame::read_csv(file.path())
            .and_then(DailyFrame::collect_records)
            .unwrap_err();
        match err {
            OutlookError::MissingColumn { column, stage, .. } => {
                assert_eq!(column, COL_HUMIDITY);
                assert_eq!(stage, Stage::Ingestion);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_date_string_is_reported() {
        let file = write_csv(
            "date,temp_max,temp_min,rain,wind,humidity\n01/02/2024,5.5,-1.0,0.3,22.1,80\n",
        );
        let err = DailyFrame::read_csv(file.path())
            .and_then(DailyFrame::collect_records)
            .unwrap_err();
        assert!(matches!(err, OutlookError::InvalidDate { .. }));
    }

    #[test]
    fn test_days_from_epoch() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(days_from_epoch(epoch, 0), Some(epoch));
        assert_eq!(days_from_epoch(epoch, 19_723), Some(date(1, 1)));
        assert_eq!(
            days_from_epoch(epoch, -1),
            NaiveDate::from_ymd_opt(1969, 12, 31)
        );
    }
}
