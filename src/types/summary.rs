use crate::utils::MONTH_ABBREVIATIONS;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;

/// A labelled pair of nullable climate aggregates.
///
/// `None` always means "no contributing data", never zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateEntry {
    pub label: &'static str,
    pub temp: Option<f64>, // °C
    pub rain: Option<f64>, // mm
}

/// Mean daily extremes of one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyEntry {
    pub year: i32,
    pub temp_max: Option<f64>, // °C
    pub temp_min: Option<f64>, // °C
}

/// Monthly, seasonal and per-year climate aggregates of a daily record sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalSummary {
    pub monthly: [ClimateEntry; 12],
    pub seasonal: [ClimateEntry; 4],
    /// One entry per year present in the input, oldest first.
    pub yearly: Vec<YearlyEntry>,
}

impl HistoricalSummary {
    /// The entry for a calendar month (1-12).
    pub fn month(&self, month: u32) -> Option<&ClimateEntry> {
        let idx = usize::try_from(month).ok()?.checked_sub(1)?;
        self.monthly.get(idx)
    }

    pub fn season(&self, season: Season) -> &ClimateEntry {
        &self.seasonal[season.index()]
    }

    pub fn year(&self, year: i32) -> Option<&YearlyEntry> {
        self.yearly.iter().find(|entry| entry.year == year)
    }
}

/// The four fixed three-month buckets, in calendar order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Season {
    /// January to March.
    Aurora,
    /// April to June.
    Zephyr,
    /// July to September.
    Solstice,
    /// October to December.
    Monsoon,
}

impl Season {
    pub const ALL: [Season; 4] = [
        Season::Aurora,
        Season::Zephyr,
        Season::Solstice,
        Season::Monsoon,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Season::Aurora => "Aurora",
            Season::Zephyr => "Zephyr",
            Season::Solstice => "Solstice",
            Season::Monsoon => "Monsoon",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Calendar months (1-12) feeding this bucket.
    pub fn months(self) -> RangeInclusive<u32> {
        let first = self.index() as u32 * 3 + 1;
        first..=first + 2
    }
}

impl Display for Season {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub(crate) fn month_label(month: u32) -> &'static str {
    MONTH_ABBREVIATIONS[(month as usize - 1) % 12]
}

/// One day of the model outlook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    /// Predicted daily maximum in °C, rounded to two decimals.
    #[serde(rename = "predicted_max_temp_c")]
    pub predicted_max_temp: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_months() {
        assert_eq!(Season::Aurora.months(), 1..=3);
        assert_eq!(Season::Zephyr.months(), 4..=6);
        assert_eq!(Season::Solstice.months(), 7..=9);
        assert_eq!(Season::Monsoon.months(), 10..=12);
    }

    #[test]
    fn test_month_labels() {
        assert_eq!(month_label(1), "Jan");
        assert_eq!(month_label(9), "Sep");
        assert_eq!(month_label(12), "Dec");
    }

    #[test]
    fn test_forecast_point_json_shape() -> Result<(), serde_json::Error> {
        let point = ForecastPoint {
            date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            predicted_max_temp: 19.87,
        };
        let json = serde_json::to_value(&point)?;
        assert_eq!(
            json,
            serde_json::json!({ "date": "2025-01-02", "predicted_max_temp_c": 19.87 })
        );
        Ok(())
    }
}
