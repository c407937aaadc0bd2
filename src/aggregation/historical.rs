//! Monthly and seasonal climate summaries of a daily record sequence.

use crate::error::{OutlookError, Stage};
use crate::types::daily_record::DailyRecord;
use crate::types::summary::{month_label, ClimateEntry, HistoricalSummary, Season, YearlyEntry};
use crate::utils::{mean, round2};
use chrono::Datelike;
use log::debug;
use std::collections::BTreeMap;

/// Running per-month samples, across all years in the input.
#[derive(Default)]
struct MonthBucket {
    temps: Vec<f64>,
    rains: Vec<f64>,
}

#[derive(Default)]
struct YearBucket {
    maxima: Vec<f64>,
    minima: Vec<f64>,
}

/// Summarizes `records` per calendar month, per season and per year.
///
/// Monthly values are the mean daily maximum and mean daily rain of every record in
/// that month, whatever the year, each over the records where the value is present.
/// Seasons are built from the rounded monthly values: temperature is the *mean* of
/// the non-null monthly temperatures, while rain is the *sum* of the non-null monthly
/// rain means. Everything is rounded to two decimals, and a value with nothing to
/// aggregate is `None`. Each year also gets its mean daily maximum and minimum.
///
/// # Errors
///
/// Returns [`OutlookError::UpstreamData`] when `records` is empty.
pub fn summarize(records: &[DailyRecord]) -> Result<HistoricalSummary, OutlookError> {
    if records.is_empty() {
        return Err(OutlookError::UpstreamData {
            stage: Stage::Aggregation,
        });
    }

    let mut buckets: [MonthBucket; 12] = Default::default();
    let mut years: BTreeMap<i32, YearBucket> = BTreeMap::new();
    for record in records {
        let year = years.entry(record.date.year()).or_default();
        year.maxima.extend(record.observed_temp_max());
        year.minima.extend(record.observed_temp_min());

        let bucket = &mut buckets[record.date.month0() as usize];
        if let Some(temp) = record.observed_temp_max() {
            bucket.temps.push(temp);
        }
        if let Some(rain) = record.observed_rain() {
            bucket.rains.push(rain);
        }
    }

    let monthly: [ClimateEntry; 12] = std::array::from_fn(|idx| {
        let bucket = &buckets[idx];
        ClimateEntry {
            label: month_label(idx as u32 + 1),
            temp: mean(&bucket.temps).map(round2),
            rain: mean(&bucket.rains).map(round2),
        }
    });

    let seasonal = Season::ALL.map(|season| {
        let months = &monthly[season.index() * 3..season.index() * 3 + 3];
        let temps: Vec<f64> = months.iter().filter_map(|m| m.temp).collect();
        let rains: Vec<f64> = months.iter().filter_map(|m| m.rain).collect();
        ClimateEntry {
            label: season.label(),
            temp: mean(&temps).map(round2),
            rain: (!rains.is_empty()).then(|| round2(rains.iter().sum())),
        }
    });

    let yearly = years
        .into_iter()
        .map(|(year, bucket)| YearlyEntry {
            year,
            temp_max: mean(&bucket.maxima).map(round2),
            temp_min: mean(&bucket.minima).map(round2),
        })
        .collect::<Vec<_>>();

    debug!(
        "Summarized {} daily records into {} populated months over {} years",
        records.len(),
        monthly.iter().filter(|m| m.temp.is_some() || m.rain.is_some()).count(),
        yearly.len()
    );
    Ok(HistoricalSummary {
        monthly,
        seasonal,
        yearly,
    })
}
