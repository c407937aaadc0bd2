use chrono::{Days, NaiveDate, TimeZone, Utc};
use climate_outlook::{
    engineer_features, summarize, ClimateReport, DailyRecord, ForestRegressor, OutlookConfig,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn year_of_records() -> Vec<DailyRecord> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..365)
        .map(|i| {
            let phase = i as f64 / 365.0 * std::f64::consts::TAU;
            let temp_max = 15.0 - 9.0 * phase.cos() + (i % 5) as f64 * 0.4;
            DailyRecord::new(
                start + Days::new(i),
                temp_max,
                temp_max - 8.5,
                if i % 4 == 0 { 2.0 } else { 0.0 },
                6.0 + (i % 6) as f64,
                50.0 + (i % 11) as f64,
            )
        })
        .collect()
}

fn bench_outlook(c: &mut Criterion) {
    let records = year_of_records();
    let config = OutlookConfig::default();
    let training = engineer_features(&records).unwrap();
    let features = training.feature_matrix();
    let targets = training.targets();
    let reference = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

    c.bench_function("summarize", |b| b.iter(|| summarize(black_box(&records))));
    c.bench_function("fit_forest", |b| {
        b.iter(|| ForestRegressor::fit(black_box(&features), black_box(&targets), &config))
    });
    c.bench_function("climate_report", |b| {
        b.iter(|| {
            ClimateReport::from_records(black_box(&records))
                .reference(reference)
                .config(&config)
                .call()
        })
    });
}

criterion_group!(benches, bench_outlook);
criterion_main!(benches);
