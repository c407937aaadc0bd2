//! The fixed 8-slot encoding of one day that the model is trained on.

use serde::Serialize;

pub const FEATURE_COUNT: usize = 8;

/// Column names in slot order. The order is part of the model contract.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "temp_max",
    "temp_min",
    "rain",
    "wind",
    "humidity",
    "temp_range",
    "rain_binary",
    "humidity_norm",
];

/// One day encoded as `[temp_max, temp_min, rain, wind, humidity, temp_range,
/// rain_binary, humidity_norm]`.
///
/// The three derived slots are always computed from the raw slots:
/// `temp_range = temp_max - temp_min`, `rain_binary = 1` iff `rain > 0`, and
/// `humidity_norm = humidity / 100`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub const TEMP_MAX: usize = 0;
    pub const TEMP_MIN: usize = 1;
    pub const RAIN: usize = 2;
    pub const WIND: usize = 3;
    pub const HUMIDITY: usize = 4;
    pub const TEMP_RANGE: usize = 5;
    pub const RAIN_BINARY: usize = 6;
    pub const HUMIDITY_NORM: usize = 7;

    /// Encodes raw daily measurements, deriving the last three slots.
    pub fn from_observation(
        temp_max: f64,
        temp_min: f64,
        rain: f64,
        wind: f64,
        humidity: f64,
    ) -> Self {
        FeatureVector([
            temp_max,
            temp_min,
            rain,
            wind,
            humidity,
            temp_max - temp_min,
            rain_flag(rain),
            humidity / 100.0,
        ])
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// The value in slot `index`, `None` past the last slot.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    pub fn temp_max(&self) -> f64 {
        self.0[Self::TEMP_MAX]
    }

    pub fn temp_min(&self) -> f64 {
        self.0[Self::TEMP_MIN]
    }

    pub fn rain(&self) -> f64 {
        self.0[Self::RAIN]
    }

    pub fn wind(&self) -> f64 {
        self.0[Self::WIND]
    }

    pub fn humidity(&self) -> f64 {
        self.0[Self::HUMIDITY]
    }

    pub fn temp_range(&self) -> f64 {
        self.0[Self::TEMP_RANGE]
    }

    pub fn rain_binary(&self) -> f64 {
        self.0[Self::RAIN_BINARY]
    }

    pub fn humidity_norm(&self) -> f64 {
        self.0[Self::HUMIDITY_NORM]
    }

    /// Replaces the temperature slots, keeps rain, wind and humidity as they are and
    /// re-derives the flag and normalized humidity from those unchanged values.
    pub(crate) fn with_temperatures(
        mut self,
        temp_max: f64,
        temp_min: f64,
        temp_range: f64,
    ) -> Self {
        self.0[Self::TEMP_MAX] = temp_max;
        self.0[Self::TEMP_MIN] = temp_min;
        self.0[Self::TEMP_RANGE] = temp_range;
        self.0[Self::RAIN_BINARY] = rain_flag(self.0[Self::RAIN]);
        self.0[Self::HUMIDITY_NORM] = self.0[Self::HUMIDITY] / 100.0;
        self
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        FeatureVector(values)
    }
}

fn rain_flag(rain: f64) -> f64 {
    if rain > 0.0 {
        1.0
    } else {
        0.0
    }
}
