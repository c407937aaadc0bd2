//! Defines the `WeatherCode` enum, mapping WMO weather interpretation codes (as
//! reported by Open-Meteo's `weathercode` fields) to short display labels.

/// Label used for any code the table does not know.
pub const FALLBACK_LABEL: &str = "Live weather";

/// A WMO weather interpretation code.
///
/// Several codes share a label (e.g. both 56 and 57 read "Freezing drizzle"); they
/// remain separate variants so the numeric code survives a round trip.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum WeatherCode {
    ClearSky = 0,
    MainlyClear = 1,
    PartlyCloudy = 2,
    Overcast = 3,
    Fog = 45,
    RimeFog = 48,
    LightDrizzle = 51,
    Drizzle = 53,
    DenseDrizzle = 55,
    LightFreezingDrizzle = 56,
    DenseFreezingDrizzle = 57,
    LightRain = 61,
    Rain = 63,
    HeavyRain = 65,
    LightFreezingRain = 66,
    HeavyFreezingRain = 67,
    LightSnow = 71,
    Snow = 73,
    HeavySnow = 75,
    SnowGrains = 77,
    RainShowers = 80,
    HeavyRainShowers = 81,
    ViolentRainShowers = 82,
    SnowShowers = 85,
    HeavySnowShowers = 86,
    Thunderstorm = 95,
    ThunderstormSlightHail = 96,
    ThunderstormHeavyHail = 99,
}

impl WeatherCode {
    /// Converts a numeric WMO code, `None` for codes outside the table.
    ///
    /// ```rust
    /// use climate_outlook::WeatherCode;
    ///
    /// assert_eq!(WeatherCode::from_i64(63), Some(WeatherCode::Rain));
    /// assert_eq!(WeatherCode::from_i64(4), None);
    /// ```
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(WeatherCode::ClearSky),
            1 => Some(WeatherCode::MainlyClear),
            2 => Some(WeatherCode::PartlyCloudy),
            3 => Some(WeatherCode::Overcast),
            45 => Some(WeatherCode::Fog),
            48 => Some(WeatherCode::RimeFog),
            51 => Some(WeatherCode::LightDrizzle),
            53 => Some(WeatherCode::Drizzle),
            55 => Some(WeatherCode::DenseDrizzle),
            56 => Some(WeatherCode::LightFreezingDrizzle),
            57 => Some(WeatherCode::DenseFreezingDrizzle),
            61 => Some(WeatherCode::LightRain),
            63 => Some(WeatherCode::Rain),
            65 => Some(WeatherCode::HeavyRain),
            66 => Some(WeatherCode::LightFreezingRain),
            67 => Some(WeatherCode::HeavyFreezingRain),
            71 => Some(WeatherCode::LightSnow),
            73 => Some(WeatherCode::Snow),
            75 => Some(WeatherCode::HeavySnow),
            77 => Some(WeatherCode::SnowGrains),
            80 => Some(WeatherCode::RainShowers),
            81 => Some(WeatherCode::HeavyRainShowers),
            82 => Some(WeatherCode::ViolentRainShowers),
            85 => Some(WeatherCode::SnowShowers),
            86 => Some(WeatherCode::HeavySnowShowers),
            95 => Some(WeatherCode::Thunderstorm),
            96 => Some(WeatherCode::ThunderstormSlightHail),
            99 => Some(WeatherCode::ThunderstormHeavyHail),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn label(self) -> &'static str {
        match self {
            WeatherCode::ClearSky => "Clear sky",
            WeatherCode::MainlyClear => "Mainly clear",
            WeatherCode::PartlyCloudy => "Partly cloudy",
            WeatherCode::Overcast => "Cloudy",
            WeatherCode::Fog => "Foggy",
            WeatherCode::RimeFog => "Rime fog",
            WeatherCode::LightDrizzle => "Light drizzle",
            WeatherCode::Drizzle => "Drizzle",
            WeatherCode::DenseDrizzle => "Heavy drizzle",
            WeatherCode::LightFreezingDrizzle | WeatherCode::DenseFreezingDrizzle => {
                "Freezing drizzle"
            }
            WeatherCode::LightRain => "Light rain",
            WeatherCode::Rain => "Moderate rain",
            WeatherCode::HeavyRain => "Heavy rain",
            WeatherCode::LightFreezingRain | WeatherCode::HeavyFreezingRain => "Freezing rain",
            WeatherCode::LightSnow => "Light snow",
            WeatherCode::Snow => "Snow",
            WeatherCode::HeavySnow => "Heavy snow",
            WeatherCode::SnowGrains => "Snow grains",
            WeatherCode::RainShowers => "Rain showers",
            WeatherCode::HeavyRainShowers => "Heavy showers",
            WeatherCode::ViolentRainShowers => "Violent showers",
            WeatherCode::SnowShowers | WeatherCode::HeavySnowShowers => "Snow showers",
            WeatherCode::Thunderstorm => "Thunderstorms",
            WeatherCode::ThunderstormSlightHail => "Thunder w/ hail",
            WeatherCode::ThunderstormHeavyHail => "Severe hail",
        }
    }

    /// Label for a raw numeric code, [`FALLBACK_LABEL`] when it is unknown.
    pub fn label_for(code: i64) -> &'static str {
        Self::from_i64(code).map_or(FALLBACK_LABEL, Self::label)
    }
}
