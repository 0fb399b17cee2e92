use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sky condition reported by the weather lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    PartlyCloudy,
    Sunny,
    LightRain,
    Hazy,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::PartlyCloudy => "Partly Cloudy",
            Condition::Sunny => "Sunny",
            Condition::LightRain => "Light Rain",
            Condition::Hazy => "Hazy",
        }
    }

    pub const fn all() -> &'static [Condition] {
        &[
            Condition::PartlyCloudy,
            Condition::Sunny,
            Condition::LightRain,
            Condition::Hazy,
        ]
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub city: String,
    pub temperature_c: f64,
    pub condition: Condition,
    pub wind_speed_kph: f64,
}

impl WeatherResult {
    /// Temperature with one decimal place, e.g. `27.4`.
    pub fn temperature_display(&self) -> String {
        format!("{:.1}", self.temperature_c)
    }

    pub fn wind_speed_display(&self) -> String {
        format!("{:.1}", self.wind_speed_kph)
    }
}

/// Result of converting an INR amount to USD and EUR.
///
/// The converted amounts are kept as strings already rounded to two decimal
/// places, exactly as they are shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub amount_inr: f64,
    pub usd: String,
    pub eur: String,
    pub computed_at: DateTime<Local>,
}

impl ConversionResult {
    pub fn computed_at_display(&self) -> String {
        self.computed_at.format("%H:%M:%S").to_string()
    }
}

/// A motivational quote. Remote and local quotes are indistinguishable.
pub type Quote = String;
