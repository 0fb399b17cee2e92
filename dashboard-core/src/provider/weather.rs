use async_trait::async_trait;
use rand::{Rng, seq::SliceRandom};
use std::time::Duration;
use tracing::debug;

use crate::{
    error::{DashboardError, Result},
    model::{Condition, WeatherResult},
};

use super::WeatherProvider;

pub const TEMPERATURE_RANGE_C: std::ops::Range<f64> = 20.0..35.0;
pub const WIND_SPEED_RANGE_KPH: std::ops::Range<f64> = 5.0..15.0;

/// Stand-in for a weather backend: sleeps, then either fails for the
/// requested city or returns uniformly sampled readings.
#[derive(Debug, Clone)]
pub struct SimulatedWeatherProvider {
    latency: Duration,
    failure_rate: f64,
}

impl Default for SimulatedWeatherProvider {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(100),
            failure_rate: 0.1,
        }
    }
}

impl SimulatedWeatherProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Clamped to `[0, 1]`; NaN disables failures.
    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = if failure_rate.is_nan() {
            0.0
        } else {
            failure_rate.clamp(0.0, 1.0)
        };
        self
    }

    fn sample(&self, city: &str) -> Result<WeatherResult> {
        let mut rng = rand::thread_rng();

        if rng.gen_bool(self.failure_rate) {
            return Err(DashboardError::CityUnavailable(city.to_string()));
        }

        let condition = *Condition::all()
            .choose(&mut rng)
            .unwrap_or(&Condition::Sunny);

        Ok(WeatherResult {
            city: city.to_string(),
            temperature_c: rng.gen_range(TEMPERATURE_RANGE_C),
            condition,
            wind_speed_kph: rng.gen_range(WIND_SPEED_RANGE_KPH),
        })
    }
}

#[async_trait]
impl WeatherProvider for SimulatedWeatherProvider {
    async fn get_weather(&self, city: &str) -> Result<WeatherResult> {
        debug!(city, "looking up weather");
        tokio::time::sleep(self.latency).await;
        self.sample(city)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn successful_lookups_stay_in_range() {
        let provider = SimulatedWeatherProvider::new().with_failure_rate(0.0);

        for _ in 0..500 {
            let result = provider.get_weather("Mumbai").await.expect("never fails");

            assert_eq!(result.city, "Mumbai");
            assert!(TEMPERATURE_RANGE_C.contains(&result.temperature_c));
            assert!(WIND_SPEED_RANGE_KPH.contains(&result.wind_speed_kph));
            assert!(Condition::all().contains(&result.condition));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fails_roughly_ten_percent_of_the_time() {
        let provider = SimulatedWeatherProvider::new();
        let runs = 4000;

        let mut failures = 0;
        for _ in 0..runs {
            if provider.get_weather("Delhi").await.is_err() {
                failures += 1;
            }
        }

        let rate = failures as f64 / runs as f64;
        assert!((0.07..0.13).contains(&rate), "failure rate was {rate}");
    }

    #[tokio::test(start_paused = true)]
    async fn failure_names_the_city() {
        let provider = SimulatedWeatherProvider::new().with_failure_rate(1.0);

        let err = provider.get_weather("London, UK").await.unwrap_err();

        assert_eq!(err, DashboardError::CityUnavailable("London, UK".into()));
        assert!(err.to_string().contains("London, UK"));
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_waits_for_simulated_latency() {
        let provider = SimulatedWeatherProvider::new()
            .with_failure_rate(0.0)
            .with_latency(Duration::from_millis(250));
        let start = tokio::time::Instant::now();

        provider.get_weather("").await.expect("empty city is accepted");

        assert_eq!(start.elapsed(), Duration::from_millis(250));
    }

    #[test]
    fn failure_rate_is_clamped() {
        assert_eq!(SimulatedWeatherProvider::new().with_failure_rate(3.0).failure_rate, 1.0);
        assert_eq!(SimulatedWeatherProvider::new().with_failure_rate(-1.0).failure_rate, 0.0);
        assert_eq!(SimulatedWeatherProvider::new().with_failure_rate(f64::NAN).failure_rate, 0.0);
    }
}
