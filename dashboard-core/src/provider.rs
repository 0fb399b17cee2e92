use crate::{
    Config,
    error::Result,
    model::{ConversionResult, Quote, WeatherResult},
    provider::{
        currency::SimulatedCurrencyProvider, quote::RemoteQuoteProvider,
        weather::SimulatedWeatherProvider,
    },
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod currency;
pub mod quote;
pub mod weather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn get_weather(&self, city: &str) -> Result<WeatherResult>;
}

#[async_trait]
pub trait CurrencyProvider: Send + Sync + Debug {
    /// Converts an amount in INR. Fails with `InvalidAmount` for
    /// non-finite or non-positive input.
    async fn convert(&self, amount_inr: f64) -> Result<ConversionResult>;
}

/// Quote source. Never fails: every internal error resolves to a local quote.
#[async_trait]
pub trait QuoteProvider: Send + Sync + Debug {
    async fn quote(&self) -> Quote;
}

/// One provider per widget, shareable across widget instances.
#[derive(Debug, Clone)]
pub struct Providers {
    pub weather: Arc<dyn WeatherProvider>,
    pub currency: Arc<dyn CurrencyProvider>,
    pub quote: Arc<dyn QuoteProvider>,
}

impl Providers {
    pub fn from_config(config: &Config) -> Self {
        let weather = SimulatedWeatherProvider::new()
            .with_latency(config.weather.latency())
            .with_failure_rate(config.weather.failure_rate);

        let currency = SimulatedCurrencyProvider::new().with_latency(config.currency.latency());

        let quote = RemoteQuoteProvider::from_config(&config.quote, config.api_key());

        Self {
            weather: Arc::new(weather),
            currency: Arc::new(currency),
            quote: Arc::new(quote),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn providers_from_default_config_work_offline() {
        let providers = temp_env::with_var_unset(crate::config::API_KEY_ENV, || {
            Providers::from_config(&Config::default())
        });

        let conversion = providers.currency.convert(100.0).await.expect("valid amount");
        assert_eq!(conversion.usd, "1.13");

        let quote = providers.quote.quote().await;
        assert!(!quote.is_empty());
    }
}
