use async_trait::async_trait;
use chrono::Local;
use std::time::Duration;
use tracing::debug;

use crate::{
    error::{DashboardError, Result},
    model::ConversionResult,
};

use super::CurrencyProvider;

/// INR per USD.
pub const INR_PER_USD: f64 = 88.3;
/// INR per EUR.
pub const INR_PER_EUR: f64 = 98.0;

/// Fixed-rate INR converter with simulated latency.
#[derive(Debug, Clone)]
pub struct SimulatedCurrencyProvider {
    latency: Duration,
}

impl Default for SimulatedCurrencyProvider {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(1000),
        }
    }
}

impl SimulatedCurrencyProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

/// Validation shared with the widget, which rejects input before calling out.
pub fn is_valid_amount(amount: f64) -> bool {
    amount.is_finite() && amount > 0.0
}

pub fn convert_amount(amount_inr: f64) -> Result<ConversionResult> {
    if !is_valid_amount(amount_inr) {
        return Err(DashboardError::InvalidAmount);
    }

    Ok(ConversionResult {
        amount_inr,
        usd: format!("{:.2}", amount_inr / INR_PER_USD),
        eur: format!("{:.2}", amount_inr / INR_PER_EUR),
        computed_at: Local::now(),
    })
}

#[async_trait]
impl CurrencyProvider for SimulatedCurrencyProvider {
    async fn convert(&self, amount_inr: f64) -> Result<ConversionResult> {
        if !is_valid_amount(amount_inr) {
            return Err(DashboardError::InvalidAmount);
        }

        debug!(amount_inr, "converting currency");
        tokio::time::sleep(self.latency).await;
        convert_amount(amount_inr)
    }
}
