//! Core library for the `dashboard` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - A bounded exponential-backoff executor
//! - Weather, currency and quote providers behind async traits
//! - Per-widget request state and the tab router
//!
//! It is used by `dashboard-cli`, but the widgets can be driven by any front end.

pub mod backoff;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod shell;
pub mod widget;

pub use backoff::Backoff;
pub use config::Config;
pub use error::DashboardError;
pub use model::{Condition, ConversionResult, Quote, WeatherResult};
pub use provider::{CurrencyProvider, Providers, QuoteProvider, WeatherProvider};
pub use shell::{ActiveWidget, Shell, Tab};
pub use widget::{Completed, Fetch, RequestId, RequestState};
