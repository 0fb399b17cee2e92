use thiserror::Error;

/// Failures produced by the dashboard providers and the backoff executor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("Weather data for {0} is currently unavailable.")]
    CityUnavailable(String),

    #[error("Invalid amount")]
    InvalidAmount,

    /// Returned once every retry attempt has failed. The underlying cause is logged, not carried.
    #[error("Service temporarily unavailable. Please try again later.")]
    ServiceUnavailable,

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Response contained no generated text")]
    EmptyResponse,
}

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;
