use std::sync::Arc;

use crate::{
    model::ConversionResult,
    provider::{CurrencyProvider, currency::is_valid_amount},
};

use super::{Completed, Fetch, RequestSlot, RequestState};

pub const INVALID_INPUT_MESSAGE: &str = "Please enter a valid positive amount";

/// INR amount field that converts on every valid keystroke.
#[derive(Debug)]
pub struct CurrencyWidget {
    provider: Arc<dyn CurrencyProvider>,
    input: String,
    slot: RequestSlot<ConversionResult>,
}

impl CurrencyWidget {
    pub fn new(provider: Arc<dyn CurrencyProvider>, default_amount: impl Into<String>) -> Self {
        Self {
            provider,
            input: default_amount.into(),
            slot: RequestSlot::default(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn state(&self) -> &RequestState<ConversionResult> {
        self.slot.state()
    }

    pub fn displayed(&self) -> Option<&ConversionResult> {
        self.slot.displayed()
    }

    /// Converts the initial amount, subject to the same rules as typed input.
    pub fn mount(&mut self) -> Option<Fetch<ConversionResult>> {
        let input = self.input.clone();
        self.set_input(input)
    }

    /// Handles an edit of the amount field.
    ///
    /// Empty input clears the result. Input that is not a positive number
    /// sets an error and never reaches the provider. Anything else starts a
    /// conversion.
    pub fn set_input(&mut self, input: impl Into<String>) -> Option<Fetch<ConversionResult>> {
        self.input = input.into();
        let text = self.input.trim();

        if text.is_empty() {
            self.slot.reset();
            return None;
        }

        match text.parse::<f64>() {
            Ok(amount) if is_valid_amount(amount) => Some(self.issue(amount)),
            _ => {
                self.slot.fail(INVALID_INPUT_MESSAGE);
                None
            }
        }
    }

    /// Re-runs the amount currently in the field. Invalid text stays an
    /// error and is not sent to the provider.
    pub fn retry(&mut self) -> Option<Fetch<ConversionResult>> {
        let input = self.input.clone();
        self.set_input(input)
    }

    pub fn apply(&mut self, done: Completed<ConversionResult>) -> bool {
        self.slot.complete(done)
    }

    fn issue(&mut self, amount: f64) -> Fetch<ConversionResult> {
        let id = self.slot.begin();
        let provider = Arc::clone(&self.provider);

        Fetch::new(id, async move { provider.convert(amount).await })
    }
}
