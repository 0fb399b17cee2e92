use std::sync::Arc;

use crate::{model::Quote, provider::QuoteProvider};

use super::{Completed, Fetch, RequestSlot, RequestState};

/// Button-driven quote generator. Nothing is requested until asked.
#[derive(Debug)]
pub struct QuoteWidget {
    provider: Arc<dyn QuoteProvider>,
    slot: RequestSlot<Quote>,
}

impl QuoteWidget {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self {
            provider,
            slot: RequestSlot::default(),
        }
    }

    pub fn state(&self) -> &RequestState<Quote> {
        self.slot.state()
    }

    pub fn displayed(&self) -> Option<&Quote> {
        self.slot.displayed()
    }

    /// Quotes are only generated on request, so mounting issues nothing.
    pub fn mount(&mut self) -> Option<Fetch<Quote>> {
        None
    }

    pub fn generate(&mut self) -> Fetch<Quote> {
        let id = self.slot.begin();
        let provider = Arc::clone(&self.provider);

        Fetch::infallible(id, async move { provider.quote().await })
    }

    pub fn apply(&mut self, done: Completed<Quote>) -> bool {
        self.slot.complete(done)
    }
}
