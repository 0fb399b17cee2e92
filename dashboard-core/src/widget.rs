//! Request state shared by the dashboard widgets.
//!
//! A widget issues a request by calling [`RequestSlot::begin`], which moves
//! it to `Loading` and hands out a fresh [`RequestId`]. The provider call is
//! wrapped in a [`Fetch`], a `'static` future the caller may await inline or
//! spawn. Its [`Completed`] output is fed back through the widget's `apply`,
//! and only the most recently issued request is allowed to change state.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tracing::debug;

use crate::error::DashboardError;

pub mod currency;
pub mod quote;
pub mod weather;

pub use currency::CurrencyWidget;
pub use quote::QuoteWidget;
pub use weather::WeatherWidget;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> RequestState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            RequestState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Monotonic per-widget request tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

/// Provider outcome tagged with the request that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Completed<T> {
    pub id: RequestId,
    pub outcome: Result<T, String>,
}

type BoxedOutcome<T> = Pin<Box<dyn Future<Output = Result<T, String>> + Send + 'static>>;

/// An in-flight provider call. Resolves to [`Completed`].
#[must_use = "a Fetch does nothing unless awaited and applied to its widget"]
pub struct Fetch<T> {
    id: RequestId,
    future: BoxedOutcome<T>,
}

impl<T: 'static> Fetch<T> {
    pub(crate) fn new<F>(id: RequestId, future: F) -> Self
    where
        F: Future<Output = Result<T, DashboardError>> + Send + 'static,
    {
        Self {
            id,
            future: Box::pin(async move { future.await.map_err(|e| e.to_string()) }),
        }
    }

    /// Fetch for a provider that cannot fail.
    pub(crate) fn infallible<F>(id: RequestId, future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            id,
            future: Box::pin(async move { Ok(future.await) }),
        }
    }
}

impl<T> Fetch<T> {
    pub fn id(&self) -> RequestId {
        self.id
    }
}

impl<T> std::fmt::Debug for Fetch<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetch").field("id", &self.id).finish_non_exhaustive()
    }
}

impl<T> Future for Fetch<T> {
    type Output = Completed<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let id = this.id;
        this.future
            .as_mut()
            .poll(cx)
            .map(|outcome| Completed { id, outcome })
    }
}

/// State plus the id of the latest issued request.
///
/// While a refresh is loading, the previous successful value stays
/// available through [`RequestSlot::displayed`] until the new outcome lands.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSlot<T> {
    state: RequestState<T>,
    previous: Option<T>,
    next_id: u64,
    latest: Option<RequestId>,
}

impl<T> Default for RequestSlot<T> {
    fn default() -> Self {
        Self {
            state: RequestState::Idle,
            previous: None,
            next_id: 0,
            latest: None,
        }
    }
}

impl<T> RequestSlot<T> {
    pub fn state(&self) -> &RequestState<T> {
        &self.state
    }

    pub fn latest(&self) -> Option<RequestId> {
        self.latest
    }

    /// Value to show: the current result, or the last one while reloading.
    pub fn displayed(&self) -> Option<&T> {
        match &self.state {
            RequestState::Success(data) => Some(data),
            RequestState::Loading => self.previous.as_ref(),
            _ => None,
        }
    }

    /// Clears any error, enters `Loading` and supersedes older requests.
    pub fn begin(&mut self) -> RequestId {
        let id = RequestId(self.next_id);
        self.next_id += 1;
        self.latest = Some(id);
        if let RequestState::Success(data) =
            std::mem::replace(&mut self.state, RequestState::Loading)
        {
            self.previous = Some(data);
        }
        id
    }

    /// Applies a completion if it belongs to the latest request.
    /// Returns `false` when the completion was stale and ignored.
    pub fn complete(&mut self, done: Completed<T>) -> bool {
        if self.latest != Some(done.id) {
            debug!(id = ?done.id, latest = ?self.latest, "discarding stale response");
            return false;
        }

        self.previous = None;
        self.state = match done.outcome {
            Ok(data) => RequestState::Success(data),
            Err(message) => RequestState::Error(message),
        };
        true
    }

    /// Sets an error without issuing a request. Supersedes anything in flight.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.supersede();
        self.previous = None;
        self.state = RequestState::Error(message.into());
    }

    /// Back to `Idle`. Supersedes anything in flight.
    pub fn reset(&mut self) {
        self.supersede();
        self.previous = None;
        self.state = RequestState::Idle;
    }

    fn supersede(&mut self) {
        if self.latest.is_some() {
            self.latest = Some(RequestId(self.next_id));
            self.next_id += 1;
        }
    }
}
