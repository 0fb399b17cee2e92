use std::sync::Arc;

use crate::{model::WeatherResult, provider::WeatherProvider};

use super::{Completed, Fetch, RequestSlot, RequestState};

/// City search box plus the latest lookup.
#[derive(Debug)]
pub struct WeatherWidget {
    provider: Arc<dyn WeatherProvider>,
    city: String,
    last_query: Option<String>,
    slot: RequestSlot<WeatherResult>,
}

impl WeatherWidget {
    pub fn new(provider: Arc<dyn WeatherProvider>, default_city: impl Into<String>) -> Self {
        Self {
            provider,
            city: default_city.into(),
            last_query: None,
            slot: RequestSlot::default(),
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// Edits the search text. Does not issue a request.
    pub fn set_city(&mut self, city: impl Into<String>) {
        self.city = city.into();
    }

    pub fn state(&self) -> &RequestState<WeatherResult> {
        self.slot.state()
    }

    pub fn displayed(&self) -> Option<&WeatherResult> {
        self.slot.displayed()
    }

    /// The widget looks up its initial city as soon as it is shown.
    pub fn mount(&mut self) -> Fetch<WeatherResult> {
        self.search()
    }

    /// Looks up the current search text.
    pub fn search(&mut self) -> Fetch<WeatherResult> {
        let query = self.city.clone();
        self.issue(query)
    }

    /// Repeats the last lookup, even if the search text changed since.
    pub fn retry(&mut self) -> Fetch<WeatherResult> {
        let query = self.last_query.clone().unwrap_or_else(|| self.city.clone());
        self.issue(query)
    }

    pub fn apply(&mut self, done: Completed<WeatherResult>) -> bool {
        self.slot.complete(done)
    }

    fn issue(&mut self, query: String) -> Fetch<WeatherResult> {
        self.last_query = Some(query.clone());
        let id = self.slot.begin();
        let provider = Arc::clone(&self.provider);

        Fetch::new(id, async move { provider.get_weather(&query).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::Condition, provider::weather::SimulatedWeatherProvider};

    fn widget(failure_rate: f64) -> WeatherWidget {
        let provider = SimulatedWeatherProvider::new().with_failure_rate(failure_rate);
        WeatherWidget::new(Arc::new(provider), "London, UK")
    }

    #[tokio::test(start_paused = true)]
    async fn mount_looks_up_default_city() {
        let mut w = widget(0.0);
        assert_eq!(w.state(), &RequestState::Idle);

        let fetch = w.mount();
        assert!(w.state().is_loading());

        assert!(w.apply(fetch.await));
        let result = w.state().data().expect("success");
        assert_eq!(result.city, "London, UK");
        assert!(Condition::all().contains(&result.condition));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_shows_city_and_retry_reissues_same_request() {
        let mut w = widget(1.0);

        let fetch = w.mount();
        w.apply(fetch.await);
        let message = w.state().error().expect("error state").to_string();
        assert!(message.contains("London, UK"));

        w.set_city("Paris");
        let fetch = w.retry();
        assert!(w.state().is_loading());
        assert_eq!(w.state().error(), None);

        w.apply(fetch.await);
        assert!(w.state().error().expect("still failing").contains("London, UK"));
    }

    #[tokio::test(start_paused = true)]
    async fn search_uses_current_text() {
        let mut w = widget(0.0);
        w.set_city("Tokyo, JP");

        let fetch = w.search();
        w.apply(fetch.await);

        assert_eq!(w.state().data().expect("success").city, "Tokyo, JP");
    }

    #[tokio::test(start_paused = true)]
    async fn previous_result_stays_visible_while_loading() {
        let mut w = widget(0.0);
        let fetch = w.mount();
        w.apply(fetch.await);
        let first = w.state().data().cloned().expect("success");

        w.set_city("Oslo");
        let fetch = w.search();
        assert_eq!(w.displayed(), Some(&first));

        w.apply(fetch.await);
        assert_eq!(w.displayed().expect("new result").city, "Oslo");
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_lookup_is_ignored() {
        let mut w = widget(0.0);
        w.set_city("First");
        let first = w.search();
        w.set_city("Second");
        let second = w.search();

        let (first_done, second_done) = tokio::join!(first, second);
        assert!(w.apply(second_done));
        assert!(!w.apply(first_done));

        assert_eq!(w.state().data().expect("success").city, "Second");
    }
}
