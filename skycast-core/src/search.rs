//! Search orchestration and the display state it drives.
//!
//! [`SearchController::fetch`] is the side-effect-free part: it turns a city
//! into a [`SearchOutcome`]. [`SearchState`] owns loading/error/result and
//! decides which outcome wins when searches overlap.

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{model::WeatherView, provider::WeatherProvider};

/// The only failure text a user ever sees.
pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch weather data. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Blank input; nothing was requested.
    Skipped,
    Success(WeatherView),
    Failure(String),
}

/// Identifies one started search; only the latest ticket may update state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub loading: bool,
    pub error: Option<String>,
    pub view: Option<WeatherView>,
    generation: u64,
}

impl SearchState {
    pub fn begin(&mut self) -> SearchTicket {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        SearchTicket(self.generation)
    }

    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Record the outcome of `ticket`'s search. Returns `false` when a newer
    /// search has started since, in which case the state is left untouched.
    pub fn apply(&mut self, ticket: SearchTicket, outcome: &SearchOutcome) -> bool {
        if !self.is_current(ticket) {
            return false;
        }

        match outcome {
            SearchOutcome::Skipped => {}
            SearchOutcome::Success(view) => {
                self.view = Some(view.clone());
                self.error = None;
            }
            // Previous view stays visible alongside the error.
            SearchOutcome::Failure(message) => {
                self.error = Some(message.clone());
            }
        }

        self.loading = false;
        true
    }
}

#[derive(Debug)]
pub struct SearchController {
    provider: Box<dyn WeatherProvider>,
    state: Mutex<SearchState>,
}

impl SearchController {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self {
            provider,
            state: Mutex::new(SearchState::default()),
        }
    }

    /// Run a search and fold its outcome into the controller's state.
    pub async fn search(&self, city: &str) -> SearchOutcome {
        let city = city.trim();
        if city.is_empty() {
            return SearchOutcome::Skipped;
        }

        let ticket = self.state.lock().await.begin();
        let outcome = self.fetch(city).await;

        if !self.state.lock().await.apply(ticket, &outcome) {
            info!(city, "discarding result of superseded search");
        }

        outcome
    }

    /// Fetch and normalize without touching state.
    pub async fn fetch(&self, city: &str) -> SearchOutcome {
        let city = city.trim();
        if city.is_empty() {
            return SearchOutcome::Skipped;
        }

        info!(city, "searching");
        match self.provider.get_weather(city).await {
            Ok(view) => {
                info!(city, days = view.forecast.len(), "search succeeded");
                SearchOutcome::Success(view)
            }
            Err(err) => {
                warn!(city, error = %err, "error fetching weather data");
                SearchOutcome::Failure(FETCH_ERROR_MESSAGE.to_string())
            }
        }
    }

    pub async fn state(&self) -> SearchState {
        self.state.lock().await.clone()
    }
}
