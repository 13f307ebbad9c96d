use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::{
    error::{Endpoint, WeatherError},
    model::WeatherView,
    normalize::{RawCurrent, RawForecast, normalize},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

const UNITS: &str = "metric";

#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

// The key stays out of logs and debug output.
impl std::fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn fetch_current(&self, city: &str) -> Result<RawCurrent, WeatherError> {
        self.fetch_json("weather", Endpoint::Current, city).await
    }

    async fn fetch_forecast(&self, city: &str) -> Result<RawForecast, WeatherError> {
        self.fetch_json("forecast", Endpoint::Forecast, city).await
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        endpoint: Endpoint,
        city: &str,
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%endpoint, %url, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("units", UNITS), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| request_error(endpoint, e))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| request_error(endpoint, e))?;

        if !status.is_success() {
            return Err(WeatherError::Status {
                endpoint,
                status,
                body: truncate_body(&body),
            });
        }

        debug!(%endpoint, %status, bytes = body.len(), "OpenWeather responded");

        serde_json::from_str(&body).map_err(|source| WeatherError::Parse { endpoint, source })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self))]
    async fn get_weather(&self, city: &str) -> Result<WeatherView, WeatherError> {
        // Either failure aborts the search; no partial view is built.
        let (current, forecast) =
            tokio::try_join!(self.fetch_current(city), self.fetch_forecast(city))?;

        normalize(&current, &forecast)
    }
}

// Request URLs carry the API key in their query string.
fn request_error(endpoint: Endpoint, err: reqwest::Error) -> WeatherError {
    WeatherError::Request { endpoint, source: err.without_url() }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
