use reqwest::StatusCode;
use thiserror::Error;

/// Which of the two provider endpoints a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Current,
    Forecast,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Current => "current weather",
            Endpoint::Forecast => "5-day forecast",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while fetching or normalizing provider data.
///
/// These never reach the user directly: the search controller collapses
/// every variant into one generic message.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Failed to send request to OpenWeather ({endpoint}): {source}")]
    Request {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("OpenWeather {endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: Endpoint,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to parse OpenWeather {endpoint} JSON: {source}")]
    Parse {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },

    #[error("Missing expected field in response: {0}")]
    MissingField(&'static str),

    #[error("Timestamp {0} is out of range")]
    InvalidTimestamp(i64),
}
