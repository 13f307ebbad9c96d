//! Core library for the `skycast` weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client and the normalizer that reshapes its JSON
//! - The search controller and the display state it drives
//!
//! It is used by `skycast-cli`, but can also back other front-ends.

pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod search;

pub use config::Config;
pub use error::{Endpoint, WeatherError};
pub use model::{Condition, CurrentConditions, ForecastDay, WeatherView};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use search::{FETCH_ERROR_MESSAGE, SearchController, SearchOutcome, SearchState};
