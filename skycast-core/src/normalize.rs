//! Conversion of raw OpenWeather payloads into a [`WeatherView`].

use chrono::{DateTime, Local, TimeZone};
use serde::Deserialize;

use crate::{
    error::WeatherError,
    model::{Condition, CurrentConditions, ForecastDay, WeatherView},
};

/// The forecast endpoint reports one entry every 3 hours; 8 entries span a day.
pub const ENTRIES_PER_DAY: usize = 8;

pub const FORECAST_DAYS: usize = 5;

const MPS_TO_KMH: f64 = 3.6;

#[derive(Debug, Clone, Deserialize)]
pub struct RawMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawWeather {
    pub main: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawWind {
    pub speed: f64,
}

/// Body of `GET /weather`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCurrent {
    #[serde(default)]
    pub name: Option<String>,
    pub main: RawMain,
    pub weather: Vec<RawWeather>,
    pub wind: RawWind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawForecastMain {
    pub temp: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawForecastEntry {
    pub dt: i64,
    pub main: RawForecastMain,
    pub weather: Vec<RawWeather>,
}

/// Body of `GET /forecast`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawForecast {
    pub list: Vec<RawForecastEntry>,
}

/// Normalize both payloads, labelling forecast days in the local time zone.
pub fn normalize(current: &RawCurrent, forecast: &RawForecast) -> Result<WeatherView, WeatherError> {
    normalize_in(current, forecast, &Local)
}

pub fn normalize_in<Tz: TimeZone>(
    current: &RawCurrent,
    forecast: &RawForecast,
    tz: &Tz,
) -> Result<WeatherView, WeatherError>
where
    Tz::Offset: std::fmt::Display,
{
    let location = current.name.clone().filter(|n| !n.trim().is_empty());
    let current = normalize_current(current)?;

    let forecast = forecast
        .list
        .iter()
        .step_by(ENTRIES_PER_DAY)
        .take(FORECAST_DAYS)
        .map(|entry| normalize_forecast_entry(entry, tz))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WeatherView {
        location,
        current,
        forecast,
    })
}

fn normalize_current(raw: &RawCurrent) -> Result<CurrentConditions, WeatherError> {
    let weather = raw.weather.first().ok_or(WeatherError::MissingField("weather"))?;

    Ok(CurrentConditions {
        temperature_c: round_half_up(raw.main.temp),
        condition: Condition::from(weather.main.as_str()),
        description: weather.description.clone(),
        humidity_pct: raw.main.humidity,
        wind_speed_kmh: round_half_up(raw.wind.speed * MPS_TO_KMH),
        feels_like_c: round_half_up(raw.main.feels_like),
    })
}

fn normalize_forecast_entry<Tz: TimeZone>(
    entry: &RawForecastEntry,
    tz: &Tz,
) -> Result<ForecastDay, WeatherError>
where
    Tz::Offset: std::fmt::Display,
{
    let weather = entry.weather.first().ok_or(WeatherError::MissingField("weather"))?;

    Ok(ForecastDay {
        day: weekday_label(entry.dt, tz)?,
        temperature_c: round_half_up(entry.main.temp),
        condition: Condition::from(weather.main.as_str()),
    })
}

fn weekday_label<Tz: TimeZone>(ts: i64, tz: &Tz) -> Result<String, WeatherError>
where
    Tz::Offset: std::fmt::Display,
{
    let utc = DateTime::from_timestamp(ts, 0).ok_or(WeatherError::InvalidTimestamp(ts))?;
    Ok(utc.with_timezone(tz).format("%a").to_string())
}

/// Nearest integer, with halves going toward positive infinity
/// (2.5 -> 3, -2.5 -> -2). Out-of-range values saturate.
pub fn round_half_up(value: f64) -> i32 {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use serde_json::json;

    // 2024-01-15 00:00:00 UTC, a Monday.
    const MONDAY: i64 = 1_705_276_800;
    const THREE_HOURS: i64 = 3 * 3600;

    fn current_json() -> serde_json::Value {
        json!({
            "name": "London",
            "main": { "temp": 11.6, "feels_like": 10.4, "humidity": 81, "pressure": 1012 },
            "weather": [
                { "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" },
                { "id": 701, "main": "Mist", "description": "mist", "icon": "50d" }
            ],
            "wind": { "speed": 10.0, "deg": 240 }
        })
    }

    fn forecast_json(entries: usize) -> serde_json::Value {
        let list: Vec<_> = (0..entries)
            .map(|i| {
                let main = if i % 2 == 0 { "Clouds" } else { "Clear" };
                json!({
                    "dt": MONDAY + i as i64 * THREE_HOURS,
                    "main": { "temp": i as f64 + 0.4, "feels_like": 0.0, "humidity": 50 },
                    "weather": [{ "main": main, "description": "x" }],
                })
            })
            .collect();
        json!({ "cod": "200", "cnt": entries, "list": list })
    }

    fn raw(entries: usize) -> (RawCurrent, RawForecast) {
        (
            serde_json::from_value(current_json()).unwrap(),
            serde_json::from_value(forecast_json(entries)).unwrap(),
        )
    }

    #[test]
    fn current_conditions_are_rounded_and_converted() {
        let (current, forecast) = raw(40);
        let view = normalize_in(&current, &forecast, &Utc).unwrap();

        assert_eq!(view.current.temperature_c, 12);
        assert_eq!(view.current.feels_like_c, 10);
        assert_eq!(view.current.humidity_pct, 81);
        assert_eq!(view.current.wind_speed_kmh, 36);
        assert_eq!(view.current.condition, Condition::Rain);
        assert_eq!(view.current.description, "light rain");
        assert_eq!(view.location.as_deref(), Some("London"));
    }

    #[test]
    fn blank_or_absent_city_name_gives_no_location() {
        let (mut current, forecast) = raw(8);
        current.name = Some("  ".into());
        assert_eq!(normalize_in(&current, &forecast, &Utc).unwrap().location, None);

        current.name = None;
        assert_eq!(normalize_in(&current, &forecast, &Utc).unwrap().location, None);
    }

    #[test]
    fn forecast_samples_every_eighth_entry() {
        let (current, forecast) = raw(40);
        let view = normalize_in(&current, &forecast, &Utc).unwrap();

        // Entry i carries temp i + 0.4, so the rounded temps reveal the indices.
        let temps: Vec<i32> = view.forecast.iter().map(|d| d.temperature_c).collect();
        assert_eq!(temps, vec![0, 8, 16, 24, 32]);

        let days: Vec<&str> = view.forecast.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(days, vec!["Mon", "Tue", "Wed", "Thu", "Fri"]);
    }

    #[test]
    fn forecast_length_is_bounded_by_source() {
        for (entries, expected) in [(0, 0), (1, 1), (8, 1), (9, 2), (33, 5), (40, 5), (48, 5)] {
            let (current, forecast) = raw(entries);
            let view = normalize_in(&current, &forecast, &Utc).unwrap();
            assert_eq!(view.forecast.len(), expected, "entries = {entries}");
        }
    }

    #[test]
    fn weekday_label_uses_given_time_zone() {
        let (current, forecast) = raw(1);
        // Monday 00:00 UTC is still Sunday evening at UTC-5.
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let view = normalize_in(&current, &forecast, &tz).unwrap();
        assert_eq!(view.forecast[0].day, "Sun");
    }

    #[test]
    fn empty_weather_list_is_an_error() {
        let (mut current, forecast) = raw(8);
        current.weather.clear();
        let err = normalize_in(&current, &forecast, &Utc).unwrap_err();
        assert!(matches!(err, WeatherError::MissingField("weather")));

        let (current, mut forecast) = raw(8);
        forecast.list[0].weather.clear();
        let err = normalize_in(&current, &forecast, &Utc).unwrap_err();
        assert!(matches!(err, WeatherError::MissingField("weather")));
    }

    #[test]
    fn missing_required_field_fails_to_deserialize() {
        let mut body = current_json();
        body["main"].as_object_mut().unwrap().remove("temp");
        assert!(serde_json::from_value::<RawCurrent>(body).is_err());

        assert!(serde_json::from_value::<RawForecast>(json!({ "cnt": 0 })).is_err());
    }

    #[test]
    fn normalize_is_idempotent() {
        let (current, forecast) = raw(40);
        let a = normalize(&current, &forecast).unwrap();
        let b = normalize(&current, &forecast).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rounding_goes_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.51), -3);
        assert_eq!(round_half_up(0.49), 0);
        assert_eq!(round_half_up(-0.4), 0);
        assert_eq!(round_half_up(f64::MAX), i32::MAX);
        assert_eq!(round_half_up(10.0 * MPS_TO_KMH), 36);
    }
}
