use std::fmt::Write;

use skycast_core::{Condition, SearchState, WeatherView};

pub fn icon(condition: &Condition) -> &'static str {
    match condition {
        Condition::Clear => "☀️",
        Condition::Clouds => "☁️",
        Condition::Rain => "🌧️",
        Condition::Snow => "❄️",
        Condition::Thunderstorm => "⛈️",
        Condition::Drizzle => "🌦️",
        c if c.is_atmospheric() => "🌫️",
        _ => "☀️",
    }
}

pub fn render_view(view: &WeatherView) -> String {
    let current = &view.current;
    let mut out = String::new();

    match &view.location {
        Some(location) => {
            let _ = writeln!(out, "Current Weather in {location}");
        }
        None => {
            let _ = writeln!(out, "Current Weather");
        }
    }
    let _ = writeln!(
        out,
        "  {} {}°C  {}",
        icon(&current.condition),
        current.temperature_c,
        current.description
    );
    let _ = writeln!(out, "  💧 Humidity    {}%", current.humidity_pct);
    let _ = writeln!(out, "  💨 Wind Speed  {} km/h", current.wind_speed_kmh);
    let _ = writeln!(out, "  🌡️ Feels Like  {}°C", current.feels_like_c);

    if !view.forecast.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "5-Day Forecast");
        for day in &view.forecast {
            let _ = writeln!(
                out,
                "  {:<4} {} {:>4}°C  {}",
                day.day,
                icon(&day.condition),
                day.temperature_c,
                day.condition
            );
        }
    }

    out
}

/// Error first, then whatever view is still on screen.
pub fn render_state(state: &SearchState) -> String {
    let mut out = String::new();

    if let Some(error) = &state.error {
        let _ = writeln!(out, "⚠ {error}");
    }
    if let Some(view) = &state.view {
        if state.error.is_some() {
            let _ = writeln!(out, "(showing previous result)");
        }
        out.push_str(&render_view(view));
    }

    out
}
