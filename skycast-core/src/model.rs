use serde::{Deserialize, Serialize};

/// Coarse weather classification as reported by the provider
/// (the `weather[0].main` field).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Smoke,
    Haze,
    Dust,
    Fog,
    Other(String),
}

impl Condition {
    pub fn as_str(&self) -> &str {
        match self {
            Condition::Clear => "Clear",
            Condition::Clouds => "Clouds",
            Condition::Rain => "Rain",
            Condition::Drizzle => "Drizzle",
            Condition::Thunderstorm => "Thunderstorm",
            Condition::Snow => "Snow",
            Condition::Mist => "Mist",
            Condition::Smoke => "Smoke",
            Condition::Haze => "Haze",
            Condition::Dust => "Dust",
            Condition::Fog => "Fog",
            Condition::Other(s) => s,
        }
    }

    /// Mist, smoke, haze, dust and fog share one visual treatment.
    pub fn is_atmospheric(&self) -> bool {
        matches!(
            self,
            Condition::Mist | Condition::Smoke | Condition::Haze | Condition::Dust | Condition::Fog
        )
    }
}

impl From<&str> for Condition {
    fn from(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "clear" => Condition::Clear,
            "clouds" => Condition::Clouds,
            "rain" => Condition::Rain,
            "drizzle" => Condition::Drizzle,
            "thunderstorm" => Condition::Thunderstorm,
            "snow" => Condition::Snow,
            "mist" => Condition::Mist,
            "smoke" => Condition::Smoke,
            "haze" => Condition::Haze,
            "dust" => Condition::Dust,
            "fog" => Condition::Fog,
            _ => Condition::Other(value.to_string()),
        }
    }
}

impl From<String> for Condition {
    fn from(value: String) -> Self {
        Condition::from(value.as_str())
    }
}

impl From<Condition> for String {
    fn from(value: Condition) -> Self {
        match value {
            Condition::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: i32,
    pub condition: Condition,
    pub description: String,
    pub humidity_pct: u8,
    pub wind_speed_kmh: i32,
    pub feels_like_c: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Abbreviated weekday, e.g. "Mon".
    pub day: String,
    pub temperature_c: i32,
    pub condition: Condition,
}

/// UI-ready aggregate produced by one successful search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherView {
    /// City name as resolved by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub current: CurrentConditions,
    /// At most five entries, in chronological order.
    pub forecast: Vec<ForecastDay>,
}
