use serde::{Deserialize, Serialize};

/// One city's weather record in the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherEntry {
    pub id: u64,
    pub city: String,
    /// Degrees Celsius.
    pub temperature: f64,
}

impl WeatherEntry {
    /// Case-insensitive match against a city name, ignoring surrounding whitespace.
    pub fn matches_city(&self, city: &str) -> bool {
        self.city.trim().to_lowercase() == city.trim().to_lowercase()
    }
}

impl std::fmt::Display for WeatherEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}°C", self.city, self.temperature)
    }
}

/// Result of a single lookup: the provider's canonical city name and current temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityWeather {
    pub name: String,
    pub temperature_c: f64,
}
