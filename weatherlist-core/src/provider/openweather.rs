use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{error::LookupError, model::CityWeather, provider::truncate_body};

use super::WeatherLookup;

const PROVIDER: &str = "openweather";
const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the provider at another host, e.g. a mock server.
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key, base_url, http: Client::new() }
    }

    async fn fetch_current(&self, city: &str) -> Result<CityWeather, LookupError> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        tracing::debug!(%url, city, "requesting OpenWeather current weather");

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .map_err(|source| LookupError::Transport { provider: PROVIDER, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| LookupError::Transport { provider: PROVIDER, source })?;

        if !status.is_success() {
            return Err(LookupError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|source| LookupError::Parse { provider: PROVIDER, source })?;

        Ok(CityWeather { name: parsed.name, temperature_c: parsed.main.temp })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
}

#[async_trait]
impl WeatherLookup for OpenWeatherProvider {
    async fn lookup(&self, city: &str) -> Result<CityWeather, LookupError> {
        self.fetch_current(city).await
    }
}
