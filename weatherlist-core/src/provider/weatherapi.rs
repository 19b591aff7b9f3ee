use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{error::LookupError, model::CityWeather, provider::truncate_body};

use super::WeatherLookup;

const PROVIDER: &str = "weatherapi";
const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com";

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key, base_url, http: Client::new() }
    }

    async fn fetch_current(&self, city: &str) -> Result<CityWeather, LookupError> {
        let url = format!("{}/v1/current.json", self.base_url);
        tracing::debug!(%url, city, "requesting WeatherAPI current weather");

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", city)])
            .send()
            .await
            .map_err(|source| LookupError::Transport { provider: PROVIDER, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| LookupError::Transport { provider: PROVIDER, source })?;

        // WeatherAPI answers an unknown location with 400 and error code 1006.
        if !status.is_success() {
            return Err(LookupError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: WaResponse = serde_json::from_str(&body)
            .map_err(|source| LookupError::Parse { provider: PROVIDER, source })?;

        Ok(CityWeather { name: parsed.location.name, temperature_c: parsed.current.temp_c })
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

#[async_trait]
impl WeatherLookup for WeatherApiProvider {
    async fn lookup(&self, city: &str) -> Result<CityWeather, LookupError> {
        self.fetch_current(city).await
    }
}
