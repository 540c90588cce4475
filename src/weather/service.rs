//! Weather service
//!
//! Typed pass-through operations against the upstream weather API:
//! current conditions, multi-day forecast, and city search. Each call is
//! issued through the resilient [`ApiClient`] and the nested upstream
//! payload is flattened into the normalized types.

use super::types::{CityMatch, CitySearch, CurrentWeather, ForecastEntry, ForecastReport};
use crate::error::Result;
use crate::http::{ApiClient, RequestOptions};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Forecast entries per day (one every 3 hours)
const ENTRIES_PER_DAY: u32 = 8;

/// Typed client for the upstream weather endpoints
pub struct WeatherService {
    client: Arc<ApiClient>,
    /// Upstream API key, sent as the `appid` query parameter
    api_key: String,
}

impl WeatherService {
    /// Create a service over an existing client
    pub fn new(client: Arc<ApiClient>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    /// The underlying API client
    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// Get current weather conditions for a city
    pub async fn current_weather(&self, city: &str, units: &str) -> Result<CurrentWeather> {
        debug!("getting current weather for {city}");

        let opts = RequestOptions::new()
            .query("q", city)
            .query("units", units)
            .query("appid", &self.api_key);

        let response = self.client.get("/weather", opts).await?;
        let payload: CurrentPayload = serde_json::from_value(response)?;
        Ok(payload.normalize(city, units))
    }

    /// Get a multi-day forecast for a city (3-hourly entries)
    pub async fn forecast(&self, city: &str, days: u32, units: &str) -> Result<ForecastReport> {
        debug!("getting {days}-day forecast for {city}");

        let count = days * ENTRIES_PER_DAY;
        let opts = RequestOptions::new()
            .query("q", city)
            .query("cnt", count.to_string())
            .query("units", units)
            .query("appid", &self.api_key);

        let response = self.client.get("/forecast", opts).await?;
        let payload: ForecastPayload = serde_json::from_value(response)?;
        Ok(payload.normalize(city, count as usize, units))
    }

    /// Search for cities by name
    pub async fn search_cities(&self, query: &str, limit: u32) -> Result<CitySearch> {
        debug!("searching cities matching '{query}'");

        let opts = RequestOptions::new()
            .query("q", query)
            .query("limit", limit.to_string())
            .query("appid", &self.api_key);

        let response = self.client.get("/find", opts).await?;
        let payload: SearchPayload = serde_json::from_value(response)?;
        Ok(payload.normalize(query))
    }
}

impl std::fmt::Debug for WeatherService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherService")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Upstream payload shapes (missing fields default)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct MainInfo {
    #[serde(default)]
    temp: f64,
    #[serde(default)]
    feels_like: f64,
    #[serde(default)]
    humidity: f64,
    #[serde(default)]
    pressure: f64,
}

#[derive(Debug, Default, Deserialize)]
struct ConditionInfo {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Default, Deserialize)]
struct WindInfo {
    #[serde(default)]
    speed: f64,
    #[serde(default)]
    deg: f64,
}

#[derive(Debug, Default, Deserialize)]
struct SysInfo {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Default, Deserialize)]
struct CurrentPayload {
    #[serde(default)]
    name: String,
    #[serde(default)]
    sys: SysInfo,
    #[serde(default)]
    main: MainInfo,
    #[serde(default)]
    weather: Vec<ConditionInfo>,
    #[serde(default)]
    wind: WindInfo,
    /// Visibility in meters
    #[serde(default)]
    visibility: f64,
}

impl CurrentPayload {
    fn normalize(self, requested_city: &str, units: &str) -> CurrentWeather {
        CurrentWeather {
            city: if self.name.is_empty() {
                requested_city.to_string()
            } else {
                self.name
            },
            country: self.sys.country,
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            humidity: self.main.humidity,
            pressure: self.main.pressure,
            description: self
                .weather
                .into_iter()
                .next()
                .map(|c| c.description)
                .unwrap_or_default(),
            wind_speed: self.wind.speed,
            wind_direction: self.wind.deg,
            visibility_km: self.visibility / 1000.0,
            units: units.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct VolumeInfo {
    #[serde(rename = "3h", default)]
    three_hours: f64,
}

#[derive(Debug, Default, Deserialize)]
struct ForecastItem {
    #[serde(default)]
    dt_txt: String,
    #[serde(default)]
    main: MainInfo,
    #[serde(default)]
    weather: Vec<ConditionInfo>,
    #[serde(default)]
    wind: WindInfo,
    #[serde(default)]
    rain: VolumeInfo,
    #[serde(default)]
    snow: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
struct CityInfo {
    #[serde(default)]
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Default, Deserialize)]
struct ForecastPayload {
    #[serde(default)]
    city: CityInfo,
    #[serde(default)]
    list: Vec<ForecastItem>,
}

impl ForecastPayload {
    fn normalize(self, requested_city: &str, max_entries: usize, units: &str) -> ForecastReport {
        let entries = self
            .list
            .into_iter()
            .take(max_entries)
            .map(|item| ForecastEntry {
                datetime: item.dt_txt,
                temperature: item.main.temp,
                feels_like: item.main.feels_like,
                humidity: item.main.humidity,
                description: item
                    .weather
                    .into_iter()
                    .next()
                    .map(|c| c.description)
                    .unwrap_or_default(),
                wind_speed: item.wind.speed,
                precipitation: item.rain.three_hours + item.snow.three_hours,
            })
            .collect();

        ForecastReport {
            city: if self.city.name.is_empty() {
                requested_city.to_string()
            } else {
                self.city.name
            },
            country: self.city.country,
            entries,
            units: units.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct CoordInfo {
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lon: f64,
}

#[derive(Debug, Default, Deserialize)]
struct SearchItem {
    #[serde(default)]
    name: String,
    #[serde(default)]
    sys: SysInfo,
    #[serde(default)]
    coord: CoordInfo,
    #[serde(default)]
    population: u64,
}

#[derive(Debug, Default, Deserialize)]
struct SearchPayload {
    #[serde(default)]
    list: Vec<SearchItem>,
}

impl SearchPayload {
    fn normalize(self, query: &str) -> CitySearch {
        let cities: Vec<CityMatch> = self
            .list
            .into_iter()
            .map(|item| CityMatch {
                name: item.name,
                country: item.sys.country,
                lat: item.coord.lat,
                lon: item.coord.lon,
                population: item.population,
            })
            .collect();

        CitySearch {
            query: query.to_string(),
            count: cities.len(),
            cities,
        }
    }
}
