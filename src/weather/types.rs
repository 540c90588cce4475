//! Normalized weather result types
//!
//! These are the shapes handed to callers after flattening the upstream
//! API's nested payloads.

use serde::{Deserialize, Serialize};

/// Current conditions for a city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Resolved city name
    pub city: String,
    /// ISO country code
    pub country: String,
    /// Temperature in the requested units
    pub temperature: f64,
    /// Perceived temperature
    pub feels_like: f64,
    /// Relative humidity percentage
    pub humidity: f64,
    /// Atmospheric pressure in hPa
    pub pressure: f64,
    /// Short text description (e.g. "clear sky")
    pub description: String,
    /// Wind speed in the requested units
    pub wind_speed: f64,
    /// Wind direction in degrees
    pub wind_direction: f64,
    /// Visibility in kilometers
    pub visibility_km: f64,
    /// Units the measurements are expressed in
    pub units: String,
}

/// One 3-hourly forecast entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Forecast timestamp as reported upstream
    pub datetime: String,
    /// Forecast temperature
    pub temperature: f64,
    /// Perceived temperature
    pub feels_like: f64,
    /// Relative humidity percentage
    pub humidity: f64,
    /// Short text description
    pub description: String,
    /// Wind speed
    pub wind_speed: f64,
    /// Combined rain and snow volume for the 3-hour slot, in mm
    pub precipitation: f64,
}

/// Multi-day forecast for a city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    /// Resolved city name
    pub city: String,
    /// ISO country code
    pub country: String,
    /// 3-hourly entries, oldest first
    pub entries: Vec<ForecastEntry>,
    /// Units the measurements are expressed in
    pub units: String,
}

/// One city search match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityMatch {
    /// City name
    pub name: String,
    /// ISO country code
    pub country: String,
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lon: f64,
    /// Population, when the upstream reports one
    pub population: u64,
}

/// Result of a city name search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySearch {
    /// The query that was searched
    pub query: String,
    /// Matching cities
    pub cities: Vec<CityMatch>,
    /// Number of matches returned
    pub count: usize,
}
