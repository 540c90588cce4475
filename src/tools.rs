//! Tool-result boundary
//!
//! Every operation exposed to a tool host returns a structured JSON envelope
//! and never lets an error escape: failures become
//! `{"status": "error", "message", "timestamp"}` results instead of faults.

use crate::weather::WeatherService;
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

/// Default measurement units for weather queries
pub const DEFAULT_UNITS: &str = "metric";

/// Maximum forecast horizon in days
pub const MAX_FORECAST_DAYS: u32 = 5;

/// Maximum number of city search matches
pub const MAX_SEARCH_LIMIT: u32 = 10;

/// Build a success envelope around serialized data
fn success_result<T: Serialize>(data: &T) -> Value {
    match serde_json::to_value(data) {
        Ok(value) => json!({
            "status": "success",
            "data": value,
            "timestamp": Utc::now().to_rfc3339(),
        }),
        Err(e) => error_result(format!("Failed to serialize result: {e}")),
    }
}

/// Build an error envelope
pub fn error_result(message: impl Into<String>) -> Value {
    json!({
        "status": "error",
        "message": message.into(),
        "timestamp": Utc::now().to_rfc3339(),
    })
}

/// Get current weather conditions for a city
pub async fn current_weather(service: &WeatherService, city: &str, units: &str) -> Value {
    if city.trim().is_empty() {
        return error_result("City name is required");
    }

    match service.current_weather(city, units).await {
        Ok(weather) => success_result(&weather),
        Err(e) => error_result(format!("Failed to get weather for {city}: {e}")),
    }
}

/// Get a multi-day forecast for a city
pub async fn forecast(service: &WeatherService, city: &str, days: u32, units: &str) -> Value {
    if city.trim().is_empty() {
        return error_result("City name is required");
    }
    if days < 1 || days > MAX_FORECAST_DAYS {
        return error_result(format!("Days must be between 1 and {MAX_FORECAST_DAYS}"));
    }

    match service.forecast(city, days, units).await {
        Ok(report) => success_result(&report),
        Err(e) => error_result(format!("Failed to get forecast for {city}: {e}")),
    }
}

/// Search for cities by name
pub async fn search_cities(service: &WeatherService, query: &str, limit: u32) -> Value {
    if query.trim().is_empty() {
        return error_result("Search query is required");
    }
    if limit < 1 || limit > MAX_SEARCH_LIMIT {
        return error_result(format!("Limit must be between 1 and {MAX_SEARCH_LIMIT}"));
    }

    match service.search_cities(query, limit).await {
        Ok(result) => success_result(&result),
        Err(e) => error_result(format!("Failed to search cities: {e}")),
    }
}

/// Combined API status: auth diagnostics, connectivity probe, health check
pub async fn api_status(service: &WeatherService) -> Value {
    let client = service.client();
    let auth = client.auth();

    let auth_info = auth.describe().await;
    let auth_valid = auth.validate().await;
    let api_healthy = client.health_check().await;
    let client_info = client.api_info().await;

    let status = if auth_valid && api_healthy {
        "healthy"
    } else {
        "degraded"
    };

    json!({
        "status": "success",
        "api_status": status,
        "authentication": {
            "type": auth_info["auth_type"],
            "valid": auth_valid,
            "details": auth_info,
        },
        "connectivity": {
            "api_accessible": api_healthy,
            "base_url": client_info["base_url"],
            "timeout_secs": client_info["timeout_secs"],
        },
        "timestamp": Utc::now().to_rfc3339(),
    })
}
