//! Weather API operations
//!
//! Typed pass-through calls to the upstream weather endpoints (`/weather`,
//! `/forecast`, `/find`) with normalized result types.

mod service;
mod types;

pub use service::WeatherService;
pub use types::{CityMatch, CitySearch, CurrentWeather, ForecastEntry, ForecastReport};
