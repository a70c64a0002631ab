//! HTTP handlers for the forecast proxy endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::{Coordinates, PrecipitationUnit, TemperatureUnit, Units, WindSpeedUnit};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::external::open_meteo::{
    CurrentWeatherResponse, DailyWeatherResponse, HourlyWeatherResponse, DEFAULT_DAILY_DAYS,
    DEFAULT_HOURLY_DAYS,
};
use crate::AppState;

/// Location and unit parameters shared by the weather endpoints
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WeatherQuery {
    #[validate(
        required(message = "Missing lat or lon"),
        range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90")
    )]
    pub lat: Option<f64>,
    #[validate(
        required(message = "Missing lat or lon"),
        range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180")
    )]
    pub lon: Option<f64>,
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,
    #[serde(default)]
    pub wind_speed_unit: WindSpeedUnit,
    #[serde(default)]
    pub precipitation_unit: PrecipitationUnit,
    #[validate(range(min = 1, max = 16, message = "forecastDays must be between 1 and 16"))]
    pub forecast_days: Option<u8>,
}

impl WeatherQuery {
    fn coordinates(&self) -> AppResult<Coordinates> {
        self.validate()?;
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
            _ => Err(AppError::validation("lat", "Missing lat or lon")),
        }
    }

    fn units(&self) -> Units {
        Units {
            temperature: self.temperature_unit,
            wind_speed: self.wind_speed_unit,
            precipitation: self.precipitation_unit,
        }
    }
}

/// Current conditions at a location
pub async fn get_current_weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> AppResult<Json<CurrentWeatherResponse>> {
    let coords = query.coordinates()?;
    let weather = state.weather.get_current(coords, query.units()).await?;
    Ok(Json(weather))
}

/// Hourly forecast at a location.
///
/// Celsius responses also refresh the forecast cache used for predictions.
pub async fn get_hourly_weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> AppResult<Json<HourlyWeatherResponse>> {
    let coords = query.coordinates()?;
    let units = query.units();
    let days = query.forecast_days.unwrap_or(DEFAULT_HOURLY_DAYS);

    let weather = state.weather.get_hourly(coords, units, days).await?;
    if units.is_metric_temperature() {
        state.forecasts.remember(coords, weather.hourly.samples());
    }
    Ok(Json(weather))
}

/// Daily forecast at a location
pub async fn get_daily_weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> AppResult<Json<DailyWeatherResponse>> {
    let coords = query.coordinates()?;
    let days = query.forecast_days.unwrap_or(DEFAULT_DAILY_DAYS);
    let weather = state.weather.get_daily(coords, query.units(), days).await?;
    Ok(Json(weather))
}
