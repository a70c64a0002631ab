//! Forecast API client
//!
//! Integrates with the Open-Meteo forecast API for current conditions,
//! hourly series and daily summaries.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use shared::{aligned_len, truncate_unordered, Coordinates, HourlySample, Units};

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

const CURRENT_VARIABLES: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,\
precipitation,rain,showers,snowfall,weather_code,cloud_cover,pressure_msl,\
wind_speed_10m,wind_direction_10m,wind_gusts_10m";

const HOURLY_VARIABLES: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,\
precipitation_probability,precipitation,weather_code,wind_speed_10m,uv_index";

const DAILY_VARIABLES: &str = "weather_code,temperature_2m_max,temperature_2m_min,sunrise,sunset,\
precipitation_sum,precipitation_probability_max,wind_speed_10m_max,uv_index_max";

pub const DEFAULT_HOURLY_DAYS: u8 = 3;
pub const DEFAULT_DAILY_DAYS: u8 = 7;

/// Forecast API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
}

/// Location block shared by every forecast response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub utc_offset_seconds: i32,
    pub timezone: String,
    pub timezone_abbreviation: String,
}

/// Current weather conditions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    pub time: DateTime<Utc>,
    pub temperature_2m: f64,
    pub relative_humidity_2m: f64,
    pub apparent_temperature: f64,
    pub precipitation: f64,
    pub rain: f64,
    pub showers: f64,
    pub snowfall: f64,
    pub weather_code: i32,
    pub cloud_cover: f64,
    pub pressure_msl: f64,
    pub wind_speed_10m: f64,
    pub wind_direction_10m: f64,
    pub wind_gusts_10m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeatherResponse {
    #[serde(flatten)]
    pub location: ForecastLocation,
    pub current: CurrentWeather,
}

/// Hourly forecast, one column per variable, aligned by index
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HourlyWeather {
    pub time: Vec<DateTime<Utc>>,
    pub temperature_2m: Vec<f64>,
    pub relative_humidity_2m: Vec<f64>,
    pub apparent_temperature: Vec<f64>,
    pub precipitation_probability: Vec<f64>,
    pub precipitation: Vec<f64>,
    pub weather_code: Vec<i32>,
    pub wind_speed_10m: Vec<f64>,
    pub uv_index: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HourlyWeatherResponse {
    #[serde(flatten)]
    pub location: ForecastLocation,
    pub hourly: HourlyWeather,
}

/// Daily forecast summary, one column per variable
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyWeather {
    pub time: Vec<DateTime<Utc>>,
    pub weather_code: Vec<i32>,
    pub temperature_2m_max: Vec<f64>,
    pub temperature_2m_min: Vec<f64>,
    pub sunrise: Vec<DateTime<Utc>>,
    pub sunset: Vec<DateTime<Utc>>,
    pub precipitation_sum: Vec<f64>,
    pub precipitation_probability_max: Vec<f64>,
    pub wind_speed_10m_max: Vec<f64>,
    pub uv_index_max: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyWeatherResponse {
    #[serde(flatten)]
    pub location: ForecastLocation,
    pub daily: DailyWeather,
}

impl HourlyWeather {
    /// Rows usable by the transition detector.
    ///
    /// Only the columns the detector reads are aligned; the series is cut at
    /// the first timestamp that does not move forward.
    pub fn samples(&self) -> Vec<HourlySample> {
        let len = aligned_len(&[
            self.time.len(),
            self.temperature_2m.len(),
            self.weather_code.len(),
            self.precipitation.len(),
            self.precipitation_probability.len(),
        ]);

        let mut samples: Vec<HourlySample> = (0..len)
            .map(|i| HourlySample {
                time: self.time[i],
                temperature_c: self.temperature_2m[i],
                weather_code: self.weather_code[i],
                precipitation_mm: self.precipitation[i],
                precipitation_probability: self.precipitation_probability[i]
                    .clamp(0.0, 100.0)
                    .round() as u8,
            })
            .collect();

        truncate_unordered(&mut samples);
        samples
    }
}

// ============================================================================
// Open-Meteo wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct OmLocation {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    utc_offset_seconds: i32,
    #[serde(default)]
    timezone: String,
    #[serde(default)]
    timezone_abbreviation: String,
}

#[derive(Debug, Deserialize)]
struct OmCurrentResponse {
    #[serde(flatten)]
    location: OmLocation,
    current: OmCurrent,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    time: i64,
    temperature_2m: Option<f64>,
    relative_humidity_2m: Option<f64>,
    apparent_temperature: Option<f64>,
    precipitation: Option<f64>,
    rain: Option<f64>,
    showers: Option<f64>,
    snowfall: Option<f64>,
    weather_code: Option<f64>,
    cloud_cover: Option<f64>,
    pressure_msl: Option<f64>,
    wind_speed_10m: Option<f64>,
    wind_direction_10m: Option<f64>,
    wind_gusts_10m: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OmHourlyResponse {
    #[serde(flatten)]
    location: OmLocation,
    hourly: OmHourly,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OmHourly {
    time: Vec<i64>,
    temperature_2m: Vec<Option<f64>>,
    relative_humidity_2m: Vec<Option<f64>>,
    apparent_temperature: Vec<Option<f64>>,
    precipitation_probability: Vec<Option<f64>>,
    precipitation: Vec<Option<f64>>,
    weather_code: Vec<Option<f64>>,
    wind_speed_10m: Vec<Option<f64>>,
    uv_index: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmDailyResponse {
    #[serde(flatten)]
    location: OmLocation,
    daily: OmDaily,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OmDaily {
    time: Vec<i64>,
    weather_code: Vec<Option<f64>>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    sunrise: Vec<i64>,
    sunset: Vec<i64>,
    precipitation_sum: Vec<Option<f64>>,
    precipitation_probability_max: Vec<Option<f64>>,
    wind_speed_10m_max: Vec<Option<f64>>,
    uv_index_max: Vec<Option<f64>>,
}

impl WeatherClient {
    /// Create a new WeatherClient from configuration
    pub fn new(config: &WeatherConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Configuration(format!("Weather HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Create a new WeatherClient with custom base URL (for testing)
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch current conditions at a location
    pub async fn get_current(
        &self,
        coords: Coordinates,
        units: Units,
    ) -> AppResult<CurrentWeatherResponse> {
        let data: OmCurrentResponse = self
            .fetch(coords, units, &[("current", CURRENT_VARIABLES.to_string())])
            .await?;

        let current = data.current;
        Ok(CurrentWeatherResponse {
            location: data.location.into(),
            current: CurrentWeather {
                time: timestamp(current.time)?,
                temperature_2m: value(current.temperature_2m),
                relative_humidity_2m: value(current.relative_humidity_2m),
                apparent_temperature: value(current.apparent_temperature),
                precipitation: value(current.precipitation),
                rain: value(current.rain),
                showers: value(current.showers),
                snowfall: value(current.snowfall),
                weather_code: code(current.weather_code),
                cloud_cover: value(current.cloud_cover),
                pressure_msl: value(current.pressure_msl),
                wind_speed_10m: value(current.wind_speed_10m),
                wind_direction_10m: value(current.wind_direction_10m),
                wind_gusts_10m: value(current.wind_gusts_10m),
            },
        })
    }

    /// Fetch the hourly forecast for the next `forecast_days` days
    pub async fn get_hourly(
        &self,
        coords: Coordinates,
        units: Units,
        forecast_days: u8,
    ) -> AppResult<HourlyWeatherResponse> {
        let data: OmHourlyResponse = self
            .fetch(
                coords,
                units,
                &[
                    ("hourly", HOURLY_VARIABLES.to_string()),
                    ("forecast_days", forecast_days.to_string()),
                ],
            )
            .await?;

        let hourly = data.hourly;
        Ok(HourlyWeatherResponse {
            location: data.location.into(),
            hourly: HourlyWeather {
                time: timestamps(&hourly.time)?,
                temperature_2m: values(hourly.temperature_2m),
                relative_humidity_2m: values(hourly.relative_humidity_2m),
                apparent_temperature: values(hourly.apparent_temperature),
                precipitation_probability: values(hourly.precipitation_probability),
                precipitation: values(hourly.precipitation),
                weather_code: hourly.weather_code.into_iter().map(code).collect(),
                wind_speed_10m: values(hourly.wind_speed_10m),
                uv_index: values(hourly.uv_index),
            },
        })
    }

    /// Fetch the daily summary for the next `forecast_days` days
    pub async fn get_daily(
        &self,
        coords: Coordinates,
        units: Units,
        forecast_days: u8,
    ) -> AppResult<DailyWeatherResponse> {
        let data: OmDailyResponse = self
            .fetch(
                coords,
                units,
                &[
                    ("daily", DAILY_VARIABLES.to_string()),
                    ("forecast_days", forecast_days.to_string()),
                ],
            )
            .await?;

        let daily = data.daily;
        Ok(DailyWeatherResponse {
            location: data.location.into(),
            daily: DailyWeather {
                time: timestamps(&daily.time)?,
                weather_code: daily.weather_code.into_iter().map(code).collect(),
                temperature_2m_max: values(daily.temperature_2m_max),
                temperature_2m_min: values(daily.temperature_2m_min),
                sunrise: timestamps(&daily.sunrise)?,
                sunset: timestamps(&daily.sunset)?,
                precipitation_sum: values(daily.precipitation_sum),
                precipitation_probability_max: values(daily.precipitation_probability_max),
                wind_speed_10m_max: values(daily.wind_speed_10m_max),
                uv_index_max: values(daily.uv_index_max),
            },
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        coords: Coordinates,
        units: Units,
        variables: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}/forecast", self.base_url);

        let mut query: Vec<(&str, String)> = vec![
            ("latitude", coords.latitude.to_string()),
            ("longitude", coords.longitude.to_string()),
            ("timezone", "auto".to_string()),
            ("timeformat", "unixtime".to_string()),
            ("temperature_unit", units.temperature.as_query().to_string()),
            ("wind_speed_unit", units.wind_speed.as_query().to_string()),
            ("precipitation_unit", units.precipitation.as_query().to_string()),
        ];
        query.extend(variables.iter().cloned());

        tracing::debug!(
            latitude = coords.latitude,
            longitude = coords.longitude,
            "Requesting forecast"
        );

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Weather API request failed: {}", e);
                if e.is_timeout() {
                    AppError::Timeout("Weather service".to_string())
                } else {
                    AppError::WeatherServiceUnavailable
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::WeatherApi(format!("{} - {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::WeatherApi(format!("Failed to parse weather response: {}", e)))
    }
}

impl From<OmLocation> for ForecastLocation {
    fn from(location: OmLocation) -> Self {
        Self {
            latitude: location.latitude,
            longitude: location.longitude,
            utc_offset_seconds: location.utc_offset_seconds,
            timezone: location.timezone,
            timezone_abbreviation: location.timezone_abbreviation,
        }
    }
}

/// Missing readings are reported as zero
fn value(reading: Option<f64>) -> f64 {
    reading.unwrap_or(0.0)
}

fn values(column: Vec<Option<f64>>) -> Vec<f64> {
    column.into_iter().map(value).collect()
}

fn code(reading: Option<f64>) -> i32 {
    value(reading).round() as i32
}

fn timestamp(seconds: i64) -> AppResult<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| AppError::WeatherApi(format!("Invalid timestamp: {}", seconds)))
}

fn timestamps(column: &[i64]) -> AppResult<Vec<DateTime<Utc>>> {
    column.iter().map(|&seconds| timestamp(seconds)).collect()
}
