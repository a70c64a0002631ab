//! Forecast store
//!
//! Holds the most recent hourly series for the user's location. The cache
//! honours a maximum age and a coordinate-distance threshold; anything older
//! than the maximum age is reported as "no data".

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use shared::{
    is_unset_location, validate_coordinates, Coordinates, HourlySample, Units,
    DEFAULT_COORDINATE_THRESHOLD,
};
use std::sync::Arc;

use crate::clock::Clock;
use crate::config::ForecastCacheConfig;
use crate::error::{AppError, AppResult};
use crate::external::open_meteo::{WeatherClient, DEFAULT_HOURLY_DAYS};

/// Where fresh hourly series come from
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Metric hourly series for a location, ascending by time
    async fn hourly_samples(&self, coords: Coordinates) -> AppResult<Vec<HourlySample>>;
}

#[async_trait]
impl ForecastSource for WeatherClient {
    async fn hourly_samples(&self, coords: Coordinates) -> AppResult<Vec<HourlySample>> {
        let response = self
            .get_hourly(coords, Units::metric(), DEFAULT_HOURLY_DAYS)
            .await?;
        Ok(response.hourly.samples())
    }
}

/// When a cached series stops being usable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachePolicy {
    pub max_age: Duration,
    pub coordinate_threshold: f64,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            max_age: Duration::minutes(30),
            coordinate_threshold: DEFAULT_COORDINATE_THRESHOLD,
        }
    }
}

impl From<&ForecastCacheConfig> for CachePolicy {
    fn from(config: &ForecastCacheConfig) -> Self {
        Self {
            max_age: config.max_age(),
            coordinate_threshold: config.coordinate_threshold,
        }
    }
}

#[derive(Debug, Clone)]
struct CachedForecast {
    coords: Coordinates,
    samples: Vec<HourlySample>,
    fetched_at: DateTime<Utc>,
}

pub struct ForecastStore {
    source: Arc<dyn ForecastSource>,
    clock: Arc<dyn Clock>,
    policy: CachePolicy,
    cache: RwLock<Option<CachedForecast>>,
}

impl ForecastStore {
    pub fn new(source: Arc<dyn ForecastSource>, clock: Arc<dyn Clock>, policy: CachePolicy) -> Self {
        Self {
            source,
            clock,
            policy,
            cache: RwLock::new(None),
        }
    }

    // ========================================================================
    // Cache Access
    // ========================================================================

    /// Return the series for `coords`, fetching when the cache is stale or
    /// belongs to a different place.
    pub async fn refresh(&self, coords: Coordinates) -> AppResult<Vec<HourlySample>> {
        validate_coordinates(&coords).map_err(|msg| AppError::validation("coordinates", msg))?;
        if is_unset_location(&coords) {
            return Err(AppError::validation(
                "coordinates",
                "Location is not available yet",
            ));
        }

        if let Some(samples) = self.cached_for(coords) {
            tracing::debug!("Using cached forecast");
            return Ok(samples);
        }

        let samples = self.source.hourly_samples(coords).await?;
        tracing::info!(
            latitude = coords.latitude,
            longitude = coords.longitude,
            hours = samples.len(),
            "Fetched hourly forecast"
        );
        self.remember(coords, samples.clone());
        Ok(samples)
    }

    /// Record a metric series fetched elsewhere
    pub fn remember(&self, coords: Coordinates, samples: Vec<HourlySample>) {
        *self.cache.write() = Some(CachedForecast {
            coords,
            samples,
            fetched_at: self.clock.now(),
        });
    }

    /// Snapshot of the cached series; empty when absent or expired
    pub fn latest_samples(&self) -> Vec<HourlySample> {
        let now = self.clock.now();
        {
            let cache = self.cache.read();
            match cache.as_ref() {
                None => return Vec::new(),
                Some(entry) if !self.is_expired(entry, now) => return entry.samples.clone(),
                Some(_) => {}
            }
        }

        tracing::debug!("Dropping expired forecast");
        let mut cache = self.cache.write();
        if cache.as_ref().is_some_and(|entry| self.is_expired(entry, now)) {
            *cache = None;
        }
        Vec::new()
    }

    /// Location of the cached series, if any
    pub fn cached_location(&self) -> Option<Coordinates> {
        self.cache.read().as_ref().map(|entry| entry.coords)
    }

    pub fn invalidate(&self) {
        *self.cache.write() = None;
    }

    fn cached_for(&self, coords: Coordinates) -> Option<Vec<HourlySample>> {
        let now = self.clock.now();
        self.cache
            .read()
            .as_ref()
            .filter(|entry| !self.is_expired(entry, now))
            .filter(|entry| {
                !entry
                    .coords
                    .differs_from(&coords, self.policy.coordinate_threshold)
            })
            .map(|entry| entry.samples.clone())
    }

    fn is_expired(&self, entry: &CachedForecast, now: DateTime<Utc>) -> bool {
        now - entry.fetched_at > self.policy.max_age
    }
}
