//! HTTP API tests
//!
//! Drive the full router with `tower::ServiceExt::oneshot`, with the forecast
//! API mocked by wiremock and time pinned by a manual clock.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use weather_assistant_backend::clock::ManualClock;
use weather_assistant_backend::{create_app, AppState, Config};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 2024-06-01T12:00:00Z
const T0: i64 = 1_717_243_200;

fn hourly_body() -> Value {
    let hours: Vec<i64> = (0..4).map(|h| T0 + h * 3600).collect();
    json!({
        "latitude": 52.52,
        "longitude": 13.41,
        "utc_offset_seconds": 0,
        "timezone": "GMT",
        "timezone_abbreviation": "GMT",
        "hourly": {
            "time": hours,
            "temperature_2m": [18.2, 17.1, 16.8, 16.5],
            "relative_humidity_2m": [55, 70, 82, 85],
            "apparent_temperature": [17.5, 16.0, 15.9, 15.5],
            "precipitation_probability": [10, 70, 80, 75],
            "precipitation": [0.0, 1.4, 2.2, 1.8],
            "weather_code": [2, 61, 61, 61],
            "wind_speed_10m": [9.0, 14.0, 15.0, 12.0],
            "uv_index": [4.0, 1.0, 0.5, null]
        }
    })
}

struct TestApp {
    router: Router,
    _server: MockServer,
}

async fn app() -> TestApp {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("forecast_days", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hourly_body()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("current", "temperature_2m,relative_humidity_2m,apparent_temperature,precipitation,rain,showers,snowfall,weather_code,cloud_cover,pressure_msl,wind_speed_10m,wind_direction_10m,wind_gusts_10m"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "latitude": 52.52,
            "longitude": 13.41,
            "utc_offset_seconds": 7200,
            "timezone": "Europe/Berlin",
            "timezone_abbreviation": "CEST",
            "current": {
                "time": T0,
                "interval": 900,
                "temperature_2m": 18.2,
                "relative_humidity_2m": 55,
                "apparent_temperature": 17.5,
                "precipitation": 0.0,
                "rain": 0.0,
                "showers": 0.0,
                "snowfall": 0.0,
                "weather_code": 2,
                "cloud_cover": 40,
                "pressure_msl": 1013.2,
                "wind_speed_10m": 9.0,
                "wind_direction_10m": 250,
                "wind_gusts_10m": null
            }
        })))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.weather.api_endpoint = server.uri();
    // No key: generated text falls back to deterministic messages
    config.ai.api_key = String::new();

    let clock = Arc::new(ManualClock::new(Utc.timestamp_opt(T0, 0).unwrap()));
    let state = AppState::with_clock(config, clock).unwrap();

    TestApp {
        router: create_app(state),
        _server: server,
    }
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = app().await;

    let (status, _) = send(&app.router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app.router, "GET", "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["forecastCached"], false);
    assert_eq!(body["pendingNotifications"], 0);
}

// ============================================================================
// Forecast Proxy
// ============================================================================

#[tokio::test]
async fn test_current_weather_proxy() {
    let app = app().await;

    let (status, body) = send(&app.router, "GET", "/api/v1/weather/current?lat=52.52&lon=13.41", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timezone"], "Europe/Berlin");
    assert_eq!(body["current"]["weatherCode"], 2);
    assert_eq!(body["current"]["windGusts10m"], 0.0);
    assert_eq!(body["current"]["time"], "2024-06-01T12:00:00Z");
}

#[tokio::test]
async fn test_missing_coordinates_rejected() {
    let app = app().await;

    let (status, body) = send(&app.router, "GET", "/api/v1/weather/current?lon=13.41", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "lat");

    let (status, _) = send(&app.router, "GET", "/api/v1/weather/hourly?lat=120&lon=13.41", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_hourly_proxy_feeds_predictions() {
    let app = app().await;

    let (status, _) = send(&app.router, "GET", "/api/v1/predictions", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app.router, "GET", "/api/v1/weather/hourly?lat=52.52&lon=13.41", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hourly"]["time"].as_array().unwrap().len(), 4);
    assert_eq!(body["hourly"]["uvIndex"][3], 0.0);

    let (status, body) = send(&app.router, "GET", "/api/v1/predictions", None).await;
    assert_eq!(status, StatusCode::OK);

    let kinds: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["kind"].as_str().unwrap())
        .collect();
    // Rain onset and the 2 -> 61 regime change are both reported
    assert_eq!(kinds, vec!["rain_starting", "weather_change"]);
    assert_eq!(body[0]["scheduledFor"], "2024-06-01T12:30:00Z");
    assert_eq!(body[0]["priority"], "high");
}

#[tokio::test]
async fn test_fahrenheit_hourly_does_not_feed_predictions() {
    let app = app().await;

    let (status, _) = send(
        &app.router,
        "GET",
        "/api/v1/weather/hourly?lat=52.52&lon=13.41&temperatureUnit=fahrenheit",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app.router, "GET", "/api/v1/predictions", None).await;
    assert_eq!(body, json!([]));
}

// ============================================================================
// Prediction Notifications
// ============================================================================

#[tokio::test]
async fn test_refresh_schedule_and_cancel() {
    let app = app().await;

    let (status, body) = send(&app.router, "POST", "/api/v1/predictions/refresh", Some(json!({"lat": 52.52, "lon": 13.41}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = send(&app.router, "POST", "/api/v1/predictions/schedule", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Scheduled 2 weather predictions");
    assert_eq!(body["scheduled"], 2);

    let (_, body) = send(&app.router, "GET", "/api/v1/notifications/pending", None).await;
    assert_eq!(body["count"], 2);
    let first = &body["notifications"][0];
    assert_eq!(first["title"], "🌧️ Weather Alert");
    assert_eq!(first["body"], "☔ Rain expected in 60min (70% chance) - grab an umbrella!");
    assert_eq!(first["metadata"]["category"], "weather_prediction");

    let (_, body) = send(&app.router, "DELETE", "/api/v1/notifications", None).await;
    assert_eq!(body["success"], true);

    let (_, body) = send(&app.router, "GET", "/api/v1/notifications/pending", None).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_schedule_without_forecast() {
    let app = app().await;

    let (_, body) = send(&app.router, "POST", "/api/v1/predictions/schedule", None).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "No significant weather changes predicted");
}

#[tokio::test]
async fn test_schedule_respects_preferences_and_permission() {
    let app = app().await;
    send(&app.router, "POST", "/api/v1/predictions/refresh", Some(json!({"lat": 52.52, "lon": 13.41}))).await;

    let (status, prefs) = send(&app.router, "PUT", "/api/v1/preferences", Some(json!({"enabled": false}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prefs["enabled"], false);
    assert_eq!(prefs["rainAlerts"], true);

    let (_, body) = send(&app.router, "POST", "/api/v1/predictions/schedule", None).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Notifications disabled");

    send(&app.router, "PUT", "/api/v1/preferences", Some(json!({"enabled": true}))).await;
    let (status, _) = send(&app.router, "PUT", "/api/v1/notifications/permission", Some(json!({"status": "denied"}))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app.router, "POST", "/api/v1/predictions/schedule", None).await;
    assert_eq!(body["message"], "Notification permission not granted");

    let (_, body) = send(&app.router, "GET", "/api/v1/notifications/pending", None).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_refresh_rejects_bad_coordinates() {
    let app = app().await;

    let (status, body) = send(&app.router, "POST", "/api/v1/predictions/refresh", Some(json!({"lat": 52.52, "lon": 200.0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "lon");
}

// ============================================================================
// Assistant
// ============================================================================

#[tokio::test]
async fn test_assistant_without_key_uses_fallback() {
    let app = app().await;

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/v1/ai",
        Some(json!({"mode": "initial", "weatherCode": 0, "temperature": 22.0, "description": "Clear sky"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fallback"], true);
    assert_eq!(body["mode"], "initial");
    assert!(body["content"].as_str().unwrap().starts_with("Beautiful sunny weather!"));
}

#[tokio::test]
async fn test_assistant_rejects_missing_fields() {
    let app = app().await;

    let (status, body) = send(&app.router, "POST", "/api/v1/ai", Some(json!({"mode": "initial"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}
