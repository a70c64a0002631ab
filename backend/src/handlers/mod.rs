//! HTTP request handlers

pub mod assistant;
pub mod health;
pub mod notifications;
pub mod predictions;
pub mod preferences;
pub mod weather;

pub use assistant::ask_assistant;
pub use health::health_check;
pub use notifications::{cancel_all, list_pending, set_permission};
pub use predictions::{list_predictions, refresh_predictions, schedule_predictions};
pub use preferences::{get_preferences, update_preferences};
pub use weather::{get_current_weather, get_daily_weather, get_hourly_weather};
