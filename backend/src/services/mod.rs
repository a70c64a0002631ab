//! Business logic services for the weather assistant

pub mod assistant;
pub mod composer;
pub mod forecast_store;
pub mod predictions;
pub mod preferences;
pub mod scheduler;

pub use assistant::AssistantService;
pub use composer::{NotificationComposer, TextGenerator};
pub use forecast_store::{CachePolicy, ForecastSource, ForecastStore};
pub use predictions::{PredictionService, ScheduleResponse};
pub use preferences::{InMemoryPreferences, PreferencesStore};
pub use scheduler::{InMemoryPlatform, NotificationPlatform, NotificationScheduler};
