//! External API integrations

pub mod chat;
pub mod open_meteo;

pub use chat::ChatClient;
pub use open_meteo::WeatherClient;
