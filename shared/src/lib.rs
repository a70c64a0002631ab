//! Shared types and models for the weather assistant
//!
//! This crate contains the forecast data model and the transition detector,
//! shared between the backend, the mobile client (via WASM), and tests.

pub mod detection;
pub mod models;
pub mod types;
pub mod validation;
pub mod wmo;

pub use detection::{detect, within_horizon};
pub use models::*;
pub use types::*;
pub use validation::*;
