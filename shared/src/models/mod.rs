//! Domain models for the weather assistant

mod forecast;
mod notification;
mod prediction;
mod preferences;

pub use forecast::*;
pub use notification::*;
pub use prediction::*;
pub use preferences::*;
