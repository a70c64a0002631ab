//! Notification preference storage

use parking_lot::RwLock;
use shared::{NotificationPreferences, UpdatePreferencesInput};

/// Read and update the user's notification toggles
pub trait PreferencesStore: Send + Sync {
    fn get(&self) -> NotificationPreferences;

    /// Apply a partial update and return the result
    fn update(&self, input: UpdatePreferencesInput) -> NotificationPreferences;
}

/// Process-local preferences, reset on restart
#[derive(Debug, Default)]
pub struct InMemoryPreferences {
    preferences: RwLock<NotificationPreferences>,
}

impl InMemoryPreferences {
    pub fn new(preferences: NotificationPreferences) -> Self {
        Self {
            preferences: RwLock::new(preferences),
        }
    }
}

impl PreferencesStore for InMemoryPreferences {
    fn get(&self) -> NotificationPreferences {
        *self.preferences.read()
    }

    fn update(&self, input: UpdatePreferencesInput) -> NotificationPreferences {
        let mut preferences = self.preferences.write();
        preferences.apply(input);
        tracing::info!(preferences = ?*preferences, "Notification preferences updated");
        *preferences
    }
}
