//! Configuration for the sync controller.

use std::time::Duration;

/// Quiet period after the last edit before an auto-save fires.
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(1500);

/// How long the "saved" status stays visible.
pub const DEFAULT_STATUS_DISPLAY_DELAY: Duration = Duration::from_millis(2000);

/// Configuration for an editor session.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Server base URL, e.g. `http://192.168.1.20:5000`.
    pub server_url: String,
    /// Debounce delay between the last edit and the auto-save.
    pub debounce_delay: Duration,
    /// How long a successful save stays on the status line.
    pub status_display_delay: Duration,
}

impl SyncConfig {
    /// Creates a configuration for the given server.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            debounce_delay: DEFAULT_DEBOUNCE_DELAY,
            status_display_delay: DEFAULT_STATUS_DISPLAY_DELAY,
        }
    }

    /// Sets the debounce delay.
    pub fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    /// Sets the status display delay.
    pub fn with_status_display_delay(mut self, delay: Duration) -> Self {
        self.status_display_delay = delay;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new("http://127.0.0.1:5000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_delays() {
        let config = SyncConfig::default();
        assert_eq!(config.debounce_delay, Duration::from_millis(1500));
        assert_eq!(config.status_display_delay, Duration::from_millis(2000));
        assert_eq!(config.server_url, "http://127.0.0.1:5000");
    }

    #[test]
    fn sync_config_builder() {
        let config = SyncConfig::new("http://pad.lan:8000")
            .with_debounce_delay(Duration::from_millis(300))
            .with_status_display_delay(Duration::from_secs(1));

        assert_eq!(config.server_url, "http://pad.lan:8000");
        assert_eq!(config.debounce_delay, Duration::from_millis(300));
        assert_eq!(config.status_display_delay, Duration::from_secs(1));
    }
}
