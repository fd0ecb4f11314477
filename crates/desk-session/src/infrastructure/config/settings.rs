//! Dashboard Configuration Settings
//!
//! Configuration types for the session core, loaded from environment
//! variables. Every setting has a sensible default; an absent variable
//! falls back to it, while a present but unparseable value is rejected
//! so a typo in deployment config cannot silently change the cadence.

use std::time::Duration;

/// Tick loop settings.
#[derive(Debug, Clone)]
pub struct TickSettings {
    /// Delay between ticks of a streaming feed.
    pub interval: Duration,
}

impl Default for TickSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1_500),
        }
    }
}

/// Broadcast channel settings.
#[derive(Debug, Clone)]
pub struct ChannelSettings {
    /// Capacity of the snapshot update channel.
    pub snapshots_capacity: usize,
    /// Capacity of the grid command channel.
    pub commands_capacity: usize,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            snapshots_capacity: 256,
            commands_capacity: 64,
        }
    }
}

/// Complete session core configuration.
#[derive(Debug, Clone, Default)]
pub struct DashboardConfig {
    /// Tick loop settings.
    pub tick: TickSettings,
    /// Broadcast channel settings.
    pub channels: ChannelSettings,
}

impl DashboardConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let tick = TickSettings {
            interval: parse_env_duration_millis(
                "DESKFEED_TICK_INTERVAL_MS",
                TickSettings::default().interval,
            )?,
        };

        let channels = ChannelSettings {
            snapshots_capacity: parse_env_usize(
                "DESKFEED_SNAPSHOTS_CAPACITY",
                ChannelSettings::default().snapshots_capacity,
            )?,
            commands_capacity: parse_env_usize(
                "DESKFEED_COMMANDS_CAPACITY",
                ChannelSettings::default().commands_capacity,
            )?,
        };

        Ok(Self { tick, channels })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Environment variable is present but not parseable.
    #[error("environment variable {key} has invalid value {value:?}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// The offending value.
        value: String,
    },
}

fn parse_env_usize(key: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}

fn parse_env_duration_millis(key: &str, default: Duration) -> Result<Duration, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value,
            }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_settings_defaults() {
        let settings = TickSettings::default();
        assert_eq!(settings.interval, Duration::from_millis(1_500));
    }

    #[test]
    fn channel_settings_defaults() {
        let settings = ChannelSettings::default();
        assert_eq!(settings.snapshots_capacity, 256);
        assert_eq!(settings.commands_capacity, 64);
    }

    #[test]
    fn absent_variables_fall_back_to_defaults() {
        // Variables with this prefix are not set in the test environment
        let config = DashboardConfig::from_env().unwrap();
        assert_eq!(config.tick.interval, Duration::from_millis(1_500));
        assert_eq!(config.channels.snapshots_capacity, 256);
    }

    #[test]
    fn unset_variable_uses_default() {
        let parsed = parse_env_usize("DESKFEED_TEST_UNSET_CAPACITY", 17).unwrap();
        assert_eq!(parsed, 17);
    }

    #[test]
    fn invalid_value_error_names_the_variable() {
        let error = ConfigError::InvalidValue {
            key: "DESKFEED_TICK_INTERVAL_MS".to_string(),
            value: "fast".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("DESKFEED_TICK_INTERVAL_MS"));
        assert!(message.contains("fast"));
    }
}
