//! Tracing Subscriber Setup
//!
//! Configures a formatted tracing subscriber for the session core. The
//! core runs embedded inside a host process, so installation is
//! best-effort: if the host already installed a global subscriber, the
//! call is a no-op and the core's events flow into the host's setup.
//!
//! # Environment Variables
//!
//! - `DESKFEED_LOG_ENABLED`: Set to "false" to skip installation
//!   (default: true)
//! - `DESKFEED_LOG`: Filter directives, `EnvFilter` syntax
//!   (default: `desk_session=info,desk_data=info`)
//!
//! # Usage
//!
//! ```rust
//! use desk_session::infrastructure::telemetry;
//!
//! // Initialize at startup; false means a subscriber was already set
//! let installed = telemetry::init();
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Default filter directives.
const DEFAULT_DIRECTIVES: &str = "desk_session=info,desk_data=info";

/// Telemetry configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Whether to install a subscriber at all.
    pub enabled: bool,
    /// Filter directives in `EnvFilter` syntax.
    pub log_directives: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_directives: DEFAULT_DIRECTIVES.to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let enabled = std::env::var("DESKFEED_LOG_ENABLED")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        let log_directives =
            std::env::var("DESKFEED_LOG").unwrap_or_else(|_| DEFAULT_DIRECTIVES.to_string());

        Self {
            enabled,
            log_directives,
        }
    }
}

/// Initialize telemetry with configuration from the environment.
///
/// Returns `true` if this call installed the global subscriber.
pub fn init() -> bool {
    init_with_config(&TelemetryConfig::from_env())
}

/// Initialize telemetry with custom configuration.
///
/// Returns `true` if this call installed the global subscriber, `false`
/// if telemetry is disabled or a subscriber was already set.
pub fn init_with_config(config: &TelemetryConfig) -> bool {
    if !config.enabled {
        return false;
    }

    let env_filter = EnvFilter::try_new(&config.log_directives)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .is_ok()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = TelemetryConfig::default();
        assert!(config.enabled);
        assert_eq!(config.log_directives, DEFAULT_DIRECTIVES);
    }

    #[test]
    fn disabled_config_skips_installation() {
        let config = TelemetryConfig {
            enabled: false,
            log_directives: DEFAULT_DIRECTIVES.to_string(),
        };
        assert!(!init_with_config(&config));
    }

    #[test]
    fn second_installation_is_a_noop() {
        let config = TelemetryConfig::default();
        let first = init_with_config(&config);
        let second = init_with_config(&config);

        // At most one call can win the global slot
        assert!(!(first && second));
        assert!(!second || first);
    }
}
