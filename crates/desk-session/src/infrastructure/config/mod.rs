//! Configuration Management
//!
//! Environment-driven settings for the session core.

mod settings;

pub use settings::{ChannelSettings, ConfigError, DashboardConfig, TickSettings};
