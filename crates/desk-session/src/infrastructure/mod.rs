//! Infrastructure layer - Adapters and wiring around the session core.

/// Channel-based snapshot and command distribution.
pub mod broadcast;

/// Environment-driven configuration.
pub mod config;

/// Tracing subscriber setup.
pub mod telemetry;
