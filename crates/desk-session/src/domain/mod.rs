//! Domain layer - Session-owned state and grid contracts.

/// One-way grid commands and display-layer events.
pub mod grid;

/// Session state: snapshot store, tick control, teardown.
pub mod session;
