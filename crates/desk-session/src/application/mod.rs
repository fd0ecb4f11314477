//! Application layer - The two core mechanisms of the session.

/// Grid synchronization layer.
pub mod grid;

/// Live tick engine.
pub mod tick;
