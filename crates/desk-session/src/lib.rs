#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::significant_drop_tightening
    )
)]

//! Desk Session - Dashboard Session Core
//!
//! The per-user session core of the Deskfeed dashboard. It owns the
//! named row snapshots a client renders, drives the simulated live feed,
//! and gives grids a uniform synchronization contract.
//!
//! # Layers (inside -> outside)
//!
//! - **Domain**: Session-owned state and grid contracts
//!   - `session`: Snapshot store, per-feed tick control state, teardown
//!   - `grid`: One-way grid commands and cell-edit events
//!
//! - **Application**: The two core mechanisms
//!   - `tick`: Live tick engine (background loop, reentrancy guard)
//!   - `grid`: Grid synchronization layer (row patching, selection,
//!     fire-and-forget commands)
//!
//! - **Infrastructure**: Adapters and wiring
//!   - `broadcast`: Channel-based snapshot/command distribution
//!   - `config`: Environment-driven settings
//!   - `telemetry`: Tracing subscriber setup
//!
//! # Data Flow
//!
//! ```text
//! Data Services ──► Session Store ──► Tick Engine ──┐
//!                        ▲                          │   ┌───────────┐
//!                        │                          ├──►│ Broadcast │──► UI grids
//!                  Grid Sync Layer ◄── UI events ───┘   │    Hub    │──► UI commands
//!                                                       └───────────┘
//! ```
//!
//! The core has no wire protocol and no binary: it runs embedded inside
//! whatever process hosts the session.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Session state and grid contracts.
pub mod domain;

/// Application layer - Tick engine and grid synchronization.
pub mod application;

/// Infrastructure layer - Broadcast, config, telemetry.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::grid::{CellEdit, ExportFormat, GridCommand};
pub use domain::session::{Session, SessionError, SnapshotRows, TickSession};

// Application services
pub use application::grid::GridSync;
pub use application::tick::{TickEngine, Ticker};

// Infrastructure config
pub use infrastructure::config::{
    ChannelSettings, ConfigError, DashboardConfig, TickSettings,
};

// Broadcast hub (for integration tests and host wiring)
pub use infrastructure::broadcast::{
    DashboardHub, HubConfig, HubStats, SharedHub, SnapshotUpdate,
};

// Telemetry
pub use infrastructure::telemetry::{TelemetryConfig, init as init_telemetry};
