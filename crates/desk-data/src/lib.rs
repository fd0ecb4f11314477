#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value
    )
)]

//! Desk Data - Row Model and Mock Data Services
//!
//! The leaf crate of the dashboard session core. It defines the typed
//! row/snapshot model every feed is expressed in, plus the mock data
//! services that stand in for repository-backed queries.
//!
//! # Layers
//!
//! - **Model**: `Row`, `CellValue`, and row-identity helpers
//! - **Services**: pure, idempotent snapshot fetchers (FX, market data,
//!   positions, P&L, risk, compliance, notifications)
//!
//! Services carry no caching or retry logic: every call regenerates its
//! snapshot, and callers own whatever they receive.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Row/snapshot model shared by every feed.
pub mod model;

/// Mock data services backing the dashboard grids.
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

pub use model::{CellValue, DEFAULT_ID_FIELD, Row, find_row_by_id, position_by_id};

pub use services::compliance::ComplianceService;
pub use services::fx::{FxService, FxSummary};
pub use services::market_data::MarketDataService;
pub use services::notifications::{Notification, NotificationService, Severity};
pub use services::pnl::PnlService;
pub use services::positions::PositionService;
pub use services::risk::RiskService;
