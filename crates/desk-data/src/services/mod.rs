//! Mock Data Services
//!
//! Thin, stateless snapshot fetchers backing the dashboard grids. Each
//! service exposes zero/low-argument queries returning `Vec<Row>` and is
//! treated by the session core as a pure, idempotent, side-effect-free
//! source. Real implementations would delegate to a repository layer.

/// Compliance checks feed.
pub mod compliance;
/// FX rates feed with live tick generation.
pub mod fx;
/// Market data (ticker) feed.
pub mod market_data;
/// Notification feed with jump-to-row targets.
pub mod notifications;
/// P&L summary feed.
pub mod pnl;
/// Position feed.
pub mod positions;
/// Risk metrics feed.
pub mod risk;
