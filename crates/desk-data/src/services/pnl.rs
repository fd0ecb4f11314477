//! P&L Service
//!
//! Mock per-account profit-and-loss summary rows.

use rust_decimal::Decimal;

use crate::model::Row;

/// Mock P&L service.
#[derive(Debug, Default, Clone, Copy)]
pub struct PnlService;

impl PnlService {
    /// Create the service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Get the P&L summary snapshot, one row per account.
    #[must_use]
    pub fn pnl_summary(&self) -> Vec<Row> {
        tracing::debug!("returning mock pnl summary");
        (1..=3_i64)
            .map(|i| {
                let daily = Decimal::new(12_500 * i - 20_000, 2);
                Row::new()
                    .with("id", i)
                    .with("account", format!("ACC00{i}"))
                    .with("daily_pnl", daily)
                    .with("mtd_pnl", daily * Decimal::from(18))
                    .with("ytd_pnl", daily * Decimal::from(140))
                    .with("currency", "USD")
            })
            .collect()
    }
}
