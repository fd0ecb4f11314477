//! Position Service
//!
//! Mock position snapshot. The identity field for this feed is the
//! `ticker` symbol rather than a numeric id, which exercises the
//! configurable-identity path in the grid layer.

use rust_decimal::Decimal;

use crate::model::Row;

const SEC_TYPES: [&str; 3] = ["Equity", "Warrant", "Bond"];

/// Mock position service.
#[derive(Debug, Default, Clone, Copy)]
pub struct PositionService;

impl PositionService {
    /// Create the service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Get the position snapshot (ten rows, `TKR0`..`TKR9`).
    #[must_use]
    pub fn positions(&self) -> Vec<Row> {
        tracing::debug!("returning mock positions");
        (0..10_i64)
            .map(|i| {
                let quantity = 1_000 + i * 250;
                let price = Decimal::new(10_000 + i * 375, 2);
                Row::new()
                    .with("ticker", format!("TKR{i}"))
                    .with("account", format!("ACC00{}", i % 3 + 1))
                    .with("sec_type", SEC_TYPES[usize::try_from(i % 3).unwrap_or(0)])
                    .with("quantity", quantity)
                    .with("price", price)
                    .with("market_value", price * Decimal::from(quantity))
                    .with("currency", "USD")
            })
            .collect()
    }

    /// Positions filtered to a single security type.
    #[must_use]
    pub fn positions_of_type(&self, sec_type: &str) -> Vec<Row> {
        self.positions()
            .into_iter()
            .filter(|row| row.text("sec_type") == Some(sec_type))
            .collect()
    }
}
