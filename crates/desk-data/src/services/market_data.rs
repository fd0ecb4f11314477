//! Market Data Service
//!
//! Mock ticker-level market data for the dashboard grid. Identity field
//! is the numeric `id`; the `ticker` column is what users navigate by.

use rust_decimal::Decimal;

use crate::model::Row;

/// Tickers covered by the mock snapshot.
const TICKERS: [&str; 6] = ["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "NVDA"];

/// Mock market data service.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarketDataService;

impl MarketDataService {
    /// Create the service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Get the market data snapshot.
    #[must_use]
    pub fn market_data(&self) -> Vec<Row> {
        tracing::debug!(rows = TICKERS.len(), "returning mock market data");
        TICKERS
            .iter()
            .enumerate()
            .map(|(i, ticker)| {
                let idx = i64::try_from(i).unwrap_or(0);
                let last = Decimal::new(18_250 + idx * 125, 2);
                Row::new()
                    .with("id", idx + 1)
                    .with("ticker", *ticker)
                    .with("last_price", last)
                    .with("bid", last - Decimal::new(5, 2))
                    .with("ask", last + Decimal::new(5, 2))
                    .with("vwap_price", last - Decimal::new(25, 2))
                    .with("last_volume", 54_200_000_i64 - idx * 1_750_000)
                    .with("chg_1d_pct", Decimal::new(50 - idx * 15, 2))
                    .with("implied_vol_pct", Decimal::new(2_500 + idx * 110, 2))
                    .with("market_status", "Open")
                    .with("created_by", "system")
            })
            .collect()
    }
}
