//! Risk Service
//!
//! Mock portfolio risk metrics with limits and breach flags.

use rust_decimal::Decimal;

use crate::model::Row;

/// Mock risk service.
#[derive(Debug, Default, Clone, Copy)]
pub struct RiskService;

impl RiskService {
    /// Create the service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Get the risk metric snapshot. Identity field is `metric`.
    #[must_use]
    pub fn risk_metrics(&self) -> Vec<Row> {
        tracing::debug!("returning mock risk metrics");
        let metrics = [
            ("VaR 95%", Decimal::new(1_250_000, 2), Decimal::new(2_000_000, 2)),
            ("Gross Exposure", Decimal::new(48_500_000, 2), Decimal::new(60_000_000, 2)),
            ("Net Exposure", Decimal::new(12_300_000, 2), Decimal::new(25_000_000, 2)),
            ("Beta-Adj Delta", Decimal::new(8_750_000, 2), Decimal::new(8_000_000, 2)),
            ("Concentration Max", Decimal::new(1_450, 2), Decimal::new(1_500, 2)),
        ];

        metrics
            .into_iter()
            .map(|(metric, value, limit)| {
                Row::new()
                    .with("metric", metric)
                    .with("value", value)
                    .with("limit", limit)
                    .with("breached", value > limit)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::find_row_by_id;

    #[test]
    fn breach_flag_matches_value_vs_limit() {
        for row in RiskService::new().risk_metrics() {
            let breached = row.number("value").unwrap() > row.number("limit").unwrap();
            assert_eq!(row.flag("breached"), Some(breached));
        }
    }

    #[test]
    fn one_metric_is_breached() {
        let rows = RiskService::new().risk_metrics();

        let breached: Vec<_> = rows.iter().filter(|r| r.flag("breached") == Some(true)).collect();
        assert_eq!(breached.len(), 1);
        assert!(find_row_by_id(&rows, "Beta-Adj Delta", "metric").is_some());
    }
}
