//! Compliance Service
//!
//! Mock pre/post-trade compliance check results.

use chrono::Utc;

use crate::model::Row;

/// Mock compliance service.
#[derive(Debug, Default, Clone, Copy)]
pub struct ComplianceService;

impl ComplianceService {
    /// Create the service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Get the compliance check snapshot. Identity field is `rule_id`.
    #[must_use]
    pub fn compliance_checks(&self) -> Vec<Row> {
        tracing::debug!("returning mock compliance checks");
        let checked_at = Utc::now().to_rfc3339();
        let checks = [
            ("CMP-001", "Restricted list screening", true, "High"),
            ("CMP-002", "Position concentration limit", true, "High"),
            ("CMP-003", "Counterparty exposure cap", false, "Medium"),
            ("CMP-004", "Short-sale locate", true, "Medium"),
            ("CMP-005", "Wash-trade surveillance", true, "Low"),
        ];

        checks
            .into_iter()
            .map(|(rule_id, rule, passed, severity)| {
                Row::new()
                    .with("rule_id", rule_id)
                    .with("rule", rule)
                    .with("passed", passed)
                    .with("severity", severity)
                    .with("checked_at", checked_at.clone())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::find_row_by_id;

    #[test]
    fn failed_checks_are_present_and_flagged() {
        let rows = ComplianceService::new().compliance_checks();

        assert_eq!(rows.len(), 5);
        let failed = find_row_by_id(&rows, "CMP-003", "rule_id").unwrap();
        assert_eq!(failed.flag("passed"), Some(false));
    }

    #[test]
    fn checked_at_is_rfc3339() {
        let rows = ComplianceService::new().compliance_checks();

        for row in rows {
            let ts = row.text("checked_at").unwrap();
            assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
        }
    }
}
