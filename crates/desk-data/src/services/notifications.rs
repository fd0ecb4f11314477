//! Notification Service
//!
//! Mock notifications for the dashboard sidebar. Each notification
//! carries a grid id and row id so the presentation layer can issue a
//! jump-to-row command when it is clicked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Row;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational.
    Info,
    /// Needs attention.
    Warning,
    /// Needs immediate attention.
    Critical,
}

impl Severity {
    /// Severity as a display string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

/// A dashboard notification with a jump-to-row target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification id.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Severity level.
    pub severity: Severity,
    /// Grid instance the notification refers to.
    pub grid_id: String,
    /// Row identity value within that grid.
    pub row_id: String,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// Render the notification as a grid row.
    #[must_use]
    pub fn to_row(&self) -> Row {
        Row::new()
            .with("id", self.id.as_str())
            .with("title", self.title.as_str())
            .with("body", self.body.as_str())
            .with("severity", self.severity.as_str())
            .with("grid_id", self.grid_id.as_str())
            .with("row_id", self.row_id.as_str())
            .with("timestamp", self.timestamp.to_rfc3339())
    }
}

/// Mock notification service.
#[derive(Debug, Default, Clone, Copy)]
pub struct NotificationService;

impl NotificationService {
    /// Create the service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Get the notification snapshot.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        tracing::debug!("returning mock notifications");
        let now = Utc::now();
        vec![
            Notification {
                id: "ntf-001".to_string(),
                title: "Risk limit breach".to_string(),
                body: "Beta-adjusted delta exceeds its limit".to_string(),
                severity: Severity::Critical,
                grid_id: "risk_grid".to_string(),
                row_id: "Beta-Adj Delta".to_string(),
                timestamp: now,
            },
            Notification {
                id: "ntf-002".to_string(),
                title: "Compliance check failed".to_string(),
                body: "Counterparty exposure cap breached".to_string(),
                severity: Severity::Warning,
                grid_id: "compliance_grid".to_string(),
                row_id: "CMP-003".to_string(),
                timestamp: now,
            },
            Notification {
                id: "ntf-003".to_string(),
                title: "Large price move".to_string(),
                body: "NVDA moved more than 3% intraday".to_string(),
                severity: Severity::Info,
                grid_id: "market_data_grid".to_string(),
                row_id: "NVDA".to_string(),
                timestamp: now,
            },
        ]
    }
}
