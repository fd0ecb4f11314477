//! Grid Contracts
//!
//! The one-way command vocabulary between the session core and a
//! client-rendered grid, plus the events the display layer feeds back.
//!
//! Commands are requests, not queries: no return value is awaited and no
//! completion is confirmed. Multiple grid instances on one page are
//! disambiguated solely by `grid_id`; the receiving layer silently drops
//! commands addressed to a grid that is not mounted.

use desk_data::CellValue;
use serde::{Deserialize, Serialize};

// =============================================================================
// Commands
// =============================================================================

/// Export file format for a grid export command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values.
    Csv,
    /// Excel workbook.
    Excel,
}

impl ExportFormat {
    /// Format name as used in file extensions.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Excel => "excel",
        }
    }
}

/// A fire-and-forget command addressed to a named grid instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum GridCommand {
    /// Scroll to the row with the given identity value and flash it.
    JumpToRow {
        /// Target grid instance.
        grid_id: String,
        /// Row identity value to bring into view.
        row_id: String,
    },
    /// Force refresh of all rendered cells.
    Refresh {
        /// Target grid instance.
        grid_id: String,
    },
    /// Clear all column filters.
    ClearFilters {
        /// Target grid instance.
        grid_id: String,
    },
    /// Reset columns to their default state.
    ResetColumnState {
        /// Target grid instance.
        grid_id: String,
    },
    /// Programmatically select the given rows.
    SelectRows {
        /// Target grid instance.
        grid_id: String,
        /// Row identity values to select.
        row_ids: Vec<String>,
    },
    /// Trigger a data export.
    Export {
        /// Target grid instance.
        grid_id: String,
        /// Export file format.
        format: ExportFormat,
    },
}

impl GridCommand {
    /// The grid instance this command is addressed to.
    #[must_use]
    pub fn grid_id(&self) -> &str {
        match self {
            Self::JumpToRow { grid_id, .. }
            | Self::Refresh { grid_id }
            | Self::ClearFilters { grid_id }
            | Self::ResetColumnState { grid_id }
            | Self::SelectRows { grid_id, .. }
            | Self::Export { grid_id, .. } => grid_id,
        }
    }
}

// =============================================================================
// Display-Layer Events
// =============================================================================

fn default_id_field() -> String {
    desk_data::DEFAULT_ID_FIELD.to_string()
}

/// A cell edit reported by the display layer.
///
/// Routed through the grid synchronization layer to patch the owning
/// collection; `old_value` is carried for audit logging only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellEdit {
    /// Named collection the edited grid renders.
    pub collection: String,
    /// Identity value of the edited row.
    pub row_id: String,
    /// Edited field name.
    pub field: String,
    /// Value before the edit, if the display layer knew it.
    pub old_value: Option<CellValue>,
    /// Value after the edit.
    pub new_value: CellValue,
    /// Identity field of the collection (defaults to `"id"`).
    #[serde(default = "default_id_field")]
    pub id_field: String,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_id_is_extracted_from_every_variant() {
        let commands = vec![
            GridCommand::JumpToRow {
                grid_id: "g".to_string(),
                row_id: "r".to_string(),
            },
            GridCommand::Refresh {
                grid_id: "g".to_string(),
            },
            GridCommand::ClearFilters {
                grid_id: "g".to_string(),
            },
            GridCommand::ResetColumnState {
                grid_id: "g".to_string(),
            },
            GridCommand::SelectRows {
                grid_id: "g".to_string(),
                row_ids: vec!["a".to_string()],
            },
            GridCommand::Export {
                grid_id: "g".to_string(),
                format: ExportFormat::Csv,
            },
        ];

        for command in commands {
            assert_eq!(command.grid_id(), "g");
        }
    }

    #[test]
    fn command_serializes_with_tag() {
        let command = GridCommand::JumpToRow {
            grid_id: "market_data_grid".to_string(),
            row_id: "AAPL".to_string(),
        };

        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["command"], "jump_to_row");
        assert_eq!(json["grid_id"], "market_data_grid");
        assert_eq!(json["row_id"], "AAPL");
    }

    #[test]
    fn cell_edit_defaults_id_field() {
        let edit: CellEdit = serde_json::from_value(serde_json::json!({
            "collection": "positions",
            "row_id": "TKR3",
            "field": "price",
            "old_value": null,
            "new_value": "105.00",
        }))
        .unwrap();

        assert_eq!(edit.id_field, "id");
        assert!(edit.old_value.is_none());
    }

    #[test]
    fn export_format_round_trips() {
        assert_eq!(ExportFormat::Csv.as_str(), "csv");
        assert_eq!(ExportFormat::Excel.as_str(), "excel");
        let json = serde_json::to_string(&ExportFormat::Excel).unwrap();
        assert_eq!(json, "\"excel\"");
    }
}
