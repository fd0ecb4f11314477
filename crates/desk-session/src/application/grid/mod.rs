//! Grid Synchronization Layer
//!
//! Gives any tabular display a uniform contract for out-of-band row
//! updates, selection tracking, and navigation, independent of which
//! dataset it renders.
//!
//! All operations are synchronous and complete without suspension.
//! Lookups degrade to "not found" rather than erroring: row presence is
//! inherently racy against concurrent snapshot replacement by the tick
//! loop. Outbound commands are fire-and-forget; a command addressed to
//! an unmounted grid is silently dropped by the receiving layer, and a
//! command sent while nothing is listening is not an error.

use desk_data::Row;

use crate::domain::grid::{CellEdit, ExportFormat, GridCommand};
use crate::domain::session::Session;

/// Synchronization facade between grids and their owning session.
///
/// Cheap to clone; all clones operate on the same session state.
#[derive(Clone)]
pub struct GridSync {
    session: Session,
}

impl GridSync {
    /// Create the facade for a session.
    #[must_use]
    pub fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
        }
    }

    // =========================================================================
    // Row Patching
    // =========================================================================

    /// Patch the first row of `collection` whose `id_field` value
    /// stringwise-equals `row_id`.
    ///
    /// On a hit the row is replaced with a shallow merge of its fields
    /// and `updates`, and the whole collection is republished as a new
    /// snapshot so downstream change detection fires. On a miss this is
    /// a no-op returning `false`; no error is raised.
    pub fn update_row_by_id(
        &self,
        collection: &str,
        row_id: &str,
        updates: &Row,
        id_field: &str,
    ) -> bool {
        let updated = self
            .session
            .patch_row(collection, row_id, updates, id_field);
        if updated {
            tracing::debug!(collection, row_id, "row patched");
        } else {
            tracing::debug!(collection, row_id, "row patch missed");
        }
        updated
    }

    /// Find the first row of `collection` whose `id_field` value
    /// stringwise-equals `row_id`. Read-only, no side effects.
    #[must_use]
    pub fn get_row_by_id(&self, collection: &str, row_id: &str, id_field: &str) -> Option<Row> {
        let snapshot = self.session.snapshot(collection)?;
        desk_data::find_row_by_id(&snapshot, row_id, id_field).cloned()
    }

    /// Apply a display-layer cell edit to its owning collection.
    ///
    /// Routes through [`GridSync::update_row_by_id`] with a single-field
    /// update; the edit's `old_value` is logged for audit only.
    pub fn apply_cell_edit(&self, edit: &CellEdit) -> bool {
        tracing::info!(
            collection = %edit.collection,
            row_id = %edit.row_id,
            field = %edit.field,
            old = ?edit.old_value,
            new = %edit.new_value,
            "cell edited"
        );
        let updates = Row::new().with(edit.field.clone(), edit.new_value.clone());
        self.update_row_by_id(&edit.collection, &edit.row_id, &updates, &edit.id_field)
    }

    // =========================================================================
    // Selection Tracking
    // =========================================================================

    /// Wholesale-replace the selection set of a grid.
    ///
    /// Invoked by the display layer's own selection events, not by
    /// application logic directly.
    pub fn handle_selection_change(&self, grid_id: &str, rows: Vec<Row>) {
        tracing::trace!(grid_id, selected = rows.len(), "selection changed");
        self.session.set_selection(grid_id, rows);
    }

    /// Currently selected rows of a grid (empty if none).
    #[must_use]
    pub fn selected_rows(&self, grid_id: &str) -> Vec<Row> {
        self.session.selection(grid_id)
    }

    // =========================================================================
    // Outbound Commands
    // =========================================================================

    /// Scroll the named grid to a row and flash it.
    pub fn jump_to_row(&self, row_id: &str, grid_id: &str) {
        self.dispatch(GridCommand::JumpToRow {
            grid_id: grid_id.to_string(),
            row_id: row_id.to_string(),
        });
    }

    /// Force refresh of all cells in the named grid.
    pub fn refresh_grid(&self, grid_id: &str) {
        self.dispatch(GridCommand::Refresh {
            grid_id: grid_id.to_string(),
        });
    }

    /// Clear all column filters of the named grid.
    pub fn clear_filters(&self, grid_id: &str) {
        self.dispatch(GridCommand::ClearFilters {
            grid_id: grid_id.to_string(),
        });
    }

    /// Reset the named grid's columns to their default state.
    pub fn reset_column_state(&self, grid_id: &str) {
        self.dispatch(GridCommand::ResetColumnState {
            grid_id: grid_id.to_string(),
        });
    }

    /// Programmatically select rows in the named grid.
    pub fn select_rows(&self, row_ids: Vec<String>, grid_id: &str) {
        self.dispatch(GridCommand::SelectRows {
            grid_id: grid_id.to_string(),
            row_ids,
        });
    }

    /// Trigger an export of the named grid.
    pub fn export(&self, grid_id: &str, format: ExportFormat) {
        self.dispatch(GridCommand::Export {
            grid_id: grid_id.to_string(),
            format,
        });
    }

    fn dispatch(&self, command: GridCommand) {
        // Fire and forget: no receiver mounted is not an error
        let receivers = self.session.hub().send_command(command);
        tracing::trace!(receivers, "grid command dispatched");
    }
}

// =============================================================================
// Tests
// =============================================================================
