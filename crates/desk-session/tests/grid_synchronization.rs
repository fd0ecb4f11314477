//! Grid Synchronization Integration Tests
//!
//! Exercises the grid layer over a realistic session: service-seeded
//! feeds, targeted row patches, selection tracking, and fire-and-forget
//! commands flowing through the hub.

use desk_data::{CellValue, NotificationService, PositionService, Row};
use desk_session::{
    CellEdit, DashboardConfig, ExportFormat, GridCommand, GridSync, Session,
};
use rust_decimal::Decimal;

fn positions_session() -> (Session, GridSync) {
    let session = Session::new(&DashboardConfig::default());
    session.load_feed("positions", PositionService::new().positions());
    let sync = GridSync::new(&session);
    (session, sync)
}

#[test]
fn patching_one_position_leaves_the_rest_untouched() {
    let (session, sync) = positions_session();
    let before = session.snapshot("positions").unwrap();
    assert_eq!(before.len(), 10);

    let updates = Row::new()
        .with("price", Decimal::new(123_45, 2))
        .with("flagged", true);
    assert!(sync.update_row_by_id("positions", "TKR3", &updates, "ticker"));

    let after = session.snapshot("positions").unwrap();
    assert_eq!(after.len(), 10);
    for (old, new) in before.iter().zip(after.iter()) {
        if new.text("ticker") == Some("TKR3") {
            assert_eq!(new.number("price"), Some(Decimal::new(123_45, 2)));
            assert_eq!(new.flag("flagged"), Some(true));
            // Untouched fields survive the shallow merge
            assert_eq!(new.text("sec_type"), old.text("sec_type"));
        } else {
            assert_eq!(old, new);
        }
    }
}

#[test]
fn patch_miss_is_silent() {
    let (session, sync) = positions_session();
    let before = session.snapshot("positions").unwrap();

    let updates = Row::new().with("price", Decimal::ONE);
    assert!(!sync.update_row_by_id("positions", "UNKNOWN", &updates, "ticker"));
    assert!(!sync.update_row_by_id("ghost_feed", "TKR3", &updates, "ticker"));

    assert_eq!(*session.snapshot("positions").unwrap(), *before);
}

#[test]
fn lookup_by_identity_field() {
    let (_session, sync) = positions_session();

    let row = sync.get_row_by_id("positions", "TKR7", "ticker").unwrap();
    assert_eq!(row.text("ticker"), Some("TKR7"));

    assert!(sync.get_row_by_id("positions", "TKR99", "ticker").is_none());
}

#[test]
fn cell_edit_flows_into_the_snapshot() {
    let (_session, sync) = positions_session();

    let edit = CellEdit {
        collection: "positions".to_string(),
        row_id: "TKR1".to_string(),
        field: "price".to_string(),
        old_value: None,
        new_value: CellValue::Number(Decimal::new(777_00, 2)),
        id_field: "ticker".to_string(),
    };
    assert!(sync.apply_cell_edit(&edit));

    let row = sync.get_row_by_id("positions", "TKR1", "ticker").unwrap();
    assert_eq!(row.number("price"), Some(Decimal::new(777_00, 2)));
}

#[test]
fn selection_replacement_is_wholesale_per_grid() {
    let (_session, sync) = positions_session();

    sync.handle_selection_change(
        "positions_grid",
        vec![
            Row::new().with("ticker", "TKR1"),
            Row::new().with("ticker", "TKR2"),
        ],
    );
    sync.handle_selection_change("positions_grid", vec![Row::new().with("ticker", "TKR9")]);
    sync.handle_selection_change("risk_grid", vec![Row::new().with("metric", "Beta")]);

    let selected = sync.selected_rows("positions_grid");
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].text("ticker"), Some("TKR9"));
    assert_eq!(sync.selected_rows("risk_grid").len(), 1);
    assert!(sync.selected_rows("unmounted_grid").is_empty());
}

#[test]
fn notification_jump_reaches_its_target_grid() {
    let (session, sync) = positions_session();
    let mut rx = session.hub().commands_rx();

    // A notification carries the grid and row it points at
    let notifications = NotificationService::new().notifications();
    let first = &notifications[0];
    sync.jump_to_row(&first.row_id, &first.grid_id);

    let command = rx.try_recv().unwrap();
    match command {
        GridCommand::JumpToRow { grid_id, row_id } => {
            assert_eq!(grid_id, first.grid_id);
            assert_eq!(row_id, first.row_id);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn commands_without_receivers_are_dropped_silently() {
    let (_session, sync) = positions_session();

    // No grid mounted anywhere: none of these may panic or error
    sync.jump_to_row("TKR3", "positions_grid");
    sync.refresh_grid("positions_grid");
    sync.clear_filters("positions_grid");
    sync.reset_column_state("positions_grid");
    sync.select_rows(vec!["TKR1".to_string()], "positions_grid");
    sync.export("positions_grid", ExportFormat::Csv);
}

#[test]
fn receiver_can_filter_commands_by_grid_id() {
    let (session, sync) = positions_session();
    let mut rx = session.hub().commands_rx();

    sync.refresh_grid("positions_grid");
    sync.refresh_grid("risk_grid");
    sync.export("positions_grid", ExportFormat::Excel);

    let mut for_positions = Vec::new();
    while let Ok(command) = rx.try_recv() {
        if command.grid_id() == "positions_grid" {
            for_positions.push(command);
        }
    }

    assert_eq!(for_positions.len(), 2);
    assert!(matches!(
        for_positions[1],
        GridCommand::Export {
            format: ExportFormat::Excel,
            ..
        }
    ));
}
