// Integration tests for the day board and settings persistence
mod fixtures;

use fixtures::{appointment, board_with, hhmm, overlapping_pairs, salon_day, seeded_board, t};
use pretty_assertions::assert_eq;
use salon_scheduler::models::settings::Settings;
use salon_scheduler::services::day_board::{CommitOutcome, DayBoard, MoveRequest};
use salon_scheduler::services::seed::{default_roster, load_appointments_json, sample_day};
use salon_scheduler::services::settings::SettingsService;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_settings_persistence() {
    let dir = TempDir::new().unwrap();
    let service = SettingsService::new(dir.path().join("nested").join("settings.toml"));

    // First launch: nothing on disk yet
    let mut settings = service.get().expect("Failed to get settings");
    assert_eq!(settings, Settings::default());

    settings.theme = "dark".to_string();
    settings.time_format = "12h".to_string();
    settings.grid.slot_pixel_height = 40.0;
    service.save(&settings).expect("Failed to save settings");

    let loaded = service.get().expect("Failed to load settings");
    assert_eq!(loaded, settings);
}

#[test]
fn test_invalid_settings_are_not_written() {
    let dir = TempDir::new().unwrap();
    let service = SettingsService::new(dir.path().join("settings.toml"));

    let mut settings = Settings::default();
    settings.grid.slot_minutes = 7;
    assert!(service.save(&settings).is_err());
    assert!(!service.path().exists());
}

#[test]
fn test_corrupt_settings_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "grid = 12").unwrap();

    let service = SettingsService::new(&path);
    assert!(service.get().is_err());
    assert_eq!(service.get_or_default(), Settings::default());
}

#[test]
fn test_board_uses_loaded_grid() {
    let dir = TempDir::new().unwrap();
    let service = SettingsService::new(dir.path().join("settings.toml"));
    let mut settings = Settings::default();
    settings.grid.start_hour = 8;
    settings.grid.end_hour = 20;
    service.save(&settings).unwrap();

    let grid = service.get().unwrap().grid;
    let mut board = DayBoard::new(grid, default_roster(), vec![appointment("a", "Norma", "09:00", "09:30")], salon_day()).unwrap();

    // 08:00 is inside the widened day
    let outcome = board.on_move(MoveRequest::to_time("a", 0, t("08:00"))).unwrap();
    assert_eq!(hhmm(outcome.appointment().start), "08:00");

    // 19:30-20:00 fits, 20:00 does not
    assert!(board.on_move(MoveRequest::to_time("a", 0, t("19:30"))).unwrap().is_applied());
    assert!(!board.on_move(MoveRequest::to_time("a", 0, t("20:00"))).unwrap().is_applied());
}

#[test]
fn test_seed_day_is_consistent() {
    let board = seeded_board();
    assert_eq!(board.book().len(), 9);
    assert!(overlapping_pairs(&board).is_empty());
    assert_eq!(board.index().load_of("Norma"), 3);
    assert_eq!(board.index().load_of("Lucía"), 3);
    assert_eq!(board.index().load_of("Marco"), 3);
}

#[test]
fn test_seed_move_pushes_past_colour_booking() {
    let mut board = seeded_board();

    // Norma's beard trim dropped on 10:30 lands after the colour (10:00-12:00)
    let outcome = board.on_move(MoveRequest::to_time("apt-003", 0, t("10:30"))).unwrap();
    let moved = outcome.appointment();
    assert_eq!((hhmm(moved.start), hhmm(moved.end)), ("12:00".to_string(), "12:30".to_string()));
    assert!(overlapping_pairs(&board).is_empty());
}

#[test]
fn test_cross_worker_move_reassigns_service_lines() {
    let mut board = seeded_board();

    let outcome = board.on_move(MoveRequest::to_time("apt-001", 2, t("10:00"))).unwrap();
    let moved = outcome.appointment();
    assert_eq!(moved.worker_name, "Marco");
    assert!(moved.line_items.iter().all(|line| line.assigned_worker == "Marco"));
    assert_eq!(board.index().load_of("Norma"), 2);
    assert_eq!(board.index().load_of("Marco"), 4);
}

#[test]
fn test_rejected_move_then_undo_history() {
    let mut board = board_with(vec![
        appointment("a", "Norma", "10:00", "11:00"),
        appointment("b", "Norma", "16:30", "18:00"),
    ]);

    let rejected = board.on_move(MoveRequest::to_time("a", 0, t("16:00"))).unwrap();
    assert!(matches!(rejected, CommitOutcome::Rejected(_)));
    assert!(!board.can_undo());

    board.on_resize("a", t("10:00"), t("12:00")).unwrap();
    board.on_move(MoveRequest::to_time("a", 1, t("13:00"))).unwrap();

    let restored = board.undo().unwrap();
    assert_eq!(restored.worker_name, "Norma");
    assert_eq!(hhmm(restored.end), "12:00");
    let restored = board.undo().unwrap();
    assert_eq!(hhmm(restored.end), "11:00");
    assert!(board.undo().is_none());
}

#[test]
fn test_filter_hides_columns_but_keeps_collisions() {
    let mut board = board_with(vec![
        appointment("a", "Norma", "10:00", "10:30"),
        appointment("b", "Marco", "10:00", "11:00"),
    ]);
    board.set_worker_filter(vec!["Norma".to_string()]).unwrap();
    assert_eq!(board.visible_appointments().len(), 1);

    board.clear_filter();
    let outcome = board.on_move(MoveRequest::to_time("a", 2, t("10:00"))).unwrap();
    assert_eq!(hhmm(outcome.appointment().start), "11:00");
}

#[test]
fn test_load_appointments_from_json() {
    let appointments = sample_day(salon_day()).unwrap();
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string(&appointments).unwrap().as_bytes())
        .unwrap();

    let loaded = load_appointments_json(file.path()).unwrap();
    assert_eq!(loaded, appointments);
    assert_eq!(hhmm(loaded[0].start), "09:00");
}
