// End-to-end gesture scenarios
// Drives the drag controller like the day view does and commits into a board

#[path = "../fixtures/mod.rs"]
mod fixtures;

use std::time::{Duration, Instant};

use egui::Pos2;
use fixtures::{appointment, board_with, hhmm};
use mockall::mock;
use pretty_assertions::assert_eq;
use salon_scheduler::services::day_board::{CommitOutcome, DayBoard};
use salon_scheduler::services::geometry::{CardGeometry, GeometryMapper};
use salon_scheduler::ui_egui::active_editor::ActiveEditor;
use salon_scheduler::ui_egui::animation::{spring_back, Animation, TweenTarget};
use salon_scheduler::ui_egui::drag::{DragGestureController, DragMode, ViewportBand, LONG_PRESS};
use salon_scheduler::ui_egui::haptics::{HapticError, HapticFeedback, ImpactStyle, NoHaptics};
use salon_scheduler::ui_egui::resize::CardRegion;
use salon_scheduler::ui_egui::scroll_sync::{ScrollChannel, ScrollSynchronizer};
use salon_scheduler::ui_egui::views::commit_release;

mock! {
    pub Haptics {}
    impl HapticFeedback for Haptics {
        fn impact(&self, style: ImpactStyle) -> Result<(), HapticError>;
    }
}

const COLUMN_WIDTH: f32 = 250.0;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn band() -> ViewportBand {
    ViewportBand { top: 0.0, bottom: 600.0 }
}

/// Norma 10:00-10:30 and Lucía 10:00-11:00
fn board() -> DayBoard {
    board_with(vec![
        appointment("a", "Norma", "10:00", "10:30"),
        appointment("b", "Lucía", "10:00", "11:00"),
    ])
}

fn geometry_of(board: &DayBoard, id: &str) -> CardGeometry {
    let appt = board.get(id).unwrap();
    GeometryMapper::new(board.config()).time_range_to_geometry(appt.start, appt.end)
}

/// Long-press `id` at `pos` and return its armed controller
fn arm(board: &DayBoard, id: &str, pos: Pos2, t0: Instant, editor: &mut ActiveEditor) -> DragGestureController {
    let mut controller = DragGestureController::new(id, board.config());
    controller.pointer_down(pos, CardRegion::Body, geometry_of(board, id), t0);
    assert!(controller.tick(t0 + LONG_PRESS, editor, &NoHaptics).armed);
    controller
}

#[test]
fn test_long_press_drag_across_columns() {
    let t0 = Instant::now();
    let mut board = board();
    let mut editor = ActiveEditor::new();
    let mut haptics = MockHaptics::new();
    haptics
        .expect_impact()
        .withf(|style| *style == ImpactStyle::Medium)
        .times(1)
        .returning(|_| Ok(()));

    let mut controller = DragGestureController::new("a", board.config());
    controller.pointer_down(Pos2::new(100.0, 150.0), CardRegion::Body, geometry_of(&board, "a"), t0);
    let armed = controller.tick(t0 + ms(520), &mut editor, &haptics);
    assert!(armed.armed);
    assert!(editor.is_editing("a"));

    // One column right, one slot down
    let moved = controller.pointer_move(Pos2::new(360.0, 185.0), band(), t0 + ms(600));
    assert_eq!(moved.drag_state_changed, Some(true));
    assert_eq!(moved.preview.map(|g| g.top), Some(175.0));

    let released = controller.pointer_up(t0 + ms(700), &mut editor);
    assert_eq!(released.drag_state_changed, Some(false));
    let release = released.release.unwrap();
    assert_eq!(release.mode, DragMode::Move);

    let outcome = commit_release(&mut board, "a", release, 0, COLUMN_WIDTH).unwrap();
    let moved = outcome.appointment();
    // Lucía is busy 10:00-11:00, so 10:15 is pushed to 11:00
    assert_eq!(moved.worker_name, "Lucía");
    assert_eq!((hhmm(moved.start), hhmm(moved.end)), ("11:00".to_string(), "11:30".to_string()));
    assert_eq!(editor.active_id(), None);
}

#[test]
fn test_resize_from_bottom_handle() {
    let t0 = Instant::now();
    let mut board = board();
    let mut editor = ActiveEditor::new();
    let mut controller = arm(&board, "a", Pos2::new(100.0, 150.0), t0, &mut editor);
    controller.pointer_up(t0 + ms(550), &mut editor);
    assert!(controller.is_editing());

    controller.pointer_down(Pos2::new(100.0, 204.0), CardRegion::BottomHandle, geometry_of(&board, "a"), t0 + ms(900));
    controller.pointer_move(Pos2::new(100.0, 274.0), band(), t0 + ms(950));
    let release = controller.pointer_up(t0 + ms(1_000), &mut editor).release.unwrap();
    assert_eq!(release.mode, DragMode::ResizeBottom);

    let outcome = commit_release(&mut board, "a", release, 0, COLUMN_WIDTH).unwrap();
    assert!(outcome.is_applied());
    assert_eq!(hhmm(outcome.appointment().end), "11:00");
    assert!(board.can_undo());
}

#[test]
fn test_drop_past_day_end_springs_back() {
    let t0 = Instant::now();
    let mut board = board();
    let mut editor = ActiveEditor::new();
    let mut controller = arm(&board, "a", Pos2::new(100.0, 150.0), t0, &mut editor);

    controller.pointer_move(Pos2::new(100.0, 1_250.0), ViewportBand { top: 0.0, bottom: 1_260.0 }, t0 + ms(600));
    let release = controller.pointer_up(t0 + ms(700), &mut editor).release.unwrap();
    let before = board.book().as_slice().to_vec();

    let outcome = commit_release(&mut board, "a", release, 0, COLUMN_WIDTH).unwrap();
    assert!(matches!(outcome, CommitOutcome::Rejected(_)));
    assert_eq!(board.book().as_slice(), &before[..]);

    let animation = Animation::start(
        spring_back(release.geometry, release.original, release.column_offset),
        t0 + ms(700),
    );
    assert_eq!(animation.value(TweenTarget::CardTop, t0 + ms(700)), Some(release.geometry.top));
    assert_eq!(animation.value(TweenTarget::CardTop, t0 + ms(900)), Some(release.original.top));
    assert!(animation.is_finished(t0 + ms(900)));
}

#[test]
fn test_arming_second_card_cancels_first() {
    let t0 = Instant::now();
    let board = board();
    let mut editor = ActiveEditor::new();
    let mut first = arm(&board, "a", Pos2::new(100.0, 150.0), t0, &mut editor);
    first.pointer_up(t0 + ms(550), &mut editor);

    let mut second = DragGestureController::new("b", board.config());
    second.pointer_down(Pos2::new(360.0, 150.0), CardRegion::Body, geometry_of(&board, "b"), t0 + ms(1_000));
    let response = second.tick(t0 + ms(1_000) + LONG_PRESS, &mut editor, &NoHaptics);
    assert_eq!(response.displaced.as_deref(), Some("a"));
    assert!(editor.is_editing("b"));

    let cancelled = first.tick(t0 + ms(1_600), &mut editor, &NoHaptics);
    assert!(cancelled.disarmed);
    assert!(!first.is_editing());
    assert!(first.pointer_up(t0 + ms(1_700), &mut editor).release.is_none());
}

#[test]
fn test_edge_drag_scrolls_both_vertical_panes() {
    let t0 = Instant::now();
    let board = board();
    let mut editor = ActiveEditor::new();
    let mut sync = ScrollSynchronizer::new();
    let mut controller = arm(&board, "a", Pos2::new(100.0, 150.0), t0, &mut editor);

    // Viewport shows content 0..400; pointer 10px from its bottom edge
    let response = controller.pointer_move(Pos2::new(100.0, 390.0), ViewportBand { top: 0.0, bottom: 400.0 }, t0 + ms(600));
    assert!(response.auto_scroll > 0.0);
    sync.request_auto_scroll(response.auto_scroll);

    let commands = sync.flush_frame(t0 + ms(616), board.config().content_height(), 400.0);
    let channels: Vec<ScrollChannel> = commands.iter().map(|c| c.channel).collect();
    assert_eq!(channels, vec![ScrollChannel::ContentVertical, ScrollChannel::TimeColumn]);

    // The panes echo the programmatic offset next frame without bouncing back
    let offset = commands[0].offset;
    assert_eq!(sync.on_scroll(ScrollChannel::ContentVertical, offset, t0 + ms(632)), None);
    assert_eq!(sync.on_scroll(ScrollChannel::TimeColumn, offset, t0 + ms(632)), None);
}
