// Property-based tests for push-right placement
// Random drops and resizes must never double-book a worker or leave the slot grid

#[path = "../fixtures/mod.rs"]
mod fixtures;

use fixtures::{overlapping_pairs, seeded_board};
use proptest::prelude::*;
use salon_scheduler::services::day_board::{CommitOutcome, DayBoard, MoveRequest, ResizeEdge};
use salon_scheduler::services::geometry::{CardGeometry, GeometryMapper};
use salon_scheduler::services::placement::{DayBounds, PlacementResolver};
use salon_scheduler::services::schedule::Interval;
use salon_scheduler::utils::time::time_from_minutes;

const DAY: DayBounds = DayBounds {
    start: 9 * 60,
    end: 18 * 60,
    slot: 15,
};

/// Up to six disjoint, slot-aligned busy blocks
fn busy_blocks() -> impl Strategy<Value = Vec<Interval>> {
    prop::collection::vec((0i32..36, 1i32..8), 0..6).prop_map(|raw| {
        let mut blocks: Vec<Interval> = Vec::new();
        for (slot, length) in raw {
            let start = DAY.start + slot * DAY.slot;
            let end = (start + length * DAY.slot).min(DAY.end);
            let candidate = Interval::new(start, end);
            if !blocks.iter().any(|b| b.overlaps(&candidate)) {
                blocks.push(candidate);
            }
        }
        blocks.sort();
        blocks
    })
}

proptest! {
    /// A placement is either inside the day, aligned and conflict-free, or absent
    #[test]
    fn prop_resolved_move_is_free_and_aligned(
        occupied in busy_blocks(),
        desired_slot in 0i32..36,
        slots in 1i32..12,
    ) {
        let desired = DAY.start + desired_slot * DAY.slot;
        let duration = slots * DAY.slot;
        let resolver = PlacementResolver::new(DAY, &occupied);

        if let Some(placed) = resolver.resolve_move(desired, duration) {
            prop_assert!(placed.start >= desired);
            prop_assert!(placed.end <= DAY.end);
            prop_assert_eq!(placed.duration(), duration);
            prop_assert!(DAY.is_aligned(placed.start));
            prop_assert!(occupied.iter().all(|busy| !placed.overlaps(busy)));
        }
    }

    /// The first free gap at or after the desired start is the one chosen
    #[test]
    fn prop_no_earlier_gap_is_skipped(
        occupied in busy_blocks(),
        desired_slot in 0i32..36,
        slots in 1i32..6,
    ) {
        let desired = DAY.start + desired_slot * DAY.slot;
        let duration = slots * DAY.slot;
        let resolver = PlacementResolver::new(DAY, &occupied);

        if let Some(placed) = resolver.resolve_move(desired, duration) {
            let mut start = desired;
            while start < placed.start {
                let candidate = Interval::new(start, start + duration);
                prop_assert!(occupied.iter().any(|busy| candidate.overlaps(busy)));
                start += DAY.slot;
            }
        }
    }

    /// Resizes never run past the end of the day
    #[test]
    fn prop_resize_stays_inside_day(
        occupied in busy_blocks(),
        desired_slot in 0i32..36,
        slots in 1i32..40,
    ) {
        let desired = DAY.start + desired_slot * DAY.slot;
        let resolver = PlacementResolver::new(DAY, &occupied);

        if let Some(placed) = resolver.resolve_resize(desired, desired + slots * DAY.slot) {
            prop_assert!(placed.end <= DAY.end);
            prop_assert!(placed.duration() > 0);
            prop_assert!(occupied.iter().all(|busy| !placed.overlaps(busy)));
        }
    }

    /// Any sequence of drops and handle drags keeps the seeded day free of double bookings
    #[test]
    fn prop_board_edits_never_double_book(
        edits in prop::collection::vec((0usize..9, board_edit()), 1..24),
    ) {
        let mut board = seeded_board();
        let ids: Vec<String> = board.book().as_slice().iter().map(|a| a.id.clone()).collect();

        for (which, edit) in edits {
            let before = board.book().as_slice().to_vec();
            let outcome = apply_edit(&mut board, &ids[which], edit);

            if outcome.is_applied() {
                let changed = outcome.appointment();
                prop_assert!(DAY.is_aligned(changed.start_minutes()));
                prop_assert!(changed.start_minutes() >= DAY.start);
                prop_assert!(changed.end_minutes() <= DAY.end);
                prop_assert!(changed.duration_minutes() > 0);
                prop_assert_eq!(changed.duration_minutes() % DAY.slot, 0);
            } else {
                prop_assert_eq!(board.book().as_slice(), &before[..]);
            }
            prop_assert!(overlapping_pairs(&board).is_empty());
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum BoardEdit {
    Drop { column: usize, top: f32 },
    TopHandle(f32),
    BottomHandle(f32),
    Retime { start_slot: i32, end_slot: i32 },
}

fn board_edit() -> impl Strategy<Value = BoardEdit> {
    prop_oneof![
        (0usize..3, 0.0f32..1400.0).prop_map(|(column, top)| BoardEdit::Drop { column, top }),
        (-400.0f32..400.0).prop_map(BoardEdit::TopHandle),
        (-400.0f32..400.0).prop_map(BoardEdit::BottomHandle),
        (0i32..36, 0i32..37).prop_map(|(start_slot, end_slot)| BoardEdit::Retime { start_slot, end_slot }),
    ]
}

/// Drive one edit through the same entry points the day view uses
fn apply_edit(board: &mut DayBoard, id: &str, edit: BoardEdit) -> CommitOutcome {
    let current = board.get(id).unwrap().clone();
    let card = GeometryMapper::new(board.config()).time_range_to_geometry(current.start, current.end);

    match edit {
        BoardEdit::Drop { column, top } => board.on_move(MoveRequest::from_pixels(id, column, top)),
        BoardEdit::TopHandle(dy) => board.on_resize_edge(
            id,
            ResizeEdge::Top,
            CardGeometry::new(card.top + dy, (card.height - dy).max(0.0)),
        ),
        BoardEdit::BottomHandle(dy) => board.on_resize_edge(
            id,
            ResizeEdge::Bottom,
            CardGeometry::new(card.top, (card.height + dy).max(0.0)),
        ),
        BoardEdit::Retime { start_slot, end_slot } => board.on_resize(
            id,
            time_from_minutes(DAY.start + start_slot * DAY.slot).unwrap(),
            time_from_minutes(DAY.start + end_slot * DAY.slot).unwrap(),
        ),
    }
    .unwrap()
}
