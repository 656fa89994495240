//! Push-right placement of an appointment on one worker's timeline.
//!
//! Given a desired `[start, end)` and the worker's other bookings, finds the
//! nearest slot-aligned placement at or after the desired start that overlaps
//! nothing, or reports that none exists before the end of the day.

use crate::models::settings::GridConfig;
use crate::services::schedule::Interval;
use crate::utils::time::snap_up;

/// Upper bound on push-right steps; each step strictly advances the start.
pub const MAX_PLACEMENT_ITERATIONS: usize = 100;

/// What to do when the placement runs past the end of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Give up; the card springs back (moves)
    Reject,
    /// Trim the end to the day boundary on the first pass (resizes)
    Shrink,
}

/// Day window and slot grid the resolver works on, in minutes since midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBounds {
    pub start: i32,
    pub end: i32,
    pub slot: i32,
}

impl DayBounds {
    pub fn from_config(config: &GridConfig) -> Self {
        Self {
            start: config.day_start_minutes(),
            end: config.day_end_minutes(),
            slot: config.slot_minutes as i32,
        }
    }

    /// True when `minutes` sits on a grid line
    pub fn is_aligned(&self, minutes: i32) -> bool {
        (minutes - self.start).rem_euclid(self.slot) == 0
    }
}

/// Resolves placements against one worker's occupied intervals.
pub struct PlacementResolver<'a> {
    bounds: DayBounds,
    occupied: &'a [Interval],
}

impl<'a> PlacementResolver<'a> {
    /// `occupied` must be sorted by start and exclude the appointment being placed.
    pub fn new(bounds: DayBounds, occupied: &'a [Interval]) -> Self {
        Self { bounds, occupied }
    }

    /// Place an appointment of `duration` minutes at or after `desired_start`.
    pub fn resolve_move(&self, desired_start: i32, duration: i32) -> Option<Interval> {
        self.resolve(
            desired_start,
            desired_start + duration,
            OverflowPolicy::Reject,
        )
    }

    /// Place a resized appointment; the end may be trimmed to the day boundary.
    pub fn resolve_resize(&self, desired_start: i32, desired_end: i32) -> Option<Interval> {
        self.resolve(desired_start, desired_end, OverflowPolicy::Shrink)
    }

    /// Run the push-right search.
    ///
    /// Returns `None` when no placement fits before the day ends or the
    /// iteration budget is exhausted.
    pub fn resolve(
        &self,
        desired_start: i32,
        desired_end: i32,
        policy: OverflowPolicy,
    ) -> Option<Interval> {
        let bounds = self.bounds;
        let mut duration = desired_end - desired_start;
        if duration <= 0 {
            return None;
        }

        let mut start = desired_start.max(bounds.start);
        let mut end = start + duration;

        if end > bounds.end {
            match policy {
                OverflowPolicy::Reject => return None,
                OverflowPolicy::Shrink => {
                    end = bounds.end;
                    duration = end - start;
                    if duration <= 0 {
                        return None;
                    }
                }
            }
        }

        for _ in 0..MAX_PLACEMENT_ITERATIONS {
            let candidate = Interval::new(start, end);
            let blocker = self.occupied.iter().find(|busy| candidate.overlaps(busy));

            let Some(blocker) = blocker else {
                return Some(candidate);
            };

            start = snap_up(blocker.end, bounds.start, bounds.slot);
            end = start + duration;

            if end > bounds.end {
                return None;
            }
        }

        log::debug!(
            "Placement search exhausted {} iterations at {}",
            MAX_PLACEMENT_ITERATIONS,
            start
        );
        None
    }
}
