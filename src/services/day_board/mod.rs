//! Screen-level state for the day view.
//!
//! `DayBoard` owns the appointment collection, the roster, the active date
//! and the worker filter. It is mutated only through the named operations
//! below; move and resize are the only ones that change appointment times.

use chrono::{Duration, NaiveDate, NaiveTime};

use crate::error::{Result, SchedulerError};
use crate::models::appointment::Appointment;
use crate::models::settings::GridConfig;
use crate::models::worker::Worker;
use crate::services::appointment::AppointmentBook;
use crate::services::geometry::{CardGeometry, GeometryMapper, CARD_MARGIN};
use crate::services::placement::{DayBounds, PlacementResolver};
use crate::services::schedule::{self, Interval, ScheduleIndex};
use crate::utils::time::{format_hhmm, minutes_from_midnight, snap_nearest, time_from_minutes};

/// Maximum number of move/resize commits kept for undo
pub const UNDO_LIMIT: usize = 50;

/// Which card edge a resize gesture dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    /// Moves the start; the end stays put
    Top,
    /// Moves the end; the start stays put
    Bottom,
}

/// Result of a move or resize commit
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// The collection now holds `after` in place of `before`
    Applied {
        before: Appointment,
        after: Appointment,
    },
    /// No placement fit; the appointment is unchanged and the card springs back
    Rejected(Appointment),
}

impl CommitOutcome {
    /// The appointment as it stands after the commit
    pub fn appointment(&self) -> &Appointment {
        match self {
            CommitOutcome::Applied { after, .. } => after,
            CommitOutcome::Rejected(original) => original,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, CommitOutcome::Applied { .. })
    }
}

/// Request to move an appointment to a column and/or time.
///
/// When `start` is given it wins over `top_px`; an explicit `end` sets the
/// duration, otherwise the original duration is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveRequest {
    pub id: String,
    /// Index into the currently visible worker columns
    pub worker_index: usize,
    pub top_px: f32,
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
}

impl MoveRequest {
    pub fn from_pixels(id: impl Into<String>, worker_index: usize, top_px: f32) -> Self {
        Self {
            id: id.into(),
            worker_index,
            top_px,
            start: None,
            end: None,
        }
    }

    pub fn to_time(id: impl Into<String>, worker_index: usize, start: NaiveTime) -> Self {
        Self {
            id: id.into(),
            worker_index,
            top_px: 0.0,
            start: Some(start),
            end: None,
        }
    }
}

pub struct DayBoard {
    config: GridConfig,
    roster: Vec<Worker>,
    book: AppointmentBook,
    date: NaiveDate,
    worker_filter: Vec<String>,
    index: ScheduleIndex,
    undo_stack: Vec<(Appointment, Appointment)>,
}

impl DayBoard {
    pub fn new(
        config: GridConfig,
        roster: Vec<Worker>,
        appointments: Vec<Appointment>,
        date: NaiveDate,
    ) -> Result<Self> {
        config.validate().map_err(SchedulerError::InvalidConfig)?;
        for worker in &roster {
            worker.validate().map_err(SchedulerError::InvalidConfig)?;
        }

        let book = AppointmentBook::new(appointments);
        let index = ScheduleIndex::build(book.as_slice(), date);

        Ok(Self {
            config,
            roster,
            book,
            date,
            worker_filter: Vec::new(),
            index,
            undo_stack: Vec::new(),
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn roster(&self) -> &[Worker] {
        &self.roster
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn worker_filter(&self) -> &[String] {
        &self.worker_filter
    }

    pub fn book(&self) -> &AppointmentBook {
        &self.book
    }

    pub fn index(&self) -> &ScheduleIndex {
        &self.index
    }

    pub fn get(&self, id: &str) -> Option<&Appointment> {
        self.book.get(id)
    }

    /// Worker columns in roster order
    pub fn visible_workers(&self) -> Vec<&Worker> {
        schedule::visible_workers(&self.roster, &self.worker_filter)
    }

    pub fn visible_appointments(&self) -> Vec<&Appointment> {
        schedule::visible_appointments(
            self.book.as_slice(),
            self.date,
            &self.worker_filter,
            &self.roster,
        )
    }

    /// Column index of a worker among the visible columns
    pub fn column_of(&self, worker_name: &str) -> Option<usize> {
        self.visible_workers()
            .iter()
            .position(|worker| worker.name == worker_name)
    }

    pub fn go_to(&mut self, date: NaiveDate) {
        if self.date != date {
            self.date = date;
            self.rebuild_index();
        }
    }

    pub fn next_day(&mut self) {
        self.go_to(self.date + Duration::days(1));
    }

    pub fn previous_day(&mut self) {
        self.go_to(self.date - Duration::days(1));
    }

    pub fn set_worker_filter(&mut self, filter: Vec<String>) -> Result<()> {
        if let Some(unknown) = filter
            .iter()
            .find(|name| !self.roster.iter().any(|worker| &worker.name == *name))
        {
            return Err(SchedulerError::unknown_worker(unknown.clone()));
        }
        self.worker_filter = filter;
        self.rebuild_index();
        Ok(())
    }

    /// Add or remove one worker from the filter
    pub fn toggle_worker(&mut self, name: &str) -> Result<()> {
        let mut filter = self.worker_filter.clone();
        if let Some(pos) = filter.iter().position(|existing| existing == name) {
            filter.remove(pos);
        } else {
            filter.push(name.to_string());
        }
        self.set_worker_filter(filter)
    }

    pub fn clear_filter(&mut self) {
        self.worker_filter.clear();
        self.rebuild_index();
    }

    /// Move an appointment to another column and/or start time.
    ///
    /// Conflicts are pushed right past the blocking booking; a move that runs
    /// past the end of the day is rejected and leaves the collection as is.
    pub fn on_move(&mut self, request: MoveRequest) -> Result<CommitOutcome> {
        let original = self
            .book
            .get(&request.id)
            .cloned()
            .ok_or_else(|| {
                log::warn!("Move requested for unknown appointment {}", request.id);
                SchedulerError::unknown_appointment(request.id.clone())
            })?;

        let worker_name = self
            .visible_workers()
            .get(request.worker_index)
            .map(|worker| worker.name.clone())
            .ok_or_else(|| SchedulerError::unknown_worker(format!("column {}", request.worker_index)))?;

        let bounds = DayBounds::from_config(&self.config);
        let mapper = GeometryMapper::new(&self.config);

        let desired_start = match request.start {
            Some(start) => snap_nearest(minutes_from_midnight(start), bounds.start, bounds.slot),
            None => mapper.top_to_minutes(request.top_px),
        };
        let raw_duration = match (request.start, request.end) {
            (Some(start), Some(end)) => minutes_from_midnight(end) - minutes_from_midnight(start),
            _ => original.duration_minutes(),
        };
        let duration = whole_slots(raw_duration, bounds.slot);

        let occupied = self.occupied_for(&original, &worker_name);
        let resolver = PlacementResolver::new(bounds, &occupied);

        match resolver.resolve_move(desired_start, duration) {
            Some(placement) => {
                let updated = original
                    .with_worker(worker_name)
                    .with_times(time_from_minutes(placement.start)?, time_from_minutes(placement.end)?);
                self.apply(original, updated)
            }
            None => {
                log::debug!(
                    "Move of {} to {} rejected: no room before day end",
                    original.id,
                    format_hhmm(time_from_minutes(desired_start.max(bounds.start))?)
                );
                Ok(CommitOutcome::Rejected(original))
            }
        }
    }

    /// Resize an appointment to a new range on its current worker.
    ///
    /// The range is snapped to the slot grid; an end past the day boundary is
    /// trimmed rather than rejected.
    pub fn on_resize(&mut self, id: &str, new_start: NaiveTime, new_end: NaiveTime) -> Result<CommitOutcome> {
        let original = self
            .book
            .get(id)
            .cloned()
            .ok_or_else(|| {
                log::warn!("Resize requested for unknown appointment {}", id);
                SchedulerError::unknown_appointment(id)
            })?;

        if new_end <= new_start {
            log::debug!(
                "Resize of {} to {}-{} rejected: end not after start",
                original.id,
                format_hhmm(new_start),
                format_hhmm(new_end)
            );
            return Ok(CommitOutcome::Rejected(original));
        }

        let bounds = DayBounds::from_config(&self.config);
        let start = snap_nearest(minutes_from_midnight(new_start), bounds.start, bounds.slot);
        let end = start
            + whole_slots(
                minutes_from_midnight(new_end) - minutes_from_midnight(new_start),
                bounds.slot,
            );

        self.resize_minutes(original, start, end)
    }

    /// Resize from a dragged card's pixel geometry.
    ///
    /// Only the dragged edge changes: a top-handle drag keeps the original
    /// end, a bottom-handle drag keeps the original start. The rendered
    /// height excludes `CARD_MARGIN`, so it is added back before snapping.
    pub fn on_resize_edge(
        &mut self,
        id: &str,
        edge: ResizeEdge,
        geometry: CardGeometry,
    ) -> Result<CommitOutcome> {
        let original = self
            .book
            .get(id)
            .cloned()
            .ok_or_else(|| SchedulerError::unknown_appointment(id))?;

        let bounds = DayBounds::from_config(&self.config);
        let mapper = GeometryMapper::new(&self.config);
        let (start, end) = match edge {
            ResizeEdge::Top => (
                mapper.top_to_minutes(geometry.top),
                snap_nearest(original.end_minutes(), bounds.start, bounds.slot),
            ),
            ResizeEdge::Bottom => {
                let start = snap_nearest(original.start_minutes(), bounds.start, bounds.slot);
                (start, start + mapper.height_to_duration(geometry.height + CARD_MARGIN))
            }
        };

        if end <= start {
            log::debug!("Resize of {} rejected: top handle dragged past the end", original.id);
            return Ok(CommitOutcome::Rejected(original));
        }
        self.resize_minutes(original, start, end)
    }

    /// Delete an appointment (outside the move/resize path)
    pub fn delete(&mut self, id: &str) -> Result<Appointment> {
        let removed = self.book.remove(id)?;
        self.undo_stack
            .retain(|(before, _)| before.id != removed.id);
        self.rebuild_index();
        log::info!("Deleted appointment {}", removed.id);
        Ok(removed)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Revert the most recent applied move or resize
    pub fn undo(&mut self) -> Option<Appointment> {
        let (before, _after) = self.undo_stack.pop()?;
        match self.book.replace(before.clone()) {
            Ok(_) => {
                self.rebuild_index();
                log::info!("Undid change to appointment {}", before.id);
                Some(before)
            }
            Err(err) => {
                log::warn!("Undo skipped: {}", err);
                None
            }
        }
    }

    fn resize_minutes(&mut self, original: Appointment, start: i32, end: i32) -> Result<CommitOutcome> {
        let bounds = DayBounds::from_config(&self.config);
        let occupied = self.occupied_for(&original, &original.worker_name);
        let resolver = PlacementResolver::new(bounds, &occupied);

        match resolver.resolve_resize(start, end) {
            Some(placement) => {
                let updated = original
                    .with_times(time_from_minutes(placement.start)?, time_from_minutes(placement.end)?);
                self.apply(original, updated)
            }
            None => {
                log::debug!("Resize of {} rejected: no room before day end", original.id);
                Ok(CommitOutcome::Rejected(original))
            }
        }
    }

    /// Other bookings of `worker_name` on the appointment's own day
    fn occupied_for(&self, appointment: &Appointment, worker_name: &str) -> Vec<Interval> {
        if self.index.date() == Some(appointment.date) {
            self.index.intervals_for(worker_name, &appointment.id)
        } else {
            ScheduleIndex::build(self.book.as_slice(), appointment.date)
                .intervals_for(worker_name, &appointment.id)
        }
    }

    fn apply(&mut self, before: Appointment, after: Appointment) -> Result<CommitOutcome> {
        if before != after {
            self.book.replace(after.clone())?;
            self.rebuild_index();
            self.undo_stack.push((before.clone(), after.clone()));
            if self.undo_stack.len() > UNDO_LIMIT {
                self.undo_stack.remove(0);
            }
            log::info!(
                "Committed {} -> {} {}-{}",
                after.id,
                after.worker_name,
                format_hhmm(after.start),
                format_hhmm(after.end)
            );
        }
        Ok(CommitOutcome::Applied { before, after })
    }

    fn rebuild_index(&mut self) {
        self.index = ScheduleIndex::build(self.book.as_slice(), self.date);
    }
}

/// Round a duration to whole slots, never below one slot
fn whole_slots(minutes: i32, slot: i32) -> i32 {
    let slots = (minutes as f32 / slot as f32).round() as i32;
    slots.max(1) * slot
}
