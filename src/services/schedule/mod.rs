//! Day/worker visibility filtering and per-worker interval lookup.
//!
//! The index is rebuilt whenever the appointment collection, the active date
//! or the worker filter changes; it is cheap and holds no references.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::models::appointment::Appointment;
use crate::models::worker::Worker;

/// Half-open `[start, end)` range in minutes since midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval {
    pub start: i32,
    pub end: i32,
}

impl Interval {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn of(appointment: &Appointment) -> Self {
        Self::new(appointment.start_minutes(), appointment.end_minutes())
    }

    pub fn duration(&self) -> i32 {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Workers whose column is shown. An empty filter means every worker, not none.
pub fn visible_workers<'a>(roster: &'a [Worker], worker_filter: &[String]) -> Vec<&'a Worker> {
    roster
        .iter()
        .filter(|worker| worker_filter.is_empty() || worker_filter.contains(&worker.name))
        .collect()
}

/// Appointments on `date` that belong to a visible worker column.
pub fn visible_appointments<'a>(
    all: &'a [Appointment],
    date: NaiveDate,
    worker_filter: &[String],
    roster: &[Worker],
) -> Vec<&'a Appointment> {
    let columns = visible_workers(roster, worker_filter);
    all.iter()
        .filter(|appt| appt.date == date)
        .filter(|appt| columns.iter().any(|worker| worker.name == appt.worker_name))
        .collect()
}

/// Occupied intervals of one worker, sorted by start, skipping `exclude_id`.
///
/// `appointments` is expected to hold a single day already.
pub fn intervals_for_resource(
    appointments: &[Appointment],
    worker_name: &str,
    exclude_id: &str,
) -> Vec<Interval> {
    let mut intervals: Vec<Interval> = appointments
        .iter()
        .filter(|appt| appt.worker_name == worker_name && appt.id != exclude_id)
        .map(Interval::of)
        .collect();
    intervals.sort();
    intervals
}

/// Per-worker interval index for one day
#[derive(Debug, Clone, Default)]
pub struct ScheduleIndex {
    date: Option<NaiveDate>,
    by_worker: HashMap<String, Vec<(Interval, String)>>,
}

impl ScheduleIndex {
    /// Index every appointment on `date`, regardless of the worker filter.
    ///
    /// Collision checks must see hidden columns too, otherwise moving a card
    /// while a filter is active could double-book a hidden worker.
    pub fn build(all: &[Appointment], date: NaiveDate) -> Self {
        let mut by_worker: HashMap<String, Vec<(Interval, String)>> = HashMap::new();
        for appt in all.iter().filter(|appt| appt.date == date) {
            by_worker
                .entry(appt.worker_name.clone())
                .or_default()
                .push((Interval::of(appt), appt.id.clone()));
        }
        for entries in by_worker.values_mut() {
            entries.sort();
        }

        Self {
            date: Some(date),
            by_worker,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Sorted occupied intervals for `worker_name`, excluding `exclude_id`
    pub fn intervals_for(&self, worker_name: &str, exclude_id: &str) -> Vec<Interval> {
        self.by_worker
            .get(worker_name)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|(_, id)| id != exclude_id)
                    .map(|(interval, _)| *interval)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of appointments booked for `worker_name`
    pub fn load_of(&self, worker_name: &str) -> usize {
        self.by_worker.get(worker_name).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::appointment::Client;
    use crate::utils::time::parse_hhmm;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn appt(id: &str, worker: &str, date: NaiveDate, start: &str, end: &str) -> Appointment {
        Appointment::builder()
            .id(id)
            .worker(worker)
            .date(date)
            .start(parse_hhmm(start).unwrap())
            .end(parse_hhmm(end).unwrap())
            .client(Client::new("c", "Client"))
            .build()
            .unwrap()
    }

    fn roster() -> Vec<Worker> {
        vec![
            Worker::new("w1", "Norma", "#E57373"),
            Worker::new("w2", "Lucía", "#81C784"),
            Worker::new("w3", "Marco", "#64B5F6"),
        ]
    }

    fn sample() -> Vec<Appointment> {
        vec![
            appt("a", "Norma", day(14), "10:00", "11:00"),
            appt("b", "Marco", day(14), "09:00", "09:30"),
            appt("c", "Norma", day(15), "10:00", "11:00"),
            appt("d", "Lucía", day(14), "12:00", "12:45"),
            appt("e", "Ghost", day(14), "12:00", "12:45"),
        ]
    }

    fn ids(list: &[&Appointment]) -> Vec<String> {
        list.iter().map(|a| a.id.clone()).collect()
    }

    #[test]
    fn test_empty_filter_means_all_workers() {
        let all = sample();
        let visible = visible_appointments(&all, day(14), &[], &roster());
        assert_eq!(ids(&visible), vec!["a", "b", "d"]);
    }

    #[test]
    fn test_filter_keeps_only_selected_workers() {
        let all = sample();
        let filter = vec!["Marco".to_string(), "Lucía".to_string()];
        let visible = visible_appointments(&all, day(14), &filter, &roster());
        assert_eq!(ids(&visible), vec!["b", "d"]);

        let roster = roster();
        let columns: Vec<&str> = visible_workers(&roster, &filter)
            .iter()
            .map(|w| w.name.as_str())
            .collect();
        // Roster order, not filter order
        assert_eq!(columns, vec!["Lucía", "Marco"]);
    }

    #[test]
    fn test_date_must_match_exactly() {
        let all = sample();
        let visible = visible_appointments(&all, day(15), &[], &roster());
        assert_eq!(ids(&visible), vec!["c"]);
        assert!(visible_appointments(&all, day(16), &[], &roster()).is_empty());
    }

    #[test]
    fn test_intervals_sorted_and_excluding() {
        let all = vec![
            appt("x", "Norma", day(14), "14:00", "15:00"),
            appt("y", "Norma", day(14), "09:00", "09:30"),
            appt("z", "Norma", day(14), "11:00", "12:00"),
            appt("m", "Marco", day(14), "10:00", "11:00"),
        ];

        let intervals = intervals_for_resource(&all, "Norma", "z");
        assert_eq!(
            intervals,
            vec![Interval::new(540, 570), Interval::new(840, 900)]
        );
    }

    #[test]
    fn test_index_matches_free_function() {
        let all = sample();
        let index = ScheduleIndex::build(&all, day(14));
        let day_only: Vec<Appointment> =
            all.iter().filter(|a| a.date == day(14)).cloned().collect();

        assert_eq!(
            index.intervals_for("Norma", ""),
            intervals_for_resource(&day_only, "Norma", "")
        );
        assert!(index.intervals_for("Norma", "a").is_empty());
        assert_eq!(index.load_of("Ghost"), 1);
        assert_eq!(index.load_of("Nobody"), 0);
        assert_eq!(index.date(), Some(day(14)));
    }

    #[test]
    fn test_interval_overlap() {
        let a = Interval::new(600, 660);
        assert!(a.overlaps(&Interval::new(645, 700)));
        assert!(!a.overlaps(&Interval::new(660, 700)));
        assert!(!a.overlaps(&Interval::new(500, 600)));
        assert_eq!(a.duration(), 60);
    }
}
