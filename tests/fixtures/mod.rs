// Test fixtures - reusable test data
// Builds boards and appointments on a fixed salon day

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use salon_scheduler::models::appointment::{Appointment, Client};
use salon_scheduler::models::settings::GridConfig;
use salon_scheduler::services::day_board::DayBoard;
use salon_scheduler::services::seed::{default_roster, sample_day};
use salon_scheduler::utils::time::parse_hhmm;

/// Friday, March 14 2025
pub fn salon_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

pub fn t(hhmm: &str) -> NaiveTime {
    parse_hhmm(hhmm).unwrap()
}

pub fn hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub fn appointment(id: &str, worker: &str, start: &str, end: &str) -> Appointment {
    Appointment::builder()
        .id(id)
        .worker(worker)
        .date(salon_day())
        .start(t(start))
        .end(t(end))
        .client(Client::new(format!("client-{}", id), format!("Client {}", id)))
        .build()
        .unwrap()
}

/// Norma, Lucía and Marco with the given bookings
pub fn board_with(appointments: Vec<Appointment>) -> DayBoard {
    DayBoard::new(GridConfig::default(), default_roster(), appointments, salon_day()).unwrap()
}

/// The sample day used by the app
pub fn seeded_board() -> DayBoard {
    board_with(sample_day(salon_day()).unwrap())
}

/// Every pair of bookings on the same worker and day is disjoint
pub fn overlapping_pairs(board: &DayBoard) -> Vec<(String, String)> {
    let all = board.book().as_slice();
    let mut pairs = Vec::new();
    for (i, a) in all.iter().enumerate() {
        for b in &all[i + 1..] {
            if a.overlaps(b) {
                pairs.push((a.id.clone(), b.id.clone()));
            }
        }
    }
    pairs
}
