//! Fixture roster and appointments used by the host shell and tests.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;

use crate::models::appointment::{Appointment, AppointmentStatus, Client, ServiceLine};
use crate::models::worker::Worker;
use crate::utils::time::parse_hhmm;

/// id, worker, start, end, client, service, price, status
type SeedRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    f64,
    AppointmentStatus,
);

const SEED_DAY: &[SeedRow] = &[
    ("apt-001", "Norma", "09:00", "09:45", "Ana Ruiz", "Cut", 25.0, AppointmentStatus::Confirmed),
    ("apt-002", "Norma", "10:00", "12:00", "Carla Méndez", "Colour", 80.0, AppointmentStatus::Confirmed),
    ("apt-003", "Norma", "14:00", "14:30", "Diego Paz", "Beard trim", 15.0, AppointmentStatus::Pending),
    ("apt-004", "Lucía", "09:30", "10:30", "Elena Soto", "Blow-dry", 30.0, AppointmentStatus::InProgress),
    ("apt-005", "Lucía", "11:00", "11:15", "Félix Ortega", "Fringe", 10.0, AppointmentStatus::Pending),
    ("apt-006", "Lucía", "15:30", "17:00", "Gabriela León", "Highlights", 95.0, AppointmentStatus::Confirmed),
    ("apt-007", "Marco", "09:00", "09:30", "Hugo Vidal", "Cut", 25.0, AppointmentStatus::Completed),
    ("apt-008", "Marco", "12:15", "13:00", "Irene Campos", "Treatment", 40.0, AppointmentStatus::Pending),
    ("apt-009", "Marco", "16:00", "17:45", "Julia Reyes", "Perm", 110.0, AppointmentStatus::Cancelled),
];

/// The salon's three stylists, in column order
pub fn default_roster() -> Vec<Worker> {
    vec![
        Worker::new("w-norma", "Norma", "#E57373"),
        Worker::new("w-lucia", "Lucía", "#81C784"),
        Worker::new("w-marco", "Marco", "#64B5F6"),
    ]
}

/// A plausible working day of bookings on `date`
pub fn sample_day(date: NaiveDate) -> Result<Vec<Appointment>> {
    SEED_DAY
        .iter()
        .enumerate()
        .map(|(index, &(id, worker, start, end, client, service, price, status))| {
            let start = parse_hhmm(start)?;
            let end = parse_hhmm(end)?;
            let duration_minutes = (end - start).num_minutes().max(0) as u32;

            Appointment::builder()
                .id(id)
                .worker(worker)
                .date(date)
                .start(start)
                .end(end)
                .client(Client::new(format!("client-{:03}", index + 1), client))
                .line_item(ServiceLine {
                    id: format!("{}-1", id),
                    service_name: service.to_string(),
                    assigned_worker: worker.to_string(),
                    start_offset: start,
                    duration_minutes,
                    price,
                })
                .status(status)
                .build()
                .map_err(|e| anyhow!("Invalid seed appointment {}: {}", id, e))
        })
        .collect()
}

/// Load appointments from a JSON array, validating each entry
pub fn load_appointments_json(path: &Path) -> Result<Vec<Appointment>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let appointments: Vec<Appointment> =
        serde_json::from_str(&content).context("Failed to parse appointments")?;

    let mut seen = HashSet::new();
    for appointment in &appointments {
        appointment
            .validate()
            .map_err(|e| anyhow!("Invalid appointment {}: {}", appointment.id, e))?;
        if !seen.insert(appointment.id.as_str()) {
            return Err(anyhow!("Duplicate appointment id {}", appointment.id));
        }
    }

    log::info!("Loaded {} appointments from {}", appointments.len(), path.display());
    Ok(appointments)
}

/// Appointments from `path` when given and loadable, otherwise the sample day
pub fn appointments_or_sample(path: Option<&Path>, date: NaiveDate) -> Result<Vec<Appointment>> {
    if let Some(path) = path {
        match load_appointments_json(path) {
            Ok(appointments) => return Ok(appointments),
            Err(e) => log::warn!(
                "Failed to load appointments from {}: {:#}, using the sample day",
                path.display(),
                e
            ),
        }
    }
    sample_day(date)
}
