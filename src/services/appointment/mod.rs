// Appointment collection
// Single owner of the appointment list; every write replaces the whole list

use std::sync::Arc;

use crate::error::{Result, SchedulerError};
use crate::models::appointment::Appointment;

/// Copy-on-write appointment collection.
///
/// Readers take a [`snapshot`](Self::snapshot) and keep seeing that version
/// even if a commit lands while they iterate.
#[derive(Debug, Clone, Default)]
pub struct AppointmentBook {
    appointments: Arc<Vec<Appointment>>,
}

impl AppointmentBook {
    pub fn new(appointments: Vec<Appointment>) -> Self {
        Self {
            appointments: Arc::new(appointments),
        }
    }

    pub fn snapshot(&self) -> Arc<Vec<Appointment>> {
        Arc::clone(&self.appointments)
    }

    pub fn as_slice(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Appointment> {
        self.appointments.iter().find(|appt| appt.id == id)
    }

    /// Replace the entry with `updated.id`, producing a new list
    pub fn replace(&mut self, updated: Appointment) -> Result<Appointment> {
        let previous = self
            .get(&updated.id)
            .cloned()
            .ok_or_else(|| SchedulerError::unknown_appointment(updated.id.clone()))?;

        let next: Vec<Appointment> = self
            .appointments
            .iter()
            .map(|appt| {
                if appt.id == updated.id {
                    updated.clone()
                } else {
                    appt.clone()
                }
            })
            .collect();
        self.appointments = Arc::new(next);

        Ok(previous)
    }

    /// Drop the entry with `id` (filter-by-id)
    pub fn remove(&mut self, id: &str) -> Result<Appointment> {
        let removed = self
            .get(id)
            .cloned()
            .ok_or_else(|| SchedulerError::unknown_appointment(id))?;

        let next: Vec<Appointment> = self
            .appointments
            .iter()
            .filter(|appt| appt.id != id)
            .cloned()
            .collect();
        self.appointments = Arc::new(next);

        Ok(removed)
    }
}
