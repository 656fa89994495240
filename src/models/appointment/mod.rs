// Appointment module
// A booked block of time for one worker on one calendar day

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::utils::time::{hhmm, minutes_from_midnight};

/// Client the appointment is booked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
}

impl Client {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::InProgress => "In progress",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }
}

/// One service inside an appointment (e.g. "cut" followed by "styling").
///
/// Collision checks work on the whole appointment, never on individual lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceLine {
    pub id: String,
    pub service_name: String,
    pub assigned_worker: String,
    #[serde(with = "hhmm")]
    pub start_offset: NaiveTime,
    pub duration_minutes: u32,
    pub price: f64,
}

/// Appointment on the day grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub worker_name: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    pub client: Client,
    #[serde(default)]
    pub line_items: Vec<ServiceLine>,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub status: AppointmentStatus,
}

impl Appointment {
    /// Create a builder for constructing appointments
    pub fn builder() -> AppointmentBuilder {
        AppointmentBuilder::new()
    }

    /// Validate the appointment
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("Appointment id cannot be empty".to_string());
        }

        if self.worker_name.trim().is_empty() {
            return Err("Appointment must be assigned to a worker".to_string());
        }

        if self.end <= self.start {
            return Err("Appointment end time must be after start time".to_string());
        }

        if self.total_amount < 0.0 {
            return Err("Appointment total cannot be negative".to_string());
        }

        Ok(())
    }

    pub fn start_minutes(&self) -> i32 {
        minutes_from_midnight(self.start)
    }

    pub fn end_minutes(&self) -> i32 {
        minutes_from_midnight(self.end)
    }

    pub fn duration_minutes(&self) -> i32 {
        self.end_minutes() - self.start_minutes()
    }

    /// Copy of this appointment with a new time range
    pub fn with_times(&self, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start,
            end,
            ..self.clone()
        }
    }

    /// Copy of this appointment reassigned to another worker.
    ///
    /// Service lines that followed the appointment's worker follow it to the new one.
    pub fn with_worker(&self, worker_name: impl Into<String>) -> Self {
        let worker_name = worker_name.into();
        let line_items = self
            .line_items
            .iter()
            .map(|line| {
                let mut line = line.clone();
                if line.assigned_worker == self.worker_name {
                    line.assigned_worker = worker_name.clone();
                }
                line
            })
            .collect();

        Self {
            worker_name,
            line_items,
            ..self.clone()
        }
    }

    /// Half-open interval overlap on the same worker and day
    pub fn overlaps(&self, other: &Appointment) -> bool {
        self.worker_name == other.worker_name
            && self.date == other.date
            && self.start < other.end
            && self.end > other.start
    }
}

/// Builder for creating appointments with optional fields
pub struct AppointmentBuilder {
    id: Option<String>,
    worker_name: Option<String>,
    date: Option<NaiveDate>,
    start: Option<NaiveTime>,
    end: Option<NaiveTime>,
    client: Option<Client>,
    line_items: Vec<ServiceLine>,
    total_amount: Option<f64>,
    status: AppointmentStatus,
}

impl AppointmentBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            worker_name: None,
            date: None,
            start: None,
            end: None,
            client: None,
            line_items: Vec::new(),
            total_amount: None,
            status: AppointmentStatus::default(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn worker(mut self, worker_name: impl Into<String>) -> Self {
        self.worker_name = Some(worker_name.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn start(mut self, start: NaiveTime) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: NaiveTime) -> Self {
        self.end = Some(end);
        self
    }

    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Append a service line
    pub fn line_item(mut self, line: ServiceLine) -> Self {
        self.line_items.push(line);
        self
    }

    /// Set the total explicitly; otherwise it is the sum of line prices
    pub fn total_amount(mut self, total: f64) -> Self {
        self.total_amount = Some(total);
        self
    }

    pub fn status(mut self, status: AppointmentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn build(self) -> Result<Appointment, String> {
        let id = self.id.ok_or("Appointment id is required")?;
        let worker_name = self.worker_name.ok_or("Appointment worker is required")?;
        let date = self.date.ok_or("Appointment date is required")?;
        let start = self.start.ok_or("Appointment start time is required")?;
        let end = self.end.ok_or("Appointment end time is required")?;
        let client = self.client.ok_or("Appointment client is required")?;
        let total_amount = self
            .total_amount
            .unwrap_or_else(|| self.line_items.iter().map(|line| line.price).sum());

        let appointment = Appointment {
            id,
            worker_name,
            date,
            start,
            end,
            client,
            line_items: self.line_items,
            total_amount,
            status: self.status,
        };

        appointment.validate()?;
        Ok(appointment)
    }
}

impl Default for AppointmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
