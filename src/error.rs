use thiserror::Error;

use crate::utils::time::TimeError;

/// Errors surfaced by the scheduling core.
///
/// A placement that does not fit is not an error; see
/// [`crate::services::day_board::CommitOutcome::Rejected`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("Invalid time: {0}")]
    Time(#[from] TimeError),

    #[error("Unknown appointment: {0}")]
    UnknownAppointment(String),

    #[error("Unknown worker: {0}")]
    UnknownWorker(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SchedulerError {
    pub fn unknown_appointment<S: Into<String>>(id: S) -> Self {
        Self::UnknownAppointment(id.into())
    }

    pub fn unknown_worker<S: Into<String>>(name: S) -> Self {
        Self::UnknownWorker(name.into())
    }
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
