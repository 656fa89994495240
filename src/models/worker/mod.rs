// Worker module
// Staff members appointments are booked against

use serde::{Deserialize, Serialize};

/// A bookable staff member. The roster is fixed for the app's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub id: String,
    pub name: String,
    /// Hex colour token (#RRGGBB) used for the worker's column and cards
    pub color: String,
}

impl Worker {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Worker name cannot be empty".to_string());
        }

        if !self.color.starts_with('#') || self.color.len() != 7 {
            return Err("Color must be in hex format (#RRGGBB)".to_string());
        }

        Ok(())
    }
}

/// Position of a worker in the roster, by name
pub fn roster_index(roster: &[Worker], name: &str) -> Option<usize> {
    roster.iter().position(|worker| worker.name == name)
}
