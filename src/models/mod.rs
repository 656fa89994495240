// Module exports for models

pub mod appointment;
pub mod settings;
pub mod worker;
