// Service module exports

pub mod appointment;
pub mod day_board;
pub mod geometry;
pub mod placement;
pub mod schedule;
pub mod seed;
pub mod settings;
