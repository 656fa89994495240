pub mod day_view;
mod palette;
pub mod utils;

pub use day_view::{commit_release, DayView, DayViewResult, DayViewState};
