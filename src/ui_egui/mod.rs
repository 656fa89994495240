pub mod active_editor;
pub mod animation;
mod app;
pub mod drag;
pub mod haptics;
pub mod resize;
pub mod scroll_sync;
pub mod views;

pub use app::SalonApp;
