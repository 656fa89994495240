// Salon Scheduler
// Main entry point

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use salon_scheduler::services::day_board::DayBoard;
use salon_scheduler::services::seed::{appointments_or_sample, default_roster};
use salon_scheduler::services::settings::SettingsService;
use salon_scheduler::ui_egui::SalonApp;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();
    log::info!("Starting Salon Scheduler");

    let settings_service = SettingsService::default_location();
    let settings = match &settings_service {
        Some(service) => service.get_or_default(),
        None => {
            log::warn!("No config directory available, settings will not be saved");
            Default::default()
        }
    };

    let today = Local::now().date_naive();
    // Optional JSON file of appointments, otherwise a sample day
    let fixture = std::env::args_os().nth(1).map(PathBuf::from);
    let appointments = appointments_or_sample(fixture.as_deref(), today)?;

    let board = DayBoard::new(settings.grid.clone(), default_roster(), appointments, today)
        .context("Failed to set up the day board")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([520.0, 420.0])
            .with_title("Salon Scheduler"),
        ..Default::default()
    };

    eframe::run_native(
        "Salon Scheduler",
        options,
        Box::new(move |cc| Ok(Box::new(SalonApp::new(cc, board, settings, settings_service)))),
    )
    .map_err(|e| anyhow!("Window closed with error: {}", e))
}
