mod navigation;
mod shortcuts;
mod status_bar;
mod toast;

use self::toast::ToastManager;
use crate::models::settings::Settings;
use crate::services::day_board::{CommitOutcome, DayBoard};
use crate::services::settings::SettingsService;
use crate::ui_egui::haptics::{HapticFeedback, NoHaptics};
use crate::ui_egui::views::{DayView, DayViewState};

const MIN_ROOT_WIDTH: f32 = 480.0;
const MIN_ROOT_HEIGHT: f32 = 320.0;

pub struct SalonApp {
    board: DayBoard,
    view_state: DayViewState,
    settings: Settings,
    /// `None` when no config directory could be resolved
    settings_service: Option<SettingsService>,
    haptics: Box<dyn HapticFeedback>,
    toasts: ToastManager,
}

impl eframe::App for SalonApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keyboard_shortcuts(ctx);

        egui::TopBottomPanel::top("day_toolbar").show(ctx, |ui| {
            self.render_toolbar(ui);
        });
        self.render_status_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.set_min_size(egui::vec2(MIN_ROOT_WIDTH, MIN_ROOT_HEIGHT));
            let result = DayView::show(
                ui,
                &mut self.board,
                &mut self.view_state,
                &self.settings,
                self.haptics.as_ref(),
            );
            for outcome in result.outcomes {
                self.report_outcome(&outcome);
            }
        });

        self.toasts.render(ctx, ctx.style().visuals.dark_mode);
    }
}

impl SalonApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        board: DayBoard,
        settings: Settings,
        settings_service: Option<SettingsService>,
    ) -> Self {
        apply_theme(&cc.egui_ctx, &settings.theme);
        Self {
            board,
            view_state: DayViewState::default(),
            settings,
            settings_service,
            haptics: Box::new(NoHaptics),
            toasts: ToastManager::new(),
        }
    }

    pub fn with_haptics(mut self, haptics: Box<dyn HapticFeedback>) -> Self {
        self.haptics = haptics;
        self
    }

    fn report_outcome(&mut self, outcome: &CommitOutcome) {
        match outcome {
            CommitOutcome::Applied { before, after } => {
                if before.worker_name != after.worker_name {
                    self.toasts.info(format!(
                        "{} moved to {} at {}",
                        after.client.name,
                        after.worker_name,
                        after.start.format("%H:%M")
                    ));
                } else {
                    self.toasts.info(format!(
                        "{} now {} - {}",
                        after.client.name,
                        after.start.format("%H:%M"),
                        after.end.format("%H:%M")
                    ));
                }
            }
            CommitOutcome::Rejected(original) => {
                self.toasts
                    .warning(format!("No room for {} there", original.client.name));
            }
        }
    }

    fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.settings.theme = if self.settings.theme == "dark" {
            "light".to_string()
        } else {
            "dark".to_string()
        };
        apply_theme(ctx, &self.settings.theme);
        self.save_settings();
    }

    fn toggle_time_format(&mut self) {
        self.settings.time_format = if self.settings.time_format == "24h" {
            "12h".to_string()
        } else {
            "24h".to_string()
        };
        self.save_settings();
    }

    fn save_settings(&mut self) {
        let Some(service) = &self.settings_service else {
            return;
        };
        if let Err(e) = service.save(&self.settings) {
            log::error!("Failed to save settings: {:#}", e);
            self.toasts.error("Could not save settings");
        }
    }
}

fn apply_theme(ctx: &egui::Context, theme: &str) {
    if theme == "dark" {
        ctx.set_visuals(egui::Visuals::dark());
    } else {
        ctx.set_visuals(egui::Visuals::light());
    }
}
