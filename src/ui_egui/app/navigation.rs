use super::SalonApp;
use chrono::Local;
use egui::RichText;

impl SalonApp {
    pub(super) fn navigate_previous(&mut self) {
        self.board.previous_day();
        self.view_state.reset_gestures();
    }

    pub(super) fn navigate_next(&mut self) {
        self.board.next_day();
        self.view_state.reset_gestures();
    }

    pub(super) fn jump_to_today(&mut self) {
        self.board.go_to(Local::now().date_naive());
        self.view_state.reset_gestures();
    }

    pub(super) fn toggle_worker(&mut self, name: &str) {
        match self.board.toggle_worker(name) {
            Ok(()) => self.view_state.reset_gestures(),
            Err(e) => log::warn!("Filter change ignored: {}", e),
        }
    }

    pub(super) fn undo(&mut self) {
        if let Some(restored) = self.board.undo() {
            self.toasts.info(format!(
                "Restored {} at {}",
                restored.client.name,
                restored.start.format("%H:%M")
            ));
        }
    }

    pub(super) fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        // Navigation is locked while a card is being dragged
        let idle = !self.view_state.is_dragging();

        ui.horizontal(|ui| {
            ui.add_enabled_ui(idle, |ui| {
                if ui.button("◀").on_hover_text("Previous day").clicked() {
                    self.navigate_previous();
                }
                if ui.button("Today").clicked() {
                    self.jump_to_today();
                }
                if ui.button("▶").on_hover_text("Next day").clicked() {
                    self.navigate_next();
                }
            });

            ui.label(RichText::new(self.board.date().format("%A, %B %-d, %Y").to_string()).strong());
            ui.separator();

            let names: Vec<String> = self.board.roster().iter().map(|w| w.name.clone()).collect();
            ui.add_enabled_ui(idle, |ui| {
                for name in &names {
                    let selected = self.board.worker_filter().contains(name);
                    if ui.selectable_label(selected, name.as_str()).clicked() {
                        self.toggle_worker(name);
                    }
                }
                if ui
                    .selectable_label(self.board.worker_filter().is_empty(), "All")
                    .clicked()
                {
                    self.board.clear_filter();
                    self.view_state.reset_gestures();
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let theme_icon = if self.settings.theme == "dark" { "☀" } else { "🌙" };
                if ui.button(theme_icon).on_hover_text("Toggle theme").clicked() {
                    let ctx = ui.ctx().clone();
                    self.toggle_theme(&ctx);
                }
                if ui
                    .button(self.settings.time_format.as_str())
                    .on_hover_text("Toggle 12h/24h labels")
                    .clicked()
                {
                    self.toggle_time_format();
                }
                if ui
                    .add_enabled(idle && self.board.can_undo(), egui::Button::new("Undo"))
                    .clicked()
                {
                    self.undo();
                }
            });
        });
    }
}
