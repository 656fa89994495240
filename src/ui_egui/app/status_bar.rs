//! Bottom bar: date, bookings on screen and a hint for the current gesture.

use super::SalonApp;
use egui::{Color32, RichText};

const SEPARATOR_WIDTH: f32 = 8.0;

fn secondary_text_color(is_dark: bool) -> Color32 {
    if is_dark {
        Color32::from_gray(160)
    } else {
        Color32::from_gray(100)
    }
}

impl SalonApp {
    pub(super) fn render_status_bar(&mut self, ctx: &egui::Context) {
        let is_dark = ctx.style().visuals.dark_mode;

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    let secondary = secondary_text_color(is_dark);
                    let columns = self.board.visible_workers().len();
                    let bookings = self.board.visible_appointments().len();

                    ui.label(RichText::new(self.board.date().format("%Y-%m-%d").to_string()).small());
                    ui.add_space(SEPARATOR_WIDTH);
                    ui.label(
                        RichText::new(format!("{} workers · {} bookings", columns, bookings))
                            .small()
                            .color(secondary),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(RichText::new(self.gesture_hint()).small().color(secondary));
                    });
                });
            });
    }

    fn gesture_hint(&self) -> String {
        if self.view_state.is_dragging() {
            return "Release to drop".to_string();
        }
        match self.view_state.active_editor().active_id() {
            Some(id) => match self.board.get(id) {
                Some(appointment) => format!(
                    "Editing {}: drag to move, handles to resize",
                    appointment.client.name
                ),
                None => "Drag to move, handles to resize".to_string(),
            },
            None => "Long-press a booking to edit".to_string(),
        }
    }
}
