use super::SalonApp;

impl SalonApp {
    pub(super) fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        let (escape, left, right, today, undo, time_format) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::ArrowRight),
                i.modifiers.ctrl && i.key_pressed(egui::Key::T),
                i.modifiers.command && i.key_pressed(egui::Key::Z),
                i.modifiers.ctrl && i.key_pressed(egui::Key::H),
            )
        });

        if escape {
            self.view_state.reset_gestures();
        }

        // Everything below would move cards out from under an active drag
        if self.view_state.is_dragging() {
            return;
        }

        if left {
            self.navigate_previous();
        }
        if right {
            self.navigate_next();
        }
        if today {
            self.jump_to_today();
        }
        if undo {
            self.undo();
        }
        if time_format {
            self.toggle_time_format();
        }
    }
}
