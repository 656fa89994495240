use egui::Color32;

pub(crate) fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

pub(crate) fn blend(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |c1: u8, c2: u8| -> u8 { ((c1 as f32 * (1.0 - t)) + (c2 as f32 * t)).round() as u8 };
    Color32::from_rgb(lerp(a.r(), b.r()), lerp(a.g(), b.g()), lerp(a.b(), b.b()))
}

#[derive(Clone, Copy)]
pub(crate) struct DayGridPalette {
    pub grid_bg: Color32,
    pub hour_line: Color32,
    pub slot_line: Color32,
    pub column_divider: Color32,
    pub header_bg: Color32,
    pub header_text: Color32,
    pub label_text: Color32,
    pub card_text: Color32,
    pub now_line: Color32,
    pub edge_shade: Color32,
}

impl DayGridPalette {
    pub fn from_ui(ui: &egui::Ui) -> Self {
        let visuals = ui.visuals();
        let dark = visuals.dark_mode;
        let base = visuals.panel_fill;
        let border = visuals.widgets.noninteractive.bg_stroke.color;

        Self {
            grid_bg: blend(base, visuals.extreme_bg_color, 0.4),
            hour_line: border,
            slot_line: with_alpha(border, 90),
            column_divider: with_alpha(border, 200),
            header_bg: blend(base, visuals.faint_bg_color, 0.6),
            header_text: visuals.strong_text_color(),
            label_text: visuals.weak_text_color(),
            card_text: if dark {
                Color32::from_rgb(245, 245, 245)
            } else {
                Color32::from_rgb(25, 25, 25)
            },
            now_line: Color32::from_rgb(229, 57, 53),
            edge_shade: with_alpha(visuals.selection.bg_fill, if dark { 90 } else { 60 }),
        }
    }

    /// Card fill derived from the worker colour
    pub fn card_fill(&self, worker_color: Color32, dark: bool) -> Color32 {
        if dark {
            blend(worker_color, Color32::BLACK, 0.35)
        } else {
            blend(worker_color, Color32::WHITE, 0.55)
        }
    }
}
