// Card hit regions
//
// An armed card exposes three regions:
// - Top handle: drags the start time
// - Bottom handle: drags the end time
// - Body: moves the whole card (and across worker columns)

use egui::{Pos2, Rect, Vec2};

/// Which part of a card the pointer went down on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardRegion {
    Body,
    /// Top edge - adjusts start time
    TopHandle,
    /// Bottom edge - adjusts end time
    BottomHandle,
}

impl CardRegion {
    pub fn is_handle(&self) -> bool {
        matches!(self, CardRegion::TopHandle | CardRegion::BottomHandle)
    }

    /// Returns the cursor icon for this region
    pub fn cursor_icon(&self) -> egui::CursorIcon {
        match self {
            CardRegion::Body => egui::CursorIcon::Grab,
            CardRegion::TopHandle | CardRegion::BottomHandle => egui::CursorIcon::ResizeVertical,
        }
    }
}

/// Tallest handle hit zone
pub const HANDLE_ZONE: f32 = 14.0;
/// Visual size of the handle pill
pub const HANDLE_VISUAL_SIZE: f32 = 6.0;
const HANDLE_VISUAL_WIDTH: f32 = 28.0;

/// Hit zones of one card
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandleRects {
    pub card: Rect,
    pub top: Rect,
    pub bottom: Rect,
}

impl HandleRects {
    pub fn for_card(card: Rect) -> Self {
        // Short cards keep at least half their height as body
        let zone_height = (card.height() / 4.0).min(HANDLE_ZONE);

        Self {
            card,
            top: Rect::from_min_size(card.min, Vec2::new(card.width(), zone_height)),
            bottom: Rect::from_min_size(
                Pos2::new(card.left(), card.bottom() - zone_height),
                Vec2::new(card.width(), zone_height),
            ),
        }
    }

    /// Region under `pos`. Handles only react while the card is armed.
    pub fn hit_test(&self, pos: Pos2, armed: bool) -> Option<CardRegion> {
        if !self.card.contains(pos) {
            return None;
        }
        if armed {
            if self.top.contains(pos) {
                return Some(CardRegion::TopHandle);
            }
            if self.bottom.contains(pos) {
                return Some(CardRegion::BottomHandle);
            }
        }
        Some(CardRegion::Body)
    }
}

/// Draw the two resize handles of an armed card
pub fn draw_handles(
    ui: &egui::Ui,
    handles: &HandleRects,
    hovered: Option<CardRegion>,
    color: egui::Color32,
) {
    let draw_handle = |center: Pos2, is_hovered: bool| {
        let size = if is_hovered {
            Vec2::new(HANDLE_VISUAL_WIDTH + 4.0, HANDLE_VISUAL_SIZE + 1.0)
        } else {
            Vec2::new(HANDLE_VISUAL_WIDTH, HANDLE_VISUAL_SIZE)
        };
        let pill = Rect::from_center_size(center, size);
        let fill = if is_hovered {
            egui::Color32::WHITE
        } else {
            egui::Color32::from_rgba_unmultiplied(
                color.r().saturating_add(60),
                color.g().saturating_add(60),
                color.b().saturating_add(60),
                color.a(),
            )
        };

        ui.painter().rect_filled(pill, HANDLE_VISUAL_SIZE / 2.0, fill);
        ui.painter().rect_stroke(
            pill,
            HANDLE_VISUAL_SIZE / 2.0,
            egui::Stroke::new(1.0, color.linear_multiply(0.6)),
        );
    };

    draw_handle(
        Pos2::new(handles.card.center().x, handles.card.top() + HANDLE_VISUAL_SIZE / 2.0 + 2.0),
        hovered == Some(CardRegion::TopHandle),
    );
    draw_handle(
        Pos2::new(handles.card.center().x, handles.card.bottom() - HANDLE_VISUAL_SIZE / 2.0 - 2.0),
        hovered == Some(CardRegion::BottomHandle),
    );
}
