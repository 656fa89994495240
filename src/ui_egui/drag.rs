//! Long-press / drag gesture state machine for one appointment card.
//!
//! `Idle → Armed → Dragging(Move | ResizeTop | ResizeBottom) → Idle`.
//! A pending long press is tracked as [`GestureState::Pressing`], which is
//! still idle from the grid's point of view. The controller never touches
//! the appointment collection; a finished drag is handed back as a
//! [`DragRelease`] for the grid to resolve and commit.

use std::time::{Duration, Instant};

use egui::{Pos2, Vec2};

use crate::models::settings::GridConfig;
use crate::services::geometry::CardGeometry;
use crate::ui_egui::active_editor::ActiveEditor;
use crate::ui_egui::haptics::{pulse, HapticFeedback, ImpactStyle};
use crate::ui_egui::resize::CardRegion;

/// Hold time before a press arms the card
pub const LONG_PRESS: Duration = Duration::from_millis(500);
/// Armed cards fall back to idle if no drag starts within this window
pub const ARMED_TIMEOUT: Duration = Duration::from_secs(5);
/// Pointer travel needed before an armed grip becomes a drag
pub const DRAG_DEAD_ZONE: f32 = 2.0;
/// Pointer travel that abandons a pending long press
pub const LONG_PRESS_SLOP: f32 = 10.0;
/// Edge shading stays visible this long after the last auto-scroll request
pub const EDGE_SHADE_FADE: Duration = Duration::from_millis(140);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    Move,
    ResizeTop,
    ResizeBottom,
}

impl From<CardRegion> for DragMode {
    fn from(region: CardRegion) -> Self {
        match region {
            CardRegion::Body => DragMode::Move,
            CardRegion::TopHandle => DragMode::ResizeTop,
            CardRegion::BottomHandle => DragMode::ResizeBottom,
        }
    }
}

/// Candidate geometry for a raw vertical pointer delta, clamped to the grid top
pub fn candidate_geometry(mode: DragMode, original: CardGeometry, delta_y: f32) -> CardGeometry {
    match mode {
        DragMode::Move => CardGeometry::new((original.top + delta_y).max(0.0), original.height),
        DragMode::ResizeTop => {
            let top = (original.top + delta_y).max(0.0).min(original.bottom());
            CardGeometry::new(top, original.bottom() - top)
        }
        DragMode::ResizeBottom => {
            CardGeometry::new(original.top, (original.height + delta_y).max(0.0))
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    pub mode: DragMode,
    pub origin: Pos2,
    pub original: CardGeometry,
    pub current: CardGeometry,
    /// Raw pointer travel since the grip, unsnapped
    pub offset: Vec2,
}

impl DragSession {
    fn new(mode: DragMode, origin: Pos2, original: CardGeometry) -> Self {
        Self {
            mode,
            origin,
            original,
            current: original,
            offset: Vec2::ZERO,
        }
    }

    fn follow(&mut self, pointer: Pos2) {
        self.offset = pointer - self.origin;
        self.current = candidate_geometry(self.mode, self.original, self.offset.y);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureState {
    Idle,
    /// Pointer is down on the body; arms once held for [`LONG_PRESS`]
    Pressing {
        origin: Pos2,
        since: Instant,
        geometry: CardGeometry,
    },
    /// Handles visible. `grip` is set while the pointer is held on a region.
    Armed {
        armed_at: Instant,
        geometry: CardGeometry,
        grip: Option<(Pos2, DragMode)>,
    },
    Dragging(DragSession),
}

impl GestureState {
    pub fn name(&self) -> &'static str {
        match self {
            GestureState::Idle => "idle",
            GestureState::Pressing { .. } => "pressing",
            GestureState::Armed { .. } => "armed",
            GestureState::Dragging(session) => match session.mode {
                DragMode::Move => "dragging-move",
                DragMode::ResizeTop => "dragging-resize-top",
                DragMode::ResizeBottom => "dragging-resize-bottom",
            },
        }
    }

    /// Armed or dragging
    pub fn is_editing(&self) -> bool {
        matches!(self, GestureState::Armed { .. } | GestureState::Dragging(_))
    }
}

/// Slice of the content visible in the viewport, in content coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportBand {
    pub top: f32,
    pub bottom: f32,
}

/// A drag that ended with the pointer released
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragRelease {
    pub mode: DragMode,
    pub original: CardGeometry,
    pub geometry: CardGeometry,
    /// Horizontal travel, used to pick the target worker column
    pub column_offset: f32,
}

impl DragRelease {
    /// A card dragged down to nothing springs back instead of committing
    pub fn is_collapsed(&self) -> bool {
        self.geometry.height <= 0.0
    }
}

/// What the grid has to act on after feeding the controller an event
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GestureResponse {
    /// Live card geometry while dragging
    pub preview: Option<CardGeometry>,
    pub column_offset: f32,
    /// Requested vertical auto-scroll in pixels for this frame
    pub auto_scroll: f32,
    /// `Some(true)` when a drag began, `Some(false)` when it ended
    pub drag_state_changed: Option<bool>,
    pub release: Option<DragRelease>,
    pub armed: bool,
    pub disarmed: bool,
    /// Card that lost edit mode because this one armed
    pub displaced: Option<String>,
}

impl GestureResponse {
    pub fn merge(&mut self, other: GestureResponse) {
        if other.preview.is_some() {
            self.preview = other.preview;
            self.column_offset = other.column_offset;
        }
        self.auto_scroll += other.auto_scroll;
        if other.drag_state_changed.is_some() {
            self.drag_state_changed = other.drag_state_changed;
        }
        if other.release.is_some() {
            self.release = other.release;
        }
        self.armed |= other.armed;
        self.disarmed |= other.disarmed;
        if other.displaced.is_some() {
            self.displaced = other.displaced;
        }
    }

    pub fn has_actions(&self) -> bool {
        self.preview.is_some()
            || self.auto_scroll != 0.0
            || self.drag_state_changed.is_some()
            || self.release.is_some()
            || self.armed
            || self.disarmed
            || self.displaced.is_some()
    }
}

pub struct DragGestureController {
    appointment_id: String,
    state: GestureState,
    edge_threshold: f32,
    auto_scroll_speed: f32,
    edge_shade_until: Option<Instant>,
}

impl DragGestureController {
    pub fn new(appointment_id: impl Into<String>, config: &GridConfig) -> Self {
        Self {
            appointment_id: appointment_id.into(),
            state: GestureState::Idle,
            edge_threshold: config.edge_threshold,
            auto_scroll_speed: config.auto_scroll_speed,
            edge_shade_until: None,
        }
    }

    pub fn appointment_id(&self) -> &str {
        &self.appointment_id
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        self.state.is_editing()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging(_))
    }

    /// Pointer pressed on this card
    pub fn pointer_down(&mut self, pos: Pos2, region: CardRegion, geometry: CardGeometry, now: Instant) {
        match self.state {
            GestureState::Idle => self.transition(GestureState::Pressing {
                origin: pos,
                since: now,
                geometry,
            }),
            GestureState::Armed { armed_at, .. } => {
                self.state = GestureState::Armed {
                    armed_at,
                    geometry,
                    grip: Some((pos, region.into())),
                };
            }
            GestureState::Pressing { .. } | GestureState::Dragging(_) => {}
        }
    }

    /// Advance timers and follow the shared editor.
    ///
    /// Call once per frame while the card is pressing or editing.
    pub fn tick(
        &mut self,
        now: Instant,
        editor: &mut ActiveEditor,
        haptics: &dyn HapticFeedback,
    ) -> GestureResponse {
        let mut response = GestureResponse::default();

        if self.state.is_editing() && !editor.is_editing(&self.appointment_id) {
            return self.cancel();
        }

        match self.state {
            GestureState::Pressing { origin, since, geometry } => {
                if now.saturating_duration_since(since) >= LONG_PRESS {
                    response.displaced = editor.request_edit_mode(&self.appointment_id, true, now);
                    pulse(haptics, ImpactStyle::Medium);
                    self.transition(GestureState::Armed {
                        armed_at: now,
                        geometry,
                        grip: Some((origin, DragMode::Move)),
                    });
                    response.armed = true;
                }
            }
            GestureState::Armed { armed_at, .. } => {
                if now.saturating_duration_since(armed_at) >= ARMED_TIMEOUT {
                    editor.request_edit_mode(&self.appointment_id, false, now);
                    self.transition(GestureState::Idle);
                    response.disarmed = true;
                }
            }
            GestureState::Idle | GestureState::Dragging(_) => {}
        }

        response
    }

    /// Pointer moved; `pos` and `band` are in content coordinates
    pub fn pointer_move(&mut self, pos: Pos2, band: ViewportBand, now: Instant) -> GestureResponse {
        let mut response = GestureResponse::default();

        match self.state {
            GestureState::Pressing { origin, .. } => {
                if (pos - origin).length() > LONG_PRESS_SLOP {
                    self.transition(GestureState::Idle);
                }
                return response;
            }
            GestureState::Armed {
                geometry,
                grip: Some((origin, mode)),
                ..
            } => {
                if (pos - origin).length() <= DRAG_DEAD_ZONE {
                    return response;
                }
                self.transition(GestureState::Dragging(DragSession::new(mode, origin, geometry)));
                response.drag_state_changed = Some(true);
            }
            GestureState::Armed { grip: None, .. } | GestureState::Idle => return response,
            GestureState::Dragging(_) => {}
        }

        if let GestureState::Dragging(session) = &mut self.state {
            session.follow(pos);
            response.preview = Some(session.current);
            response.column_offset = if session.mode == DragMode::Move {
                session.offset.x
            } else {
                0.0
            };
        }

        response.auto_scroll = self.auto_scroll_for(pos.y, band);
        if response.auto_scroll != 0.0 {
            self.edge_shade_until = Some(now + EDGE_SHADE_FADE);
        }

        response
    }

    /// Pointer released
    pub fn pointer_up(&mut self, now: Instant, editor: &mut ActiveEditor) -> GestureResponse {
        let mut response = GestureResponse::default();

        match self.state {
            GestureState::Pressing { .. } => self.transition(GestureState::Idle),
            GestureState::Armed { armed_at, geometry, .. } => {
                self.state = GestureState::Armed {
                    armed_at,
                    geometry,
                    grip: None,
                };
            }
            GestureState::Dragging(session) => {
                editor.request_edit_mode(&self.appointment_id, false, now);
                self.transition(GestureState::Idle);
                response.drag_state_changed = Some(false);
                response.release = Some(DragRelease {
                    mode: session.mode,
                    original: session.original,
                    geometry: session.current,
                    column_offset: if session.mode == DragMode::Move {
                        session.offset.x
                    } else {
                        0.0
                    },
                });
            }
            GestureState::Idle => {}
        }

        response
    }

    /// Force back to idle without producing a release
    pub fn cancel(&mut self) -> GestureResponse {
        let mut response = GestureResponse::default();
        if self.is_dragging() {
            response.drag_state_changed = Some(false);
        }
        if self.state.is_editing() {
            response.disarmed = true;
        }
        if self.state != GestureState::Idle {
            self.transition(GestureState::Idle);
        }
        response
    }

    pub fn edge_shading_visible(&self, now: Instant) -> bool {
        self.edge_shade_until.map_or(false, |until| now < until)
    }

    fn auto_scroll_for(&self, pointer_y: f32, band: ViewportBand) -> f32 {
        let edge = self.edge_threshold;
        if edge <= 0.0 {
            return 0.0;
        }

        let proximity = |distance: f32| ((edge - distance) / edge).clamp(0.0, 1.0);
        let from_top = pointer_y - band.top;
        let from_bottom = band.bottom - pointer_y;

        if from_top < edge {
            -self.auto_scroll_speed * proximity(from_top)
        } else if from_bottom < edge {
            self.auto_scroll_speed * proximity(from_bottom)
        } else {
            0.0
        }
    }

    fn transition(&mut self, next: GestureState) {
        log::debug!(
            "Card {}: {} -> {}",
            self.appointment_id,
            self.state.name(),
            next.name()
        );
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui_egui::haptics::{MockHapticFeedback, NoHaptics};
    use pretty_assertions::assert_eq;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn card() -> CardGeometry {
        CardGeometry::new(140.0, 136.0)
    }

    fn band() -> ViewportBand {
        ViewportBand { top: 0.0, bottom: 600.0 }
    }

    fn armed(t0: Instant, editor: &mut ActiveEditor) -> DragGestureController {
        let mut controller = DragGestureController::new("a", &GridConfig::default());
        controller.pointer_down(Pos2::new(100.0, 200.0), CardRegion::Body, card(), t0);
        controller.tick(t0 + LONG_PRESS, editor, &NoHaptics);
        assert!(controller.is_editing());
        controller
    }

    #[test]
    fn test_long_press_arms_with_haptic() {
        let t0 = Instant::now();
        let mut editor = ActiveEditor::new();
        let mut haptics = MockHapticFeedback::new();
        haptics
            .expect_impact()
            .withf(|style| *style == ImpactStyle::Medium)
            .times(1)
            .returning(|_| Ok(()));

        let mut controller = DragGestureController::new("a", &GridConfig::default());
        controller.pointer_down(Pos2::new(100.0, 200.0), CardRegion::Body, card(), t0);

        let early = controller.tick(t0 + ms(499), &mut editor, &haptics);
        assert!(!early.armed);
        assert_eq!(controller.state().name(), "pressing");

        let fired = controller.tick(t0 + ms(500), &mut editor, &haptics);
        assert!(fired.armed);
        assert!(editor.is_editing("a"));
        assert_eq!(controller.state().name(), "armed");
    }

    #[test]
    fn test_haptic_failure_does_not_block_arming() {
        let t0 = Instant::now();
        let mut editor = ActiveEditor::new();
        let mut haptics = MockHapticFeedback::new();
        haptics
            .expect_impact()
            .returning(|_| Err(crate::ui_egui::haptics::HapticError::Unavailable));

        let mut controller = DragGestureController::new("a", &GridConfig::default());
        controller.pointer_down(Pos2::new(100.0, 200.0), CardRegion::Body, card(), t0);
        assert!(controller.tick(t0 + LONG_PRESS, &mut editor, &haptics).armed);
    }

    #[test]
    fn test_moving_before_long_press_abandons_it() {
        let t0 = Instant::now();
        let mut editor = ActiveEditor::new();
        let mut controller = DragGestureController::new("a", &GridConfig::default());
        controller.pointer_down(Pos2::new(100.0, 200.0), CardRegion::Body, card(), t0);

        controller.pointer_move(Pos2::new(100.0, 215.0), band(), t0 + ms(100));
        assert_eq!(*controller.state(), GestureState::Idle);
        assert!(!controller.tick(t0 + ms(600), &mut editor, &NoHaptics).armed);
    }

    #[test]
    fn test_dead_zone_before_drag() {
        let t0 = Instant::now();
        let mut editor = ActiveEditor::new();
        let mut controller = armed(t0, &mut editor);

        let still = controller.pointer_move(Pos2::new(101.0, 201.0), band(), t0 + ms(600));
        assert_eq!(still.drag_state_changed, None);
        assert!(!controller.is_dragging());

        let moved = controller.pointer_move(Pos2::new(100.0, 210.0), band(), t0 + ms(610));
        assert_eq!(moved.drag_state_changed, Some(true));
        assert_eq!(moved.preview, Some(CardGeometry::new(150.0, 136.0)));
    }

    #[test]
    fn test_move_release_reports_raw_geometry() {
        let t0 = Instant::now();
        let mut editor = ActiveEditor::new();
        let mut controller = armed(t0, &mut editor);

        controller.pointer_move(Pos2::new(360.0, 250.0), band(), t0 + ms(600));
        let response = controller.pointer_up(t0 + ms(700), &mut editor);

        let release = response.release.unwrap();
        assert_eq!(release.mode, DragMode::Move);
        assert_eq!(release.geometry, CardGeometry::new(190.0, 136.0));
        assert_eq!(release.column_offset, 260.0);
        assert_eq!(response.drag_state_changed, Some(false));
        assert_eq!(*controller.state(), GestureState::Idle);
        assert_eq!(editor.active_id(), None);
    }

    #[test]
    fn test_resize_top_from_handle() {
        let t0 = Instant::now();
        let mut editor = ActiveEditor::new();
        let mut controller = armed(t0, &mut editor);
        controller.pointer_up(t0 + ms(550), &mut editor);
        assert!(controller.is_editing());

        controller.pointer_down(Pos2::new(100.0, 141.0), CardRegion::TopHandle, card(), t0 + ms(800));
        controller.pointer_move(Pos2::new(100.0, 106.0), band(), t0 + ms(850));
        let release = controller.pointer_up(t0 + ms(900), &mut editor).release.unwrap();

        assert_eq!(release.mode, DragMode::ResizeTop);
        assert_eq!(release.geometry, CardGeometry::new(105.0, 171.0));
        assert_eq!(release.column_offset, 0.0);
    }

    #[test]
    fn test_resize_bottom_collapses() {
        let t0 = Instant::now();
        let mut editor = ActiveEditor::new();
        let mut controller = armed(t0, &mut editor);
        controller.pointer_up(t0 + ms(550), &mut editor);

        controller.pointer_down(Pos2::new(100.0, 270.0), CardRegion::BottomHandle, card(), t0 + ms(800));
        controller.pointer_move(Pos2::new(100.0, 20.0), band(), t0 + ms(850));
        let release = controller.pointer_up(t0 + ms(900), &mut editor).release.unwrap();

        assert_eq!(release.geometry.height, 0.0);
        assert!(release.is_collapsed());
    }

    #[test]
    fn test_candidate_geometry_clamps() {
        let original = CardGeometry::new(35.0, 70.0);
        assert_eq!(candidate_geometry(DragMode::Move, original, -100.0).top, 0.0);
        assert_eq!(
            candidate_geometry(DragMode::ResizeTop, original, 200.0),
            CardGeometry::new(105.0, 0.0)
        );
        assert_eq!(
            candidate_geometry(DragMode::ResizeTop, original, -100.0),
            CardGeometry::new(0.0, 105.0)
        );
    }

    #[test]
    fn test_armed_times_out() {
        let t0 = Instant::now();
        let mut editor = ActiveEditor::new();
        let mut controller = armed(t0, &mut editor);
        controller.pointer_up(t0 + ms(550), &mut editor);

        assert!(!controller.tick(t0 + LONG_PRESS + ms(4_900), &mut editor, &NoHaptics).disarmed);
        let response = controller.tick(t0 + LONG_PRESS + ARMED_TIMEOUT, &mut editor, &NoHaptics);
        assert!(response.disarmed);
        assert_eq!(*controller.state(), GestureState::Idle);
        assert_eq!(editor.active_id(), None);
    }

    #[test]
    fn test_drag_cancels_timeout() {
        let t0 = Instant::now();
        let mut editor = ActiveEditor::new();
        let mut controller = armed(t0, &mut editor);
        controller.pointer_move(Pos2::new(100.0, 230.0), band(), t0 + ms(600));

        controller.tick(t0 + ms(7_000), &mut editor, &NoHaptics);
        assert!(controller.is_dragging());
    }

    #[test]
    fn test_losing_editor_cancels_without_release() {
        let t0 = Instant::now();
        let mut editor = ActiveEditor::new();
        let mut controller = armed(t0, &mut editor);
        controller.pointer_move(Pos2::new(100.0, 230.0), band(), t0 + ms(600));

        editor.request_edit_mode("b", true, t0 + ms(700));
        let response = controller.tick(t0 + ms(710), &mut editor, &NoHaptics);

        assert_eq!(response.drag_state_changed, Some(false));
        assert!(response.release.is_none());
        assert_eq!(*controller.state(), GestureState::Idle);
        assert!(controller.pointer_up(t0 + ms(720), &mut editor).release.is_none());
    }

    #[test]
    fn test_auto_scroll_near_edges() {
        let t0 = Instant::now();
        let mut editor = ActiveEditor::new();
        let mut controller = armed(t0, &mut editor);
        let band = ViewportBand { top: 100.0, bottom: 500.0 };

        let down = controller.pointer_move(Pos2::new(100.0, 470.0), band, t0 + ms(600));
        assert!((down.auto_scroll - 7.0).abs() < 1e-4);
        assert!(controller.edge_shading_visible(t0 + ms(700)));
        assert!(!controller.edge_shading_visible(t0 + ms(741)));

        let up = controller.pointer_move(Pos2::new(100.0, 90.0), band, t0 + ms(800));
        assert_eq!(up.auto_scroll, -14.0);

        let middle = controller.pointer_move(Pos2::new(100.0, 300.0), band, t0 + ms(900));
        assert_eq!(middle.auto_scroll, 0.0);
    }

    #[test]
    fn test_response_merge() {
        let mut a = GestureResponse {
            auto_scroll: 3.0,
            ..Default::default()
        };
        assert!(a.has_actions());
        a.merge(GestureResponse {
            auto_scroll: 2.0,
            armed: true,
            ..Default::default()
        });
        assert_eq!(a.auto_scroll, 5.0);
        assert!(a.armed);
        assert!(!GestureResponse::default().has_actions());
    }
}
