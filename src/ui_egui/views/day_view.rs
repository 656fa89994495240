use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::Local;
use egui::scroll_area::ScrollBarVisibility;
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};

use super::palette::DayGridPalette;
use super::utils::{drop_time_label, hour_label, parse_color};
use crate::error::{Result, SchedulerError};
use crate::models::appointment::Appointment;
use crate::models::settings::{GridConfig, Settings};
use crate::models::worker::Worker;
use crate::services::day_board::{CommitOutcome, DayBoard, MoveRequest, ResizeEdge};
use crate::services::geometry::{CardGeometry, GeometryMapper};
use crate::ui_egui::active_editor::ActiveEditor;
use crate::ui_egui::animation::{arm_feedback, edge_shade_fade, spring_back, Animation, TweenTarget};
use crate::ui_egui::drag::{
    DragGestureController, DragMode, DragRelease, GestureResponse, GestureState, ViewportBand,
};
use crate::ui_egui::haptics::{pulse, HapticFeedback, ImpactStyle};
use crate::ui_egui::resize::{draw_handles, HandleRects};
use crate::ui_egui::scroll_sync::{ScrollChannel, ScrollCommand, ScrollSynchronizer};

const HEADER_HEIGHT: f32 = 36.0;
/// Horizontal gap between a card and its column edges
const CARD_INSET: f32 = 4.0;
const FALLBACK_WORKER_COLOR: Color32 = Color32::from_rgb(158, 158, 158);

/// Interaction state carried between frames
#[derive(Default)]
pub struct DayViewState {
    controllers: HashMap<String, DragGestureController>,
    editor: ActiveEditor,
    scroll: ScrollSynchronizer,
    pending_scroll: Vec<ScrollCommand>,
    previews: HashMap<String, (CardGeometry, f32)>,
    animations: HashMap<String, Animation>,
    edge_shade: Option<(Animation, f32)>,
    dragging: bool,
}

impl DayViewState {
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn active_editor(&self) -> &ActiveEditor {
        &self.editor
    }

    /// Drop every gesture, e.g. when the date or filter changes
    pub fn reset_gestures(&mut self) {
        for controller in self.controllers.values_mut() {
            controller.cancel();
        }
        self.editor.clear();
        self.previews.clear();
        self.dragging = false;
    }

    fn is_busy(&self) -> bool {
        !self.pending_scroll.is_empty()
            || !self.animations.is_empty()
            || self.edge_shade.is_some()
            || self
                .controllers
                .values()
                .any(|controller| *controller.state() != GestureState::Idle)
    }
}

/// Result of one frame of the day view
#[derive(Default)]
pub struct DayViewResult {
    /// Move/resize commits resolved this frame
    pub outcomes: Vec<CommitOutcome>,
    /// `Some(true)` when a drag started, `Some(false)` when it ended
    pub drag_state_changed: Option<bool>,
}

impl DayViewResult {
    pub fn merge(&mut self, other: DayViewResult) {
        self.outcomes.extend(other.outcomes);
        if other.drag_state_changed.is_some() {
            self.drag_state_changed = other.drag_state_changed;
        }
    }

    pub fn has_actions(&self) -> bool {
        !self.outcomes.is_empty() || self.drag_state_changed.is_some()
    }
}

/// Turn a finished drag into a move or resize commit.
///
/// `origin_column` is the card's column when the drag began.
pub fn commit_release(
    board: &mut DayBoard,
    id: &str,
    release: DragRelease,
    origin_column: usize,
    column_width: f32,
) -> Result<CommitOutcome> {
    if release.is_collapsed() {
        let original = board
            .get(id)
            .cloned()
            .ok_or_else(|| SchedulerError::unknown_appointment(id))?;
        log::debug!("Card {} collapsed on release, springing back", id);
        return Ok(CommitOutcome::Rejected(original));
    }

    match release.mode {
        DragMode::Move => {
            let columns = board.visible_workers().len();
            let column = GeometryMapper::new(board.config()).column_after_shift(
                origin_column,
                release.column_offset,
                column_width,
                columns,
            );
            board.on_move(MoveRequest::from_pixels(id, column, release.geometry.top))
        }
        DragMode::ResizeTop => board.on_resize_edge(id, ResizeEdge::Top, release.geometry),
        DragMode::ResizeBottom => board.on_resize_edge(id, ResizeEdge::Bottom, release.geometry),
    }
}

struct CardLayout {
    appointment: Appointment,
    column: usize,
    geometry: CardGeometry,
    color: Color32,
}

fn card_rect(origin: Pos2, column: usize, column_width: f32, geometry: CardGeometry) -> Rect {
    Rect::from_min_size(
        Pos2::new(
            origin.x + column as f32 * column_width + CARD_INSET,
            origin.y + geometry.top,
        ),
        Vec2::new((column_width - 2.0 * CARD_INSET).max(1.0), geometry.height.max(0.0)),
    )
}

pub struct DayView;

impl DayView {
    pub fn show(
        ui: &mut egui::Ui,
        board: &mut DayBoard,
        state: &mut DayViewState,
        settings: &Settings,
        haptics: &dyn HapticFeedback,
    ) -> DayViewResult {
        let now = Instant::now();
        let config = board.config().clone();
        let palette = DayGridPalette::from_ui(ui);
        let workers: Vec<Worker> = board.visible_workers().into_iter().cloned().collect();
        let mapper = GeometryMapper::new(&config);
        let column_width = mapper.column_width(ui.available_width(), workers.len());
        let content_size = Vec2::new(
            column_width * workers.len().max(1) as f32,
            config.content_height(),
        );

        state.scroll.tick(now);
        let commands = std::mem::take(&mut state.pending_scroll);
        let forced = |channel: ScrollChannel| {
            commands
                .iter()
                .rev()
                .find(|command| command.channel == channel)
                .map(|command| command.offset)
        };
        let scrolling_enabled = !state.dragging;
        let mut reports: Vec<(ScrollChannel, f32)> = Vec::new();
        let mut viewport_height = 0.0;
        let mut result = DayViewResult::default();

        ui.horizontal(|ui| {
            ui.add_space(config.time_label_width);
            let mut area = egui::ScrollArea::horizontal()
                .id_source("day_header")
                .auto_shrink([false, true])
                .scroll_bar_visibility(ScrollBarVisibility::AlwaysHidden)
                .enable_scrolling(scrolling_enabled);
            if let Some(x) = forced(ScrollChannel::Header) {
                area = area.horizontal_scroll_offset(x);
            }
            let output = area.show(ui, |ui| {
                Self::paint_header(ui, board, &workers, column_width, content_size.x, &palette)
            });
            reports.push((ScrollChannel::Header, output.state.offset.x));
        });

        ui.horizontal_top(|ui| {
            let mut area = egui::ScrollArea::vertical()
                .id_source("day_time_column")
                .auto_shrink([true, false])
                .max_width(config.time_label_width)
                .scroll_bar_visibility(ScrollBarVisibility::AlwaysHidden)
                .enable_scrolling(scrolling_enabled);
            if let Some(y) = forced(ScrollChannel::TimeColumn) {
                area = area.vertical_scroll_offset(y);
            }
            let output = area.show(ui, |ui| Self::paint_time_column(ui, &config, settings, &palette));
            reports.push((ScrollChannel::TimeColumn, output.state.offset.y));

            let mut area = egui::ScrollArea::both()
                .id_source("day_content")
                .auto_shrink([false, false])
                .enable_scrolling(scrolling_enabled);
            if let Some(x) = forced(ScrollChannel::ContentHorizontal) {
                area = area.horizontal_scroll_offset(x);
            }
            if let Some(y) = forced(ScrollChannel::ContentVertical) {
                area = area.vertical_scroll_offset(y);
            }
            let output = area.show(ui, |ui| {
                Self::show_content(
                    ui,
                    board,
                    state,
                    &workers,
                    column_width,
                    content_size,
                    &palette,
                    haptics,
                    now,
                    &mut result,
                )
            });
            reports.push((ScrollChannel::ContentHorizontal, output.state.offset.x));
            reports.push((ScrollChannel::ContentVertical, output.state.offset.y));
            viewport_height = output.inner_rect.height();
        });

        for (channel, offset) in reports {
            if let Some(command) = state.scroll.on_scroll(channel, offset, now) {
                state.pending_scroll.push(command);
            }
        }
        let auto_scroll = state
            .scroll
            .flush_frame(now, content_size.y, viewport_height);
        state.pending_scroll.extend(auto_scroll);

        if state.is_busy() {
            ui.ctx().request_repaint();
        } else {
            // Keeps the current-time line moving
            ui.ctx().request_repaint_after(Duration::from_secs(30));
        }

        result
    }

    fn paint_header(
        ui: &mut egui::Ui,
        board: &DayBoard,
        workers: &[Worker],
        column_width: f32,
        width: f32,
        palette: &DayGridPalette,
    ) {
        let (rect, _) = ui.allocate_exact_size(Vec2::new(width, HEADER_HEIGHT), Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, palette.header_bg);

        for (column, worker) in workers.iter().enumerate() {
            let left = rect.left() + column as f32 * column_width;
            let cell = Rect::from_min_size(Pos2::new(left, rect.top()), Vec2::new(column_width, HEADER_HEIGHT));
            let color = parse_color(&worker.color).unwrap_or(FALLBACK_WORKER_COLOR);

            painter.rect_filled(
                Rect::from_min_max(Pos2::new(cell.left(), cell.bottom() - 3.0), cell.max),
                0.0,
                color,
            );
            painter.text(
                cell.center(),
                Align2::CENTER_CENTER,
                format!("{} ({})", worker.name, board.index().load_of(&worker.name)),
                FontId::proportional(14.0),
                palette.header_text,
            );
            painter.vline(cell.right(), cell.y_range(), Stroke::new(1.0, palette.column_divider));
        }
    }

    fn paint_time_column(ui: &mut egui::Ui, config: &GridConfig, settings: &Settings, palette: &DayGridPalette) {
        let (rect, _) = ui.allocate_exact_size(
            Vec2::new(config.time_label_width, config.content_height()),
            Sense::hover(),
        );
        let painter = ui.painter_at(rect);
        let mapper = GeometryMapper::new(config);

        for hour in config.start_hour..config.end_hour {
            let y = rect.top() + mapper.minutes_to_y((hour * 60) as i32);
            painter.text(
                Pos2::new(rect.right() - 6.0, y + 2.0),
                Align2::RIGHT_TOP,
                hour_label(hour, &settings.time_format),
                FontId::proportional(12.0),
                palette.label_text,
            );
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn show_content(
        ui: &mut egui::Ui,
        board: &mut DayBoard,
        state: &mut DayViewState,
        workers: &[Worker],
        column_width: f32,
        content_size: Vec2,
        palette: &DayGridPalette,
        haptics: &dyn HapticFeedback,
        now: Instant,
        result: &mut DayViewResult,
    ) {
        // Only claim drags while a card is armed so plain drags still scroll
        let sense = if state.editor.active_id().is_some() {
            Sense::click_and_drag()
        } else {
            Sense::click()
        };
        let (rect, _) = ui.allocate_exact_size(content_size, sense);
        let clip = ui.clip_rect();
        let painter = ui.painter_at(rect);
        let config = board.config().clone();
        let mapper = GeometryMapper::new(&config);

        Self::paint_grid(&painter, rect, &config, workers.len(), column_width, palette);

        let cards: Vec<CardLayout> = board
            .visible_appointments()
            .into_iter()
            .filter_map(|appointment| {
                let column = board.column_of(&appointment.worker_name)?;
                let color = workers
                    .get(column)
                    .and_then(|worker| parse_color(&worker.color))
                    .unwrap_or(FALLBACK_WORKER_COLOR);
                Some(CardLayout {
                    appointment: appointment.clone(),
                    column,
                    geometry: mapper.time_range_to_geometry(appointment.start, appointment.end),
                    color,
                })
            })
            .collect();

        for card in &cards {
            state
                .controllers
                .entry(card.appointment.id.clone())
                .or_insert_with(|| DragGestureController::new(card.appointment.id.clone(), &config));
        }
        state.controllers.retain(|id, controller| {
            *controller.state() != GestureState::Idle || cards.iter().any(|card| &card.appointment.id == id)
        });

        let (pressed, released, pointer) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
            )
        });
        let to_content = |pos: Pos2| Pos2::new(pos.x - rect.left(), pos.y - rect.top());
        let band = ViewportBand {
            top: clip.top() - rect.top(),
            bottom: clip.bottom() - rect.top(),
        };

        if pressed {
            if let Some(pos) = pointer.filter(|pos| clip.contains(*pos)) {
                Self::route_press(state, &cards, rect.min, column_width, pos, to_content(pos), now);
            }
        }

        let mut releases = Vec::new();
        let mut displaced = Vec::new();
        let active: Vec<String> = state
            .controllers
            .iter()
            .filter(|(_, controller)| *controller.state() != GestureState::Idle)
            .map(|(id, _)| id.clone())
            .collect();

        for id in active {
            let Some(controller) = state.controllers.get_mut(&id) else {
                continue;
            };
            let mut response = controller.tick(now, &mut state.editor, haptics);
            if let Some(pos) = pointer {
                response.merge(controller.pointer_move(to_content(pos), band, now));
            }
            if released {
                response.merge(controller.pointer_up(now, &mut state.editor));
            }

            if let Some(other) = response.displaced.take() {
                displaced.push(other);
            }
            if let Some(release) = response.release {
                releases.push((id.clone(), release));
            }
            Self::apply_response(state, &id, response, now, result);
        }

        for id in displaced {
            if let Some(controller) = state.controllers.get_mut(&id) {
                let response = controller.cancel();
                Self::apply_response(state, &id, response, now, result);
            }
        }

        Self::commit_releases(board, state, &cards, releases, column_width, haptics, now, result);

        Self::paint_cards(ui, &painter, rect, state, &cards, &config, column_width, palette, pointer, now);
        Self::paint_overlays(&painter, rect, clip, board, &config, state, palette, now);

        state.animations.retain(|_, animation| !animation.is_finished(now));
        if state
            .edge_shade
            .as_ref()
            .map_or(false, |(animation, _)| animation.is_finished(now))
        {
            state.edge_shade = None;
        }
    }

    /// Commit each finished drag against the cards laid out this frame
    #[allow(clippy::too_many_arguments)]
    fn commit_releases(
        board: &mut DayBoard,
        state: &mut DayViewState,
        cards: &[CardLayout],
        releases: Vec<(String, DragRelease)>,
        column_width: f32,
        haptics: &dyn HapticFeedback,
        now: Instant,
        result: &mut DayViewResult,
    ) {
        for (id, release) in releases {
            let Some(origin_column) = cards
                .iter()
                .find(|card| card.appointment.id == id)
                .map(|card| card.column)
            else {
                log::warn!("Card {} vanished before its drop was committed", id);
                continue;
            };
            match commit_release(board, &id, release, origin_column, column_width) {
                Ok(CommitOutcome::Rejected(original)) => {
                    state.animations.insert(
                        id.clone(),
                        Animation::start(
                            spring_back(release.geometry, release.original, release.column_offset),
                            now,
                        ),
                    );
                    result.outcomes.push(CommitOutcome::Rejected(original));
                }
                Ok(applied) => {
                    pulse(haptics, ImpactStyle::Light);
                    result.outcomes.push(applied);
                }
                Err(e) => log::warn!("Dropping gesture on {}: {}", id, e),
            }
        }
    }

    fn route_press(
        state: &mut DayViewState,
        cards: &[CardLayout],
        origin: Pos2,
        column_width: f32,
        screen_pos: Pos2,
        content_pos: Pos2,
        now: Instant,
    ) {
        // Topmost card wins; the armed card is drawn last
        let hit = cards
            .iter()
            .rev()
            .filter_map(|card| {
                let controller = state.controllers.get(&card.appointment.id)?;
                let handles = HandleRects::for_card(card_rect(origin, card.column, column_width, card.geometry));
                let region = handles.hit_test(screen_pos, controller.is_editing())?;
                Some((controller.is_editing(), card.appointment.id.clone(), region, card.geometry))
            })
            .min_by_key(|(editing, ..)| !*editing);

        match hit {
            Some((_, id, region, geometry)) => {
                if let Some(controller) = state.controllers.get_mut(&id) {
                    controller.pointer_down(content_pos, region, geometry, now);
                }
            }
            None => {
                if let Some(id) = state.editor.tap_empty_space(now) {
                    if let Some(controller) = state.controllers.get_mut(&id) {
                        controller.cancel();
                    }
                }
            }
        }
    }

    fn apply_response(
        state: &mut DayViewState,
        id: &str,
        response: GestureResponse,
        now: Instant,
        result: &mut DayViewResult,
    ) {
        if response.armed {
            state
                .animations
                .insert(id.to_string(), Animation::start(arm_feedback(), now));
        }
        if let Some(preview) = response.preview {
            state
                .previews
                .insert(id.to_string(), (preview, response.column_offset));
        }
        if response.auto_scroll != 0.0 {
            state.scroll.request_auto_scroll(response.auto_scroll);
            state.edge_shade = Some((
                Animation::start(edge_shade_fade(), now),
                response.auto_scroll.signum(),
            ));
        }
        if let Some(dragging) = response.drag_state_changed {
            state.dragging = dragging;
            result.drag_state_changed = Some(dragging);
            if !dragging {
                state.previews.remove(id);
            }
        }
    }

    fn paint_grid(
        painter: &egui::Painter,
        rect: Rect,
        config: &GridConfig,
        columns: usize,
        column_width: f32,
        palette: &DayGridPalette,
    ) {
        painter.rect_filled(rect, 0.0, palette.grid_bg);

        for slot in 0..=config.slot_count() {
            let y = rect.top() + slot as f32 * config.slot_pixel_height;
            let on_hour = (slot as u32 * config.slot_minutes) % 60 == 0;
            let stroke = if on_hour {
                Stroke::new(1.0, palette.hour_line)
            } else {
                Stroke::new(0.5, palette.slot_line)
            };
            painter.hline(rect.x_range(), y, stroke);
        }

        for column in 1..columns {
            let x = rect.left() + column as f32 * column_width;
            painter.vline(x, rect.y_range(), Stroke::new(1.0, palette.column_divider));
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn paint_cards(
        ui: &egui::Ui,
        painter: &egui::Painter,
        rect: Rect,
        state: &DayViewState,
        cards: &[CardLayout],
        config: &GridConfig,
        column_width: f32,
        palette: &DayGridPalette,
        pointer: Option<Pos2>,
        now: Instant,
    ) {
        let dark = ui.visuals().dark_mode;
        let mapper = GeometryMapper::new(config);
        let (resting, editing): (Vec<&CardLayout>, Vec<&CardLayout>) = cards
            .iter()
            .partition(|card| !state.editor.is_editing(&card.appointment.id));

        for card in resting.into_iter().chain(editing) {
            let id = &card.appointment.id;
            let mut geometry = card.geometry;
            let mut shift = 0.0;
            let mut scale = 1.0;
            let mut handle_opacity = 1.0;

            if let Some((preview, offset)) = state.previews.get(id) {
                geometry = *preview;
                shift = *offset;
            }
            if let Some(animation) = state.animations.get(id) {
                geometry.top = animation.value(TweenTarget::CardTop, now).unwrap_or(geometry.top);
                geometry.height = animation
                    .value(TweenTarget::CardHeight, now)
                    .unwrap_or(geometry.height);
                shift = animation.value(TweenTarget::CardShift, now).unwrap_or(shift);
                scale = animation.value(TweenTarget::CardScale, now).unwrap_or(scale);
                handle_opacity = animation
                    .value(TweenTarget::HandleOpacity, now)
                    .unwrap_or(handle_opacity);
            }

            let base = card_rect(rect.min, card.column, column_width, geometry).translate(Vec2::new(shift, 0.0));
            let card_area = Rect::from_center_size(base.center(), base.size() * scale);
            let is_editing = state.editor.is_editing(id);
            Self::paint_card(painter, card_area, &card.appointment, card.color, is_editing, palette, dark);

            if is_editing {
                let handles = HandleRects::for_card(card_area);
                let hovered = pointer.and_then(|pos| handles.hit_test(pos, true));
                if let Some(region) = hovered {
                    ui.ctx().set_cursor_icon(region.cursor_icon());
                }
                draw_handles(
                    ui,
                    &handles,
                    hovered.filter(|region| region.is_handle()),
                    card.color.linear_multiply(handle_opacity),
                );
            }

            if state.previews.contains_key(id) {
                let label = drop_time_label(
                    mapper.pixel_delta_to_slot_delta(geometry.top),
                    config.start_hour,
                    config.slot_minutes,
                );
                painter.text(
                    Pos2::new(card_area.right() - 6.0, card_area.top() + 4.0),
                    Align2::RIGHT_TOP,
                    label,
                    FontId::monospace(12.0),
                    palette.card_text,
                );
            }
        }
    }

    fn paint_card(
        painter: &egui::Painter,
        area: Rect,
        appointment: &Appointment,
        color: Color32,
        editing: bool,
        palette: &DayGridPalette,
        dark: bool,
    ) {
        let fill = palette.card_fill(color, dark);
        let stroke = if editing {
            Stroke::new(2.0, color)
        } else {
            Stroke::new(1.0, color.linear_multiply(0.7))
        };
        painter.rect(area, 6.0, fill, stroke);
        painter.rect_filled(
            Rect::from_min_size(area.min, Vec2::new(4.0, area.height())),
            2.0,
            color,
        );

        let text_painter = painter.with_clip_rect(area.shrink(2.0));
        let left = area.left() + 10.0;
        let mut y = area.top() + 4.0;
        let lines = [
            (appointment.client.name.clone(), FontId::proportional(13.0)),
            (
                format!(
                    "{} - {}",
                    appointment.start.format("%H:%M"),
                    appointment.end.format("%H:%M")
                ),
                FontId::proportional(11.0),
            ),
            (
                appointment
                    .line_items
                    .iter()
                    .map(|line| line.service_name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                FontId::proportional(11.0),
            ),
            (appointment.status.label().to_string(), FontId::proportional(10.0)),
        ];
        for (text, font) in lines {
            if text.is_empty() {
                continue;
            }
            let size = font.size;
            text_painter.text(Pos2::new(left, y), Align2::LEFT_TOP, text, font, palette.card_text);
            y += size + 3.0;
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn paint_overlays(
        painter: &egui::Painter,
        rect: Rect,
        clip: Rect,
        board: &DayBoard,
        config: &GridConfig,
        state: &DayViewState,
        palette: &DayGridPalette,
        now: Instant,
    ) {
        let local_now = Local::now();
        if board.date() == local_now.date_naive() {
            if let Some(y) = GeometryMapper::new(config).now_indicator_y(local_now.time()) {
                let y = rect.top() + y;
                painter.hline(rect.x_range(), y, Stroke::new(2.0, palette.now_line));
                painter.circle_filled(Pos2::new(rect.left() + 3.0, y), 4.0, palette.now_line);
            }
        }

        if let Some((animation, direction)) = &state.edge_shade {
            let alpha = animation.value(TweenTarget::EdgeShade, now).unwrap_or(0.0);
            let band = if *direction < 0.0 {
                Rect::from_min_size(clip.min, Vec2::new(clip.width(), config.edge_threshold))
            } else {
                Rect::from_min_max(
                    Pos2::new(clip.left(), clip.bottom() - config.edge_threshold),
                    clip.max,
                )
            };
            painter.rect_filled(band, 0.0, palette.edge_shade.linear_multiply(alpha));
        }
    }
}
