//! Keeps the header, hour column and grid content scrolled in lock-step.
//!
//! Each channel has a guard that is set while the synchronizer itself is
//! driving it. Offsets reported by a guarded channel are recorded but not
//! forwarded, which breaks the header → content → header feedback loop.
//! Guards clear [`GUARD_WINDOW`] after they were set.

use std::time::{Duration, Instant};

use crate::utils::time::clamp;

pub const GUARD_WINDOW: Duration = Duration::from_millis(50);

/// One scroll axis of one pane
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollChannel {
    /// Worker names, horizontal
    Header,
    /// Hour labels, vertical
    TimeColumn,
    ContentHorizontal,
    ContentVertical,
}

impl ScrollChannel {
    pub const ALL: [ScrollChannel; 4] = [
        ScrollChannel::Header,
        ScrollChannel::TimeColumn,
        ScrollChannel::ContentHorizontal,
        ScrollChannel::ContentVertical,
    ];

    /// The channel this one mirrors
    pub fn partner(self) -> ScrollChannel {
        match self {
            ScrollChannel::Header => ScrollChannel::ContentHorizontal,
            ScrollChannel::ContentHorizontal => ScrollChannel::Header,
            ScrollChannel::TimeColumn => ScrollChannel::ContentVertical,
            ScrollChannel::ContentVertical => ScrollChannel::TimeColumn,
        }
    }

    fn index(self) -> usize {
        match self {
            ScrollChannel::Header => 0,
            ScrollChannel::TimeColumn => 1,
            ScrollChannel::ContentHorizontal => 2,
            ScrollChannel::ContentVertical => 3,
        }
    }
}

/// Programmatic scroll the host must apply to a pane
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollCommand {
    pub channel: ScrollChannel,
    pub offset: f32,
}

#[derive(Clone, Copy, Debug, Default)]
struct ChannelState {
    offset: f32,
    driven_until: Option<Instant>,
}

#[derive(Debug, Default)]
pub struct ScrollSynchronizer {
    channels: [ChannelState; 4],
    pending_auto_scroll: f32,
}

impl ScrollSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self, channel: ScrollChannel) -> f32 {
        self.channels[channel.index()].offset
    }

    /// True while the synchronizer is driving `channel`
    pub fn is_guarded(&self, channel: ScrollChannel) -> bool {
        self.channels[channel.index()].driven_until.is_some()
    }

    /// Clear guards whose window has passed
    pub fn tick(&mut self, now: Instant) {
        for state in &mut self.channels {
            if state.driven_until.map_or(false, |until| now >= until) {
                state.driven_until = None;
            }
        }
    }

    /// A pane reported its scroll offset.
    ///
    /// Returns the command that mirrors it onto the partner pane, or `None`
    /// when nothing changed or the report came from a guarded channel.
    pub fn on_scroll(&mut self, channel: ScrollChannel, offset: f32, now: Instant) -> Option<ScrollCommand> {
        self.tick(now);

        let state = &mut self.channels[channel.index()];
        if state.offset == offset {
            return None;
        }
        state.offset = offset;

        if state.driven_until.is_some() {
            log::debug!("Scroll from {:?} suppressed by guard", channel);
            return None;
        }

        let partner = channel.partner();
        if self.offset(partner) == offset {
            return None;
        }
        Some(self.drive(partner, offset, now))
    }

    /// Queue an auto-scroll delta; applied on the next [`flush_frame`](Self::flush_frame)
    pub fn request_auto_scroll(&mut self, delta: f32) {
        self.pending_auto_scroll += delta;
    }

    pub fn pending_auto_scroll(&self) -> f32 {
        self.pending_auto_scroll
    }

    /// Apply the queued auto-scroll once for this frame.
    ///
    /// The vertical offset is clamped to the scrollable range and moves the
    /// content and the hour column together.
    pub fn flush_frame(&mut self, now: Instant, content_height: f32, viewport_height: f32) -> Vec<ScrollCommand> {
        self.tick(now);

        let delta = std::mem::take(&mut self.pending_auto_scroll);
        if delta == 0.0 {
            return Vec::new();
        }

        let max_offset = (content_height - viewport_height).max(0.0);
        let current = self.offset(ScrollChannel::ContentVertical);
        let target = clamp(current + delta, 0.0, max_offset);
        if target == current && self.offset(ScrollChannel::TimeColumn) == target {
            return Vec::new();
        }

        vec![
            self.drive(ScrollChannel::ContentVertical, target, now),
            self.drive(ScrollChannel::TimeColumn, target, now),
        ]
    }

    fn drive(&mut self, channel: ScrollChannel, offset: f32, now: Instant) -> ScrollCommand {
        let state = &mut self.channels[channel.index()];
        state.offset = offset;
        state.driven_until = Some(now + GUARD_WINDOW);
        ScrollCommand { channel, offset }
    }
}
