//! Declarative tween graph.
//!
//! A [`Timeline`] is a tree of tweens played in parallel or in sequence.
//! Nothing here owns a clock: callers sample a timeline with the time elapsed
//! since it started, which keeps the frame loop in charge of timing.

use std::time::{Duration, Instant};

use crate::services::geometry::CardGeometry;
use crate::ui_egui::drag::EDGE_SHADE_FADE;

/// Spring-back after a rejected or collapsed drop
pub const SPRING_BACK: Duration = Duration::from_millis(200);
const HANDLE_REVEAL: Duration = Duration::from_millis(150);
const ARM_POP_UP: Duration = Duration::from_millis(90);
const ARM_POP_DOWN: Duration = Duration::from_millis(110);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseOut,
    EaseInOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            // Cubic
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Animated property of a card or the grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TweenTarget {
    CardTop,
    CardHeight,
    /// Horizontal offset from the card's own column
    CardShift,
    CardScale,
    HandleOpacity,
    EdgeShade,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub target: TweenTarget,
    pub from: f32,
    pub to: f32,
    pub duration: Duration,
    pub delay: Duration,
    pub easing: Easing,
}

impl Tween {
    pub fn new(target: TweenTarget, from: f32, to: f32, duration: Duration, easing: Easing) -> Self {
        Self {
            target,
            from,
            to,
            duration,
            delay: Duration::ZERO,
            easing,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn value_at(&self, elapsed: Duration) -> f32 {
        let Some(local) = elapsed.checked_sub(self.delay) else {
            return self.from;
        };
        if self.duration.is_zero() {
            return self.to;
        }
        let t = local.as_secs_f32() / self.duration.as_secs_f32();
        self.from + (self.to - self.from) * self.easing.apply(t)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Timeline {
    Tween(Tween),
    Parallel(Vec<Timeline>),
    Sequence(Vec<Timeline>),
}

impl Timeline {
    pub fn duration(&self) -> Duration {
        match self {
            Timeline::Tween(tween) => tween.delay + tween.duration,
            Timeline::Parallel(children) => children
                .iter()
                .map(Timeline::duration)
                .max()
                .unwrap_or_default(),
            Timeline::Sequence(children) => children.iter().map(Timeline::duration).sum(),
        }
    }

    /// Values of every started tween at `elapsed`; later entries win
    pub fn sample(&self, elapsed: Duration) -> Vec<(TweenTarget, f32)> {
        let mut values = Vec::new();
        self.sample_into(elapsed, &mut values);
        values
    }

    pub fn value(&self, target: TweenTarget, elapsed: Duration) -> Option<f32> {
        self.sample(elapsed)
            .into_iter()
            .rev()
            .find(|(t, _)| *t == target)
            .map(|(_, value)| value)
    }

    fn sample_into(&self, elapsed: Duration, out: &mut Vec<(TweenTarget, f32)>) {
        match self {
            Timeline::Tween(tween) => out.push((tween.target, tween.value_at(elapsed))),
            Timeline::Parallel(children) => {
                for child in children {
                    child.sample_into(elapsed, out);
                }
            }
            Timeline::Sequence(children) => {
                let mut offset = Duration::ZERO;
                for child in children {
                    let Some(local) = elapsed.checked_sub(offset) else {
                        break;
                    };
                    child.sample_into(local, out);
                    offset += child.duration();
                }
            }
        }
    }
}

/// Card slides from where it was dropped back to its original place
pub fn spring_back(dropped: CardGeometry, original: CardGeometry, column_offset: f32) -> Timeline {
    let tween = |target, from, to| Timeline::Tween(Tween::new(target, from, to, SPRING_BACK, Easing::EaseOut));
    Timeline::Parallel(vec![
        tween(TweenTarget::CardTop, dropped.top, original.top),
        tween(TweenTarget::CardHeight, dropped.height.max(0.0), original.height),
        tween(TweenTarget::CardShift, column_offset, 0.0),
    ])
}

/// Small pop while the handles fade in
pub fn arm_feedback() -> Timeline {
    Timeline::Parallel(vec![
        Timeline::Sequence(vec![
            Timeline::Tween(Tween::new(TweenTarget::CardScale, 1.0, 1.03, ARM_POP_UP, Easing::EaseOut)),
            Timeline::Tween(Tween::new(TweenTarget::CardScale, 1.03, 1.0, ARM_POP_DOWN, Easing::EaseInOut)),
        ]),
        Timeline::Tween(Tween::new(TweenTarget::HandleOpacity, 0.0, 1.0, HANDLE_REVEAL, Easing::EaseOut)),
    ])
}

pub fn edge_shade_fade() -> Timeline {
    Timeline::Tween(Tween::new(TweenTarget::EdgeShade, 1.0, 0.0, EDGE_SHADE_FADE, Easing::Linear))
}

/// A timeline bound to its start instant
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    timeline: Timeline,
    started: Instant,
}

impl Animation {
    pub fn start(timeline: Timeline, now: Instant) -> Self {
        Self { timeline, started: now }
    }

    pub fn value(&self, target: TweenTarget, now: Instant) -> Option<f32> {
        self.timeline
            .value(target, now.saturating_duration_since(self.started))
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.timeline.duration()
    }
}
