//! Decorative market background: drifting particles, chart lines and glows.
//!
//! Nothing here affects behavior; the only contract is that a missing
//! container is a silent no-op.

use rand::Rng;
use ratatui::layout::Rect;
use std::collections::{HashMap, HashSet};
use std::f32::consts::TAU;
use std::time::{Duration, Instant};

pub const PARTICLE_COUNT: usize = 100;
pub const CHART_LINE_COUNT: usize = 8;
pub const GLOW_COUNT: usize = 3;

/// Pixel size assumed for a terminal cell when converting parallax offsets.
const CELL_WIDTH_PX: f32 = 8.0;
const CELL_HEIGHT_PX: f32 = 16.0;

const TWINKLE_PERIOD_SECS: f32 = 15.0;
const GLOW_PERIOD_SECS: f32 = 5.0;

/// How many elements of each kind to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementCounts {
    pub particles: usize,
    pub chart_lines: usize,
    pub glows: usize,
}

impl Default for ElementCounts {
    fn default() -> Self {
        Self {
            particles: PARTICLE_COUNT,
            chart_lines: CHART_LINE_COUNT,
            glows: GLOW_COUNT,
        }
    }
}

/// A star-like data point. Positions are percentages of the container.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub left: f32,
    pub top: f32,
    /// 1..4, also drives the parallax speed
    pub size: f32,
    pub opacity: f32,
    pub delay: f32,
    /// Parallax translation in pixels.
    pub translate: (f32, f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartLine {
    pub top: f32,
    pub width: f32,
    pub delay: f32,
    pub duration: f32,
    pub translate_x: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Glow {
    pub left: f32,
    pub top: f32,
    pub delay: f32,
}

/// What a sprite represents, so the renderer can pick a style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Particle,
    ChartLine,
    Glow,
}

/// One cell to paint for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub x: u16,
    pub y: u16,
    pub symbol: char,
    /// 0.0..=1.0
    pub intensity: f32,
    pub kind: SpriteKind,
}

/// The generated decoration for one container.
#[derive(Debug, Clone, Default)]
pub struct Background {
    particles: Vec<Particle>,
    chart_lines: Vec<ChartLine>,
    glows: Vec<Glow>,
}

impl Background {
    /// Populate `container` with the default element counts. A missing or
    /// zero-sized container yields an empty background.
    #[cfg(test)]
    pub fn init<R: Rng>(container: Option<Rect>, rng: &mut R) -> Self {
        Self::init_with(container, ElementCounts::default(), rng)
    }

    pub fn init_with<R: Rng>(container: Option<Rect>, counts: ElementCounts, rng: &mut R) -> Self {
        let Some(area) = container else {
            return Self::default();
        };
        if area.is_empty() {
            return Self::default();
        }

        let particles = (0..counts.particles)
            .map(|_| Particle {
                left: rng.gen_range(0.0..100.0),
                top: rng.gen_range(0.0..100.0),
                size: rng.gen_range(1.0..4.0),
                opacity: rng.gen_range(0.3..0.8),
                delay: rng.gen_range(0.0..15.0),
                translate: (0.0, 0.0),
            })
            .collect();

        let chart_lines = (0..counts.chart_lines)
            .map(|i| ChartLine {
                top: 20.0 + i as f32 * 10.0,
                width: rng.gen_range(20.0..50.0),
                delay: rng.gen_range(0.0..10.0),
                duration: rng.gen_range(15.0..25.0),
                translate_x: 0.0,
            })
            .collect();

        let glows = (0..counts.glows)
            .map(|_| Glow {
                left: rng.gen_range(0.0..80.0),
                top: rng.gen_range(0.0..80.0),
                delay: rng.gen_range(0.0..5.0),
            })
            .collect();

        Self {
            particles,
            chart_lines,
            glows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.element_count() == 0
    }

    pub fn element_count(&self) -> usize {
        self.particles.len() + self.chart_lines.len() + self.glows.len()
    }

    #[cfg(test)]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[cfg(test)]
    pub fn chart_lines(&self) -> &[ChartLine] {
        &self.chart_lines
    }

    #[cfg(test)]
    pub fn glows(&self) -> &[Glow] {
        &self.glows
    }

    /// Parallax for a pointer at `(x, y)`, both normalised to `0..=1`.
    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        let x = x.clamp(0.0, 1.0);
        let y = y.clamp(0.0, 1.0);
        for particle in &mut self.particles {
            let speed = particle.size * 0.5;
            particle.translate = (x * speed, y * speed);
        }
        for line in &mut self.chart_lines {
            line.translate_x = x * 10.0;
        }
    }

    /// Cells to paint inside `area` at `elapsed` since startup.
    pub fn sprites(&self, area: Rect, elapsed: Duration) -> Vec<Sprite> {
        if area.is_empty() {
            return Vec::new();
        }
        let t = elapsed.as_secs_f32();
        let mut out = Vec::with_capacity(self.element_count() * 4);

        for glow in &self.glows {
            let pulse = 0.5 + 0.5 * (TAU * (t + glow.delay) / GLOW_PERIOD_SECS).sin();
            let cx = percent_to_cell(area.x, area.width, glow.left, 0.0, CELL_WIDTH_PX);
            let cy = percent_to_cell(area.y, area.height, glow.top, 0.0, CELL_HEIGHT_PX);
            for dy in 0..3u16 {
                for dx in 0..9u16 {
                    let (x, y) = (cx.saturating_add(dx), cy.saturating_add(dy));
                    if x < area.right() && y < area.bottom() {
                        let edge = (dx as f32 - 4.0).abs() / 4.0 + (dy as f32 - 1.0).abs() / 2.0;
                        let intensity = (pulse * (1.0 - edge / 2.0) * 0.35).clamp(0.0, 1.0);
                        out.push(Sprite {
                            x,
                            y,
                            symbol: '░',
                            intensity,
                            kind: SpriteKind::Glow,
                        });
                    }
                }
            }
        }

        for line in &self.chart_lines {
            let len = ((line.width / 100.0) * area.width as f32).round().max(1.0) as i32;
            let progress = ((t - line.delay) / line.duration).rem_euclid(1.0);
            let travel = area.width as i32 + len;
            let offset = (line.translate_x / CELL_WIDTH_PX).round() as i32;
            let start = area.x as i32 - len + (progress * travel as f32) as i32 + offset;
            let y = percent_to_cell(area.y, area.height, line.top, 0.0, CELL_HEIGHT_PX);
            if y >= area.bottom() {
                continue;
            }
            for i in 0..len {
                let x = start + i;
                if x >= area.x as i32 && x < area.right() as i32 {
                    // fade in at the tail, brightest at the head
                    let intensity = 0.2 + 0.5 * (i as f32 / len as f32);
                    out.push(Sprite {
                        x: x as u16,
                        y,
                        symbol: '─',
                        intensity,
                        kind: SpriteKind::ChartLine,
                    });
                }
            }
        }

        for particle in &self.particles {
            let (dx, dy) = particle.translate;
            let x = percent_to_cell(area.x, area.width, particle.left, dx, CELL_WIDTH_PX);
            let y = percent_to_cell(area.y, area.height, particle.top, dy, CELL_HEIGHT_PX);
            if x >= area.right() || y >= area.bottom() {
                continue;
            }
            let twinkle = 0.6 + 0.4 * (TAU * (t + particle.delay) / TWINKLE_PERIOD_SECS).sin();
            let symbol = if particle.size < 2.0 {
                '·'
            } else if particle.size < 3.0 {
                '•'
            } else {
                '*'
            };
            out.push(Sprite {
                x,
                y,
                symbol,
                intensity: (particle.opacity * twinkle).clamp(0.0, 1.0),
                kind: SpriteKind::Particle,
            });
        }

        out
    }
}

fn percent_to_cell(origin: u16, extent: u16, percent: f32, translate_px: f32, cell_px: f32) -> u16 {
    let cells = (percent / 100.0) * extent as f32 + translate_px / cell_px;
    origin.saturating_add(cells.max(0.0) as u16)
}

/// Identifies an element registered for scroll-in reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevealKey {
    Panel(&'static str),
    /// A result row, keyed by its add-button id.
    Row(u64),
}

/// Visible fraction at which an element counts as intersecting.
pub const REVEAL_THRESHOLD: f32 = 0.1;
/// Length of the reveal animation.
pub const REVEAL_DURATION: Duration = Duration::from_millis(400);

/// One-shot "animate on first view" tracking.
///
/// Observed elements switch to animated the first time they are at least
/// [`REVEAL_THRESHOLD`] visible and are unobserved at that point, so
/// scrolling them out and back in never replays the animation.
#[derive(Debug, Default)]
pub struct RevealTracker {
    observed: HashSet<RevealKey>,
    animated: HashMap<RevealKey, Instant>,
}

impl RevealTracker {
    /// Start observing `key`. Already animated elements stay animated.
    pub fn observe(&mut self, key: RevealKey) {
        if !self.animated.contains_key(&key) {
            self.observed.insert(key);
        }
    }

    /// Report that `key` is `visible` (fraction, 0..=1) at `now`.
    /// Returns true when this report triggered the animation.
    pub fn on_intersection(&mut self, key: RevealKey, visible: f32, now: Instant) -> bool {
        if visible < REVEAL_THRESHOLD || !self.observed.remove(&key) {
            return false;
        }
        self.animated.insert(key, now);
        true
    }

    /// Forget every row except `ids`. Rows of a replaced result list are
    /// gone for good, like removed nodes.
    pub fn retain_rows(&mut self, ids: &[u64]) {
        let keep = |key: &RevealKey| match key {
            RevealKey::Row(id) => ids.contains(id),
            RevealKey::Panel(_) => true,
        };
        self.observed.retain(|key| keep(key));
        self.animated.retain(|key, _| keep(key));
    }

    /// Number of elements observed or already animated.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.observed.len() + self.animated.len()
    }

    #[cfg(test)]
    pub fn is_observed(&self, key: RevealKey) -> bool {
        self.observed.contains(&key)
    }

    #[cfg(test)]
    pub fn is_animated(&self, key: RevealKey) -> bool {
        self.animated.contains_key(&key)
    }

    /// Progress of the reveal animation in `0.0..=1.0`; 0 if never revealed.
    pub fn progress(&self, key: RevealKey, now: Instant) -> f32 {
        match self.animated.get(&key) {
            Some(at) => (now.saturating_duration_since(*at).as_secs_f32()
                / REVEAL_DURATION.as_secs_f32())
            .min(1.0),
            None => 0.0,
        }
    }
}
