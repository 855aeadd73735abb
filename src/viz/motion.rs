//! Motion model: turns the encoder block into per-frame tuning and
//! advances particles under the selected movement pattern.
//!
//! Encoder roles are fixed: E1 density, E2 particle size, E3 speed,
//! E4 either a continuous swirl intensity or a pattern selector,
//! depending on the configured mode.

use crate::hardware::HardwareSnapshot;
use crate::viz::particle::Particle;

pub const DENSITY_BASE: i32 = 50;
pub const SIZE_STEP: f32 = 0.2;
pub const SIZE_FLOOR: f32 = 0.3;
pub const SPEED_STEP: f32 = 0.1;
pub const SPEED_FLOOR: f32 = 0.5;
pub const SWIRL_STEP: f32 = 0.003;
pub const SPIRAL_STEP: f32 = 0.02;

pub const LINK_DISTANCE: f32 = 100.0;
const LINK_LOOKAHEAD: usize = 4;
const LINK_ALPHA: f32 = 0.2;

const WAVE_AMPLITUDE: f32 = 100.0;
const WAVE_X_FREQ: f32 = 0.01;
const WAVE_T_FREQ: f32 = 0.001;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    Drift,
    Circular,
    Wave,
    Spiral,
}

impl Pattern {
    pub fn label(&self) -> &'static str {
        match self {
            Pattern::Drift => "drift",
            Pattern::Circular => "circular",
            Pattern::Wave => "wave",
            Pattern::Spiral => "spiral",
        }
    }
}

/// How E4's value picks a pattern when running in pattern mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternSelector {
    /// Detent bands: turning the knob walks through the patterns and
    /// parks on spiral past the last band.
    Ranges,
    /// Wraps over all four patterns forever, either direction.
    Modulo,
}

impl PatternSelector {
    pub fn select(&self, value: i32) -> Pattern {
        match self {
            PatternSelector::Ranges => match value {
                i32::MIN..=0 => Pattern::Drift,
                1..=5 => Pattern::Circular,
                6..=10 => Pattern::Wave,
                _ => Pattern::Spiral,
            },
            PatternSelector::Modulo => match value.rem_euclid(4) {
                0 => Pattern::Drift,
                1 => Pattern::Circular,
                2 => Pattern::Wave,
                _ => Pattern::Spiral,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionMode {
    Swirl,
    Patterns(PatternSelector),
}

/// Everything the frame step needs, derived once per frame from the
/// snapshot so mid-frame telemetry cannot shear the parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    pub density: usize,
    pub size_mul: f32,
    pub speed_mul: f32,
    pub rotation: f32,
    pub pattern: Option<Pattern>,
}

impl Tuning {
    pub fn derive(snapshot: &HardwareSnapshot, mode: MotionMode, density_step: i32) -> Self {
        let encoder = |index: usize| snapshot.encoder(index).value;
        let (rotation, pattern) = match mode {
            MotionMode::Swirl => (encoder(3) as f32 * SWIRL_STEP, None),
            MotionMode::Patterns(selector) => (0.0, Some(selector.select(encoder(3)))),
        };
        Self {
            density: encoder(0)
                .saturating_mul(density_step)
                .saturating_add(DENSITY_BASE)
                .unsigned_abs() as usize,
            size_mul: (1.0 + encoder(1) as f32 * SIZE_STEP).max(SIZE_FLOOR),
            speed_mul: (1.0 + encoder(2) as f32 * SPEED_STEP).max(SPEED_FLOOR),
            rotation,
            pattern,
        }
    }
}

/// Advances one particle by one frame and wraps it back onto the
/// surface. `time_ms` drives the wave clock.
pub fn step(p: &mut Particle, tuning: &Tuning, width: f32, height: f32, time_ms: f32) {
    let speed = tuning.speed_mul;
    match tuning.pattern {
        None => {
            drift(p, speed);
            if tuning.rotation != 0.0 {
                orbit(p, tuning.rotation, width, height);
            }
        }
        Some(Pattern::Drift) => drift(p, speed),
        Some(Pattern::Circular) => {
            p.angle += p.angular_vel * speed;
            p.x += p.angle.cos() * speed;
            p.y += p.angle.sin() * speed;
        }
        Some(Pattern::Wave) => {
            p.x += p.vx * speed;
            p.y = height / 2.0
                + (p.x * WAVE_X_FREQ + time_ms * WAVE_T_FREQ).sin() * WAVE_AMPLITUDE;
        }
        Some(Pattern::Spiral) => orbit(p, SPIRAL_STEP * speed, width, height),
    }
    wrap(p, width, height);
}

fn drift(p: &mut Particle, speed: f32) {
    p.x += p.vx * speed;
    p.y += p.vy * speed;
}

/// Rotates the particle around the surface center, keeping its radius.
fn orbit(p: &mut Particle, delta: f32, width: f32, height: f32) {
    let cx = width / 2.0;
    let cy = height / 2.0;
    let dx = p.x - cx;
    let dy = p.y - cy;
    let radius = (dx * dx + dy * dy).sqrt();
    let angle = dy.atan2(dx) + delta;
    p.x = cx + angle.cos() * radius;
    p.y = cy + angle.sin() * radius;
}

/// Toroidal wrap: leaving one edge re-enters at the opposite edge,
/// within the same frame.
fn wrap(p: &mut Particle, width: f32, height: f32) {
    if p.x < 0.0 {
        p.x = width;
    } else if p.x > width {
        p.x = 0.0;
    }
    if p.y < 0.0 {
        p.y = height;
    } else if p.y > height {
        p.y = 0.0;
    }
}

/// A proximity link between two particles, by pool index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub alpha: f32,
}

/// Scans a small window ahead of each particle and links close pairs.
/// The bounded lookahead keeps the scan linear in the pool size.
pub fn link_edges(particles: &[Particle], same_color_only: bool) -> Vec<Edge> {
    let mut edges = Vec::new();
    for a in 0..particles.len() {
        let p = &particles[a];
        let window_end = particles.len().min(a + 1 + LINK_LOOKAHEAD);
        for (b, q) in particles.iter().enumerate().take(window_end).skip(a + 1) {
            if same_color_only && p.color != q.color {
                continue;
            }
            let dx = p.x - q.x;
            let dy = p.y - q.y;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist < LINK_DISTANCE {
                edges.push(Edge {
                    a,
                    b,
                    alpha: LINK_ALPHA * (1.0 - dist / LINK_DISTANCE),
                });
            }
        }
    }
    edges
}
