//! The particle visualizer: owns the pool, the motion step and the
//! drawing surface, and turns a hardware snapshot into one frame.

pub mod motion;
pub mod particle;
pub mod pool;
pub mod surface;

use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;

use crate::hardware::HardwareSnapshot;
use motion::{link_edges, MotionMode, Tuning};
use pool::ParticlePool;
use surface::DotSurface;

/// Fraction of each cell's color kept per frame; the rest decays into
/// the trail.
const TRAIL_RETAIN: f32 = 0.90;
const FILL_ALPHA: f32 = 0.8;

const OVERLAY_FG: Color = Color::Rgb(0, 255, 0);

#[derive(Clone, Copy, Debug)]
pub struct VizOptions {
    pub mode: MotionMode,
    pub density_step: i32,
    pub link_same_color: bool,
}

impl Default for VizOptions {
    fn default() -> Self {
        Self {
            mode: MotionMode::Swirl,
            density_step: 10,
            link_same_color: false,
        }
    }
}

pub struct Visualizer {
    options: VizOptions,
    pool: ParticlePool,
    surface: DotSurface,
    rng: StdRng,
    tick: u64,
    tick_ms: u64,
    show_overlay: bool,
}

impl Visualizer {
    pub fn new(options: VizOptions, tick_ms: u64) -> Self {
        Self {
            options,
            pool: ParticlePool::new(),
            surface: DotSurface::new(),
            rng: StdRng::from_entropy(),
            tick: 0,
            tick_ms,
            show_overlay: true,
        }
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn overlay_shown(&self) -> bool {
        self.show_overlay
    }

    pub fn handle_input(&mut self, key: KeyEvent) {
        if let KeyCode::Char('d') | KeyCode::Char('D') = key.code {
            self.show_overlay = !self.show_overlay;
        }
    }

    /// Adopts a new drawing area, rescaling particle positions so the
    /// field keeps its shape. Also called once before the first frame.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        let old_w = self.surface.dot_width();
        let old_h = self.surface.dot_height();
        self.surface.resize(cols as usize, rows as usize);
        let new_w = self.surface.dot_width();
        let new_h = self.surface.dot_height();
        if old_w > 0.0 && old_h > 0.0 && (new_w != old_w || new_h != old_h) {
            self.pool.rescale(new_w / old_w, new_h / old_h);
        }
    }

    /// One simulation frame: reconcile the pool against the switches,
    /// advance every particle, then restamp the surface over the faded
    /// remains of earlier frames.
    pub fn update(&mut self, snapshot: &HardwareSnapshot) {
        let width = self.surface.dot_width();
        let height = self.surface.dot_height();
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.tick += 1;

        let tuning = Tuning::derive(snapshot, self.options.mode, self.options.density_step);
        let active = snapshot.active_colors();
        self.pool
            .reconcile(&mut self.rng, &active, tuning.density, width, height);

        let time_ms = (self.tick * self.tick_ms) as f32;
        for p in self.pool.particles_mut() {
            motion::step(p, &tuning, width, height, time_ms);
        }

        self.surface.fade(TRAIL_RETAIN);

        let particles = self.pool.particles();
        for edge in link_edges(particles, self.options.link_same_color) {
            let a = &particles[edge.a];
            let b = &particles[edge.b];
            self.surface
                .line(a.x, a.y, b.x, b.y, a.color.rgb(), edge.alpha);
        }
        for p in particles {
            self.surface
                .disc(p.x, p.y, p.size * tuning.size_mul, p.color.rgb(), FILL_ALPHA);
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, snapshot: &HardwareSnapshot) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(80, 80, 120)))
            .title(" Visualizer ")
            .title_style(Style::default().fg(Color::Rgb(160, 160, 220)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.resize(inner.width, inner.height);
        frame.render_widget(Paragraph::new(self.surface.lines()), inner);

        if self.show_overlay {
            self.render_overlay(frame, inner, snapshot);
        }
    }

    /// Diagnostic readout of the derived tuning, drawn over the field
    /// like the hardware team's on-canvas debug box.
    fn render_overlay(&self, frame: &mut Frame, inner: Rect, snapshot: &HardwareSnapshot) {
        if inner.width < 8 || inner.height < 2 {
            return;
        }
        let tuning = Tuning::derive(snapshot, self.options.mode, self.options.density_step);
        let e4_line = match tuning.pattern {
            Some(pattern) => format!(
                "E4 {:>4}  pattern {}",
                snapshot.encoder(3).value,
                pattern.label()
            ),
            None => format!("E4 {:>4}  swirl {:+.3}", snapshot.encoder(3).value, tuning.rotation),
        };
        let colors = snapshot
            .active_colors()
            .iter()
            .map(|c| c.label())
            .collect::<Vec<_>>()
            .join(" ");
        let colors = if colors.is_empty() { String::from("none") } else { colors };
        let text = vec![
            Line::from(Span::styled(
                " TUNING",
                Style::default().fg(OVERLAY_FG).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("E1 {:>4}  density {}", snapshot.encoder(0).value, tuning.density)),
            Line::from(format!("E2 {:>4}  size  x{:.2}", snapshot.encoder(1).value, tuning.size_mul)),
            Line::from(format!("E3 {:>4}  speed x{:.2}", snapshot.encoder(2).value, tuning.speed_mul)),
            Line::from(e4_line),
            Line::from(format!("{} particles  [{}]", self.pool.len(), colors)),
        ];
        let width = inner.width.saturating_sub(2).min(30);
        let height = inner.height.saturating_sub(2).min(text.len() as u16);
        let overlay = Rect::new(inner.x + 1, inner.y + 1, width, height);
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(OVERLAY_FG).bg(Color::Rgb(0, 0, 0))),
            overlay,
        );
    }
}
