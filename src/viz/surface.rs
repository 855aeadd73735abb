//! Persistent braille drawing surface.
//!
//! Each terminal cell holds a 2x4 block of dots plus the brightest
//! color stamped into it. Cells are never cleared between frames;
//! instead [`DotSurface::fade`] decays their color toward black, which
//! is what leaves motion trails behind the particles.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Channel level below which a faded cell is dropped entirely.
const FADE_CUTOFF: f32 = 12.0;

const BG: Color = Color::Rgb(0, 0, 0);

fn braille_bit(sub_x: usize, sub_y: usize) -> u8 {
    match (sub_x, sub_y) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0,
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Cell {
    bits: u8,
    r: f32,
    g: f32,
    b: f32,
}

#[derive(Debug, Default)]
pub struct DotSurface {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl DotSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reallocates for a new terminal size. Trails do not survive a
    /// resize; the next frames rebuild them.
    pub fn resize(&mut self, cols: usize, rows: usize) {
        if cols == self.cols && rows == self.rows {
            return;
        }
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![Cell::default(); cols * rows];
    }

    /// Width of the surface in dots (two per column).
    pub fn dot_width(&self) -> f32 {
        (self.cols * 2) as f32
    }

    /// Height of the surface in dots (four per row).
    pub fn dot_height(&self) -> f32 {
        (self.rows * 4) as f32
    }

    /// Decays every lit cell toward black, clearing it once all three
    /// channels drop below the cutoff.
    pub fn fade(&mut self, retain: f32) {
        for cell in &mut self.cells {
            if cell.bits == 0 {
                continue;
            }
            cell.r *= retain;
            cell.g *= retain;
            cell.b *= retain;
            if cell.r < FADE_CUTOFF && cell.g < FADE_CUTOFF && cell.b < FADE_CUTOFF {
                *cell = Cell::default();
            }
        }
    }

    /// Lights one dot, with bounds checking. Where stamps overlap the
    /// brighter channel wins, so fresh marks shine through old trails.
    fn plot(&mut self, x: i32, y: i32, rgb: (u8, u8, u8), alpha: f32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.cols * 2 || y >= self.rows * 4 {
            return;
        }
        let cell = &mut self.cells[(y / 4) * self.cols + x / 2];
        cell.bits |= braille_bit(x % 2, y % 4);
        cell.r = cell.r.max(rgb.0 as f32 * alpha);
        cell.g = cell.g.max(rgb.1 as f32 * alpha);
        cell.b = cell.b.max(rgb.2 as f32 * alpha);
    }

    pub fn dot(&mut self, x: f32, y: f32, rgb: (u8, u8, u8), alpha: f32) {
        self.plot(x as i32, y as i32, rgb, alpha);
    }

    /// Stamps a filled circle of dots. Anything below one dot of
    /// radius still lights its center, so tiny particles stay visible.
    pub fn disc(&mut self, cx: f32, cy: f32, radius: f32, rgb: (u8, u8, u8), alpha: f32) {
        if radius < 1.0 {
            self.plot(cx as i32, cy as i32, rgb, alpha);
            return;
        }
        let r2 = radius * radius;
        let x0 = (cx - radius).floor() as i32;
        let x1 = (cx + radius).ceil() as i32;
        let y0 = (cy - radius).floor() as i32;
        let y1 = (cy + radius).ceil() as i32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.plot(x, y, rgb, alpha);
                }
            }
        }
    }

    /// Stamps a straight dot run between two points (Bresenham).
    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, rgb: (u8, u8, u8), alpha: f32) {
        let (mut cx, mut cy) = (x0 as i32, y0 as i32);
        let (tx, ty) = (x1 as i32, y1 as i32);
        let dx = (tx - cx).abs();
        let dy = -(ty - cy).abs();
        let sx = if cx < tx { 1 } else { -1 };
        let sy = if cy < ty { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.plot(cx, cy, rgb, alpha);
            if cx == tx && cy == ty {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                cx += sx;
            }
            if e2 <= dx {
                err += dx;
                cy += sy;
            }
        }
    }

    /// Renders the grid as one styled line per terminal row.
    pub fn lines(&self) -> Vec<Line<'static>> {
        if self.cols == 0 {
            return Vec::new();
        }
        let blank = Style::default().bg(BG);
        self.cells
            .chunks(self.cols)
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .iter()
                    .map(|cell| {
                        if cell.bits == 0 {
                            Span::styled(" ".to_string(), blank)
                        } else {
                            let ch = char::from_u32(0x2800 + cell.bits as u32).unwrap_or(' ');
                            let fg = Color::Rgb(cell.r as u8, cell.g as u8, cell.b as u8);
                            Span::styled(String::from(ch), blank.fg(fg))
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell_at<'a>(lines: &'a [Line<'static>], col: usize, row: usize) -> &'a Span<'static> {
        &lines[row].spans[col]
    }

    #[test]
    fn single_dot_lights_the_top_left_braille_bit() {
        let mut surface = DotSurface::new();
        surface.resize(4, 2);
        surface.dot(0.0, 0.0, (255, 0, 0), 1.0);
        let lines = surface.lines();
        assert_eq!(cell_at(&lines, 0, 0).content, "\u{2801}");
        assert_eq!(cell_at(&lines, 0, 0).style.fg, Some(Color::Rgb(255, 0, 0)));
        assert_eq!(cell_at(&lines, 1, 0).content, " ");
    }

    #[test]
    fn dots_in_one_cell_merge_bits() {
        let mut surface = DotSurface::new();
        surface.resize(4, 2);
        surface.dot(0.0, 0.0, (0, 255, 0), 1.0);
        surface.dot(1.0, 3.0, (0, 255, 0), 1.0);
        let lines = surface.lines();
        // 0x01 | 0x80
        assert_eq!(cell_at(&lines, 0, 0).content, "\u{2881}");
    }

    #[test]
    fn out_of_bounds_dots_are_dropped() {
        let mut surface = DotSurface::new();
        surface.resize(4, 2);
        surface.dot(-1.0, 0.0, (255, 255, 255), 1.0);
        surface.dot(surface.dot_width(), 0.0, (255, 255, 255), 1.0);
        surface.dot(0.0, surface.dot_height(), (255, 255, 255), 1.0);
        assert!(surface
            .lines()
            .iter()
            .all(|line| line.spans.iter().all(|span| span.content == " ")));
    }

    #[test]
    fn alpha_scales_the_stamp_color() {
        let mut surface = DotSurface::new();
        surface.resize(2, 1);
        surface.dot(0.0, 0.0, (200, 100, 0), 0.5);
        let lines = surface.lines();
        assert_eq!(cell_at(&lines, 0, 0).style.fg, Some(Color::Rgb(100, 50, 0)));
    }

    #[test]
    fn brighter_stamp_wins_per_channel() {
        let mut surface = DotSurface::new();
        surface.resize(2, 1);
        surface.dot(0.0, 0.0, (255, 0, 0), 0.2);
        surface.dot(0.0, 0.0, (0, 0, 255), 1.0);
        let lines = surface.lines();
        assert_eq!(cell_at(&lines, 0, 0).style.fg, Some(Color::Rgb(51, 0, 255)));
    }

    #[test]
    fn fade_dims_then_clears() {
        let mut surface = DotSurface::new();
        surface.resize(2, 1);
        surface.dot(0.0, 0.0, (255, 0, 0), 1.0);
        surface.fade(0.5);
        let lines = surface.lines();
        assert_eq!(cell_at(&lines, 0, 0).style.fg, Some(Color::Rgb(127, 0, 0)));

        for _ in 0..8 {
            surface.fade(0.5);
        }
        let lines = surface.lines();
        assert_eq!(cell_at(&lines, 0, 0).content, " ");
    }

    #[test]
    fn line_lights_both_endpoints() {
        let mut surface = DotSurface::new();
        surface.resize(8, 2);
        surface.line(0.0, 0.0, 10.0, 5.0, (0, 128, 255), 1.0);
        let lines = surface.lines();
        assert_ne!(cell_at(&lines, 0, 0).content, " ");
        assert_ne!(cell_at(&lines, 5, 1).content, " ");
    }

    #[test]
    fn disc_covers_its_radius() {
        let mut surface = DotSurface::new();
        surface.resize(8, 4);
        surface.disc(8.0, 8.0, 3.0, (255, 255, 255), 1.0);
        let lines = surface.lines();
        // center cell plus cells a radius away in both axes
        assert_ne!(cell_at(&lines, 4, 2).content, " ");
        assert_ne!(cell_at(&lines, 2, 2).content, " ");
        assert_ne!(cell_at(&lines, 4, 1).content, " ");
    }

    #[test]
    fn sub_dot_disc_still_lights_its_center() {
        let mut surface = DotSurface::new();
        surface.resize(4, 2);
        surface.disc(3.0, 3.0, 0.4, (255, 255, 255), 1.0);
        let lines = surface.lines();
        assert_ne!(cell_at(&lines, 1, 0).content, " ");
    }

    #[test]
    fn resize_clears_and_rescales_the_grid() {
        let mut surface = DotSurface::new();
        surface.resize(4, 2);
        surface.dot(0.0, 0.0, (255, 255, 255), 1.0);
        surface.resize(6, 3);
        assert_eq!(surface.dot_width(), 12.0);
        assert_eq!(surface.dot_height(), 12.0);
        assert!(surface
            .lines()
            .iter()
            .all(|line| line.spans.iter().all(|span| span.content == " ")));
    }
}
