use std::f32::consts::TAU;

use rand::Rng;

use crate::hardware::SwitchColor;

/// One particle in the field. Positions are in dot coordinates (two
/// dots per terminal column, four per row), origin top-left.
#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    pub angle: f32,
    pub angular_vel: f32,
    pub color: SwitchColor,
}

impl Particle {
    /// Spawns at a uniformly random spot with a small random drift
    /// velocity, spin phase and spin rate.
    pub fn spawn(rng: &mut impl Rng, width: f32, height: f32, color: SwitchColor) -> Self {
        Self {
            x: rng.gen::<f32>() * width,
            y: rng.gen::<f32>() * height,
            vx: (rng.gen::<f32>() - 0.5) * 2.0,
            vy: (rng.gen::<f32>() - 0.5) * 2.0,
            size: rng.gen::<f32>() * 3.0 + 1.0,
            angle: rng.gen::<f32>() * TAU,
            angular_vel: (rng.gen::<f32>() - 0.5) * 0.1,
            color,
        }
    }
}
