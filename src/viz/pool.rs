//! Particle pool and its per-frame reconciliation against the panel
//! switches. Reconciliation preserves continuity: existing particles
//! survive switch changes wherever possible and are recolored rather
//! than respawned.

use rand::Rng;

use crate::hardware::SwitchColor;
use crate::viz::particle::Particle;

#[derive(Debug, Default)]
pub struct ParticlePool {
    particles: Vec<Particle>,
}

impl ParticlePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Rescales every position after the drawing surface changes size,
    /// so the field keeps its shape instead of bunching in a corner.
    pub fn rescale(&mut self, x_ratio: f32, y_ratio: f32) {
        for p in &mut self.particles {
            p.x *= x_ratio;
            p.y *= y_ratio;
        }
    }

    /// Brings the pool in line with the switches in a single pass.
    ///
    /// Order matters: recolor first so every newly active color gets a
    /// share of the existing particles, then drop the deactivated
    /// colors, then grow or shrink to the target count.
    pub fn reconcile(
        &mut self,
        rng: &mut impl Rng,
        active: &[SwitchColor],
        target: usize,
        width: f32,
        height: f32,
    ) {
        if active.is_empty() {
            self.particles.clear();
            return;
        }

        let missing: Vec<SwitchColor> = active
            .iter()
            .copied()
            .filter(|color| !self.particles.iter().any(|p| p.color == *color))
            .collect();
        if !missing.is_empty() && !self.particles.is_empty() {
            let share = self.particles.len().div_ceil(active.len());
            for (i, p) in self.particles.iter_mut().take(share).enumerate() {
                p.color = missing[i % missing.len()];
            }
        }

        self.particles.retain(|p| active.contains(&p.color));

        while self.particles.len() < target {
            let color = active[rng.gen_range(0..active.len())];
            self.particles.push(Particle::spawn(rng, width, height, color));
        }
        self.particles.truncate(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const W: f32 = 160.0;
    const H: f32 = 80.0;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn count_color(pool: &ParticlePool, color: SwitchColor) -> usize {
        pool.particles().iter().filter(|p| p.color == color).count()
    }

    #[test]
    fn no_active_colors_empties_the_pool() {
        let mut rng = rng();
        let mut pool = ParticlePool::new();
        pool.reconcile(&mut rng, &[SwitchColor::Red], 50, W, H);
        assert_eq!(pool.len(), 50);
        pool.reconcile(&mut rng, &[], 50, W, H);
        assert!(pool.is_empty());
    }

    #[test]
    fn grows_to_target_in_one_pass() {
        let mut rng = rng();
        let mut pool = ParticlePool::new();
        pool.reconcile(&mut rng, &[SwitchColor::Red], 50, W, H);
        assert_eq!(pool.len(), 50);
        assert_eq!(count_color(&pool, SwitchColor::Red), 50);
    }

    #[test]
    fn shrinks_to_target_in_one_pass() {
        let mut rng = rng();
        let mut pool = ParticlePool::new();
        pool.reconcile(&mut rng, &[SwitchColor::Red], 100, W, H);
        pool.reconcile(&mut rng, &[SwitchColor::Red], 30, W, H);
        assert_eq!(pool.len(), 30);
    }

    #[test]
    fn density_of_one_hundred_from_cranked_encoder() {
        // |50 + 5 * 10| with the default density step
        let mut rng = rng();
        let mut pool = ParticlePool::new();
        pool.reconcile(&mut rng, &[SwitchColor::Red, SwitchColor::Blue], 100, W, H);
        assert_eq!(pool.len(), 100);
    }

    #[test]
    fn deactivated_color_is_recolored_not_respawned() {
        let mut rng = rng();
        let mut pool = ParticlePool::new();
        pool.reconcile(&mut rng, &[SwitchColor::Green], 30, W, H);
        let positions: Vec<(f32, f32)> =
            pool.particles().iter().map(|p| (p.x, p.y)).collect();

        // green off, blue on: ceil(30 / 1) = every particle converts
        pool.reconcile(&mut rng, &[SwitchColor::Blue], 30, W, H);
        assert_eq!(pool.len(), 30);
        assert_eq!(count_color(&pool, SwitchColor::Blue), 30);
        let after: Vec<(f32, f32)> = pool.particles().iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(positions, after);
    }

    #[test]
    fn newly_active_color_takes_a_proportional_share() {
        let mut rng = rng();
        let mut pool = ParticlePool::new();
        pool.reconcile(&mut rng, &[SwitchColor::Red], 60, W, H);

        // red stays on, green joins: ceil(60 / 2) = 30 convert
        pool.reconcile(&mut rng, &[SwitchColor::Red, SwitchColor::Green], 60, W, H);
        assert_eq!(pool.len(), 60);
        assert_eq!(count_color(&pool, SwitchColor::Green), 30);
        assert_eq!(count_color(&pool, SwitchColor::Red), 30);
    }

    #[test]
    fn two_missing_colors_split_the_converted_block() {
        let mut rng = rng();
        let mut pool = ParticlePool::new();
        pool.reconcile(&mut rng, &[SwitchColor::Red], 30, W, H);

        let all = [SwitchColor::Red, SwitchColor::Green, SwitchColor::Blue];
        // ceil(30 / 3) = 10 convert, alternating green and blue
        pool.reconcile(&mut rng, &all, 30, W, H);
        assert_eq!(count_color(&pool, SwitchColor::Green), 5);
        assert_eq!(count_color(&pool, SwitchColor::Blue), 5);
        assert_eq!(count_color(&pool, SwitchColor::Red), 20);
    }

    #[test]
    fn missing_color_with_empty_pool_just_spawns() {
        let mut rng = rng();
        let mut pool = ParticlePool::new();
        pool.reconcile(&mut rng, &[SwitchColor::Blue], 10, W, H);
        assert_eq!(count_color(&pool, SwitchColor::Blue), 10);
    }

    #[test]
    fn zero_target_empties_even_with_active_colors() {
        let mut rng = rng();
        let mut pool = ParticlePool::new();
        pool.reconcile(&mut rng, &[SwitchColor::Red], 20, W, H);
        pool.reconcile(&mut rng, &[SwitchColor::Red], 0, W, H);
        assert!(pool.is_empty());
    }

    #[test]
    fn rescale_moves_positions_proportionally() {
        let mut rng = rng();
        let mut pool = ParticlePool::new();
        pool.reconcile(&mut rng, &[SwitchColor::Red], 10, W, H);
        let before: Vec<(f32, f32)> = pool.particles().iter().map(|p| (p.x, p.y)).collect();
        pool.rescale(2.0, 0.5);
        for (p, (x, y)) in pool.particles().iter().zip(before) {
            assert_eq!(p.x, x * 2.0);
            assert_eq!(p.y, y * 0.5);
        }
    }

    fn subset(mask: u8) -> Vec<SwitchColor> {
        SwitchColor::ALL
            .into_iter()
            .filter(|color| mask & (1 << color.index()) != 0)
            .collect()
    }

    proptest! {
        /// After any sequence of switch flips and density changes the
        /// pool holds only active colors, at exactly the target count.
        #[test]
        fn reconcile_invariants_hold_across_sequences(
            steps in prop::collection::vec((0u8..8, 0usize..80), 1..20),
            seed in any::<u64>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut pool = ParticlePool::new();
            for (mask, target) in steps {
                let active = subset(mask);
                pool.reconcile(&mut rng, &active, target, W, H);
                if active.is_empty() {
                    prop_assert_eq!(pool.len(), 0);
                } else {
                    prop_assert_eq!(pool.len(), target);
                    for p in pool.particles() {
                        prop_assert!(active.contains(&p.color));
                    }
                }
            }
        }
    }
}
