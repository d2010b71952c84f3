use crate::constants::*;
use crate::prng::RandomSource;
use crate::types::*;

/// Fixed pool of rain/snow particles recycled in place around the camera.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticlePool {
    particles: Vec<Particle>,
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticlePool {
    pub fn new() -> Self {
        Self {
            particles: vec![Particle::default(); MAX_PARTICLES],
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn active(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Deactivate every particle. Called whenever the weather changes.
    pub fn clear(&mut self) {
        for p in self.particles.iter_mut() {
            p.active = false;
        }
    }

    /// Advance one frame.
    ///
    /// Inactive slots respawn just above the visible area, active ones fall at
    /// their own speed (snow also drifts sideways) and retire once they pass
    /// the bottom edge of the screen.
    pub fn update(
        &mut self,
        weather: Weather,
        camera_target: Vec2,
        screen_width: f32,
        screen_height: f32,
        dt: f32,
        rng: &mut impl RandomSource,
    ) {
        if weather == Weather::None {
            return;
        }
        let half_w = screen_width as i32;
        let (min_speed, max_speed) = match weather {
            Weather::Snow => (SNOW_SPEED_MIN, SNOW_SPEED_MAX),
            _ => (RAIN_SPEED_MIN, RAIN_SPEED_MAX),
        };

        for p in self.particles.iter_mut() {
            if !p.active {
                let cx = camera_target.x as i32;
                p.position.x =
                    rng.int_range(cx.saturating_sub(half_w), cx.saturating_add(half_w)) as f32;
                p.position.y = camera_target.y
                    - screen_height / 2.0
                    - rng.int_range(0, PARTICLE_SPAWN_JITTER) as f32;
                p.speed = rng.int_range(min_speed, max_speed) as f32;
                p.active = true;
            }

            p.position.y += p.speed * dt;
            if weather == Weather::Snow {
                p.position.x += rng.int_range(-SNOW_DRIFT, SNOW_DRIFT) as f32 * dt;
            }

            if p.position.y > camera_target.y + screen_height {
                p.active = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prng::Mulberry32;

    /// Always returns the lower bound.
    struct Low;

    impl RandomSource for Low {
        fn int_range(&mut self, min: i32, _max: i32) -> i32 {
            min
        }
    }

    const W: f32 = 1280.0;
    const H: f32 = 720.0;

    #[test]
    fn clear_weather_leaves_pool_idle() {
        let mut pool = ParticlePool::new();
        pool.update(Weather::None, Vec2::ZERO, W, H, 0.016, &mut Low);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn far_camera_does_not_overflow_spawn_window() {
        let mut pool = ParticlePool::new();
        let cam = Vec2::new(3.0e9, 0.0);
        pool.update(Weather::Rain, cam, W, H, 0.016, &mut Mulberry32::new(5));
        assert_eq!(pool.active_count(), MAX_PARTICLES);
        let edge = (i32::MAX - W as i32) as f32;
        assert!(pool.active().all(|p| p.position.x >= edge));
    }

    #[test]
    fn rain_spawns_whole_pool_above_view() {
        let mut pool = ParticlePool::new();
        pool.update(Weather::Rain, Vec2::ZERO, W, H, 0.0, &mut Low);
        assert_eq!(pool.active_count(), MAX_PARTICLES);
        let p = pool.particles()[0];
        assert_eq!(p.position, Vec2::new(-W, -H / 2.0));
        assert_eq!(p.speed, RAIN_SPEED_MIN as f32);
    }

    #[test]
    fn spawn_stays_within_bounds() {
        let mut pool = ParticlePool::new();
        let mut rng = Mulberry32::new(99);
        let cam = Vec2::new(300.0, -50.0);
        pool.update(Weather::Snow, cam, W, H, 0.0, &mut rng);
        for p in pool.active() {
            assert!(p.position.x >= cam.x - W && p.position.x <= cam.x + W);
            assert!(p.position.y <= cam.y - H / 2.0);
            assert!(p.position.y >= cam.y - H / 2.0 - PARTICLE_SPAWN_JITTER as f32);
            assert!(p.speed >= SNOW_SPEED_MIN as f32 && p.speed <= SNOW_SPEED_MAX as f32);
        }
    }

    #[test]
    fn particles_fall_by_speed() {
        let mut pool = ParticlePool::new();
        pool.update(Weather::Rain, Vec2::ZERO, W, H, 0.0, &mut Low);
        let before = pool.particles()[3].position.y;
        pool.update(Weather::Rain, Vec2::ZERO, W, H, 0.25, &mut Low);
        assert_eq!(pool.particles()[3].position.y, before + 100.0);
    }

    #[test]
    fn snow_drifts_sideways() {
        let mut pool = ParticlePool::new();
        pool.update(Weather::Snow, Vec2::ZERO, W, H, 0.0, &mut Low);
        let x0 = pool.particles()[0].position.x;
        pool.update(Weather::Snow, Vec2::ZERO, W, H, 0.5, &mut Low);
        assert_eq!(pool.particles()[0].position.x, x0 - 25.0);
    }

    #[test]
    fn particles_retire_below_screen() {
        let mut pool = ParticlePool::new();
        pool.update(Weather::Rain, Vec2::ZERO, W, H, 0.0, &mut Low);
        pool.update(Weather::Rain, Vec2::ZERO, W, H, 4.0, &mut Low);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn camera_jump_retires_stale_particles() {
        let mut pool = ParticlePool::new();
        pool.update(Weather::Rain, Vec2::ZERO, W, H, 0.0, &mut Low);
        pool.update(Weather::Rain, Vec2::new(0.0, -5000.0), W, H, 0.0, &mut Low);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn clear_empties_pool() {
        let mut pool = ParticlePool::new();
        pool.update(Weather::Rain, Vec2::ZERO, W, H, 0.0, &mut Low);
        pool.clear();
        assert_eq!(pool.active_count(), 0);
    }
}
