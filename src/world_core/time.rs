use glam::Vec2;

use crate::world_core::config::DayCycleConfig;

/// Accumulated frame time plus the day-night parameters derived from it.
pub struct WorldClock {
    elapsed: f64,
    cycle_seconds: f32,
    midnight_opacity: f32,
}

impl WorldClock {
    pub fn new(config: &DayCycleConfig) -> Self {
        Self {
            elapsed: 0.0,
            cycle_seconds: config.cycle_seconds,
            midnight_opacity: config.midnight_opacity,
        }
    }

    pub fn update(&mut self, dt_seconds: f32) {
        self.elapsed += dt_seconds as f64;
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Position within the current day, in `[0, 1)`.
    pub fn day_fraction(&self) -> f32 {
        (self.elapsed / self.cycle_seconds as f64).rem_euclid(1.0) as f32
    }

    /// Opacity of the night overlay: clear at noon, darkest half a cycle in.
    pub fn night_opacity(&self) -> f32 {
        let fraction = self.day_fraction();
        let t = if fraction <= 0.5 {
            fraction * 2.0
        } else {
            2.0 - fraction * 2.0
        };
        let eased = t * t * (3.0 - 2.0 * t);
        eased * self.midnight_opacity
    }
}

/// Where the sun and its halo sit on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPlacement {
    pub center: Vec2,
    pub diameter: f32,
    pub halo_diameter: f32,
}

/// The sun orbits `(viewport_w / 2, baseline)`, starting straight overhead and
/// turning once per day.
pub fn sun_placement(
    clock: &WorldClock,
    viewport: Vec2,
    base_ground_factor: f32,
    config: &DayCycleConfig,
) -> SunPlacement {
    let pivot = Vec2::new(viewport.x * 0.5, viewport.y * base_ground_factor);
    let radius = viewport.y * (1.0 - base_ground_factor);
    let angle = clock.day_fraction() * std::f32::consts::TAU;
    let start = Vec2::new(0.0, -radius);
    let offset = Vec2::from_angle(angle).rotate(start);
    SunPlacement {
        center: pivot + offset,
        diameter: config.sun_diameter,
        halo_diameter: config.sun_diameter * config.halo_scale,
    }
}

#[cfg(test)]
mod tests {
    use super::{sun_placement, WorldClock};
    use crate::world_core::config::DayCycleConfig;
    use glam::Vec2;

    fn clock_at(seconds: f32) -> WorldClock {
        let mut clock = WorldClock::new(&DayCycleConfig::default());
        clock.update(seconds);
        clock
    }

    #[test]
    fn night_peaks_half_way_through_the_cycle() {
        assert_eq!(clock_at(0.0).night_opacity(), 0.0);
        assert!((clock_at(15.0).night_opacity() - 0.5).abs() < 1e-5);
        assert!(clock_at(7.5).night_opacity() > 0.0);
        assert!(clock_at(7.5).night_opacity() < 0.5);
        assert!(clock_at(30.0).night_opacity() < 1e-5);
    }

    #[test]
    fn sun_starts_overhead_and_comes_back() {
        let config = DayCycleConfig::default();
        let viewport = Vec2::new(1200.0, 600.0);
        let factor = 2.0 / 3.0;

        let noon = sun_placement(&clock_at(0.0), viewport, factor, &config);
        assert!((noon.center - Vec2::new(600.0, 200.0)).length() < 1e-3);
        assert_eq!(noon.halo_diameter, 160.0);

        let half = sun_placement(&clock_at(15.0), viewport, factor, &config);
        assert!((half.center - Vec2::new(600.0, 600.0)).length() < 1e-2);

        let full = sun_placement(&clock_at(30.0), viewport, factor, &config);
        assert!((full.center - noon.center).length() < 1e-2);
    }
}
