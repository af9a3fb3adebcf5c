use glam::Vec2;

use crate::world_core::physics::Aabb;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FruitState {
    Available,
    /// Inert until the world clock reaches `respawn_at`.
    Collected { respawn_at: f64 },
}

/// A collectible that awards energy once per pickup and regrows in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Fruit {
    position: Vec2,
    radius: f32,
    state: FruitState,
    touching: bool,
}

impl Fruit {
    pub fn new(top_left: Vec2, radius: f32) -> Self {
        Self {
            position: top_left,
            radius,
            state: FruitState::Available,
            touching: false,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn state(&self) -> FruitState {
        self.state
    }

    pub fn is_available(&self) -> bool {
        matches!(self.state, FruitState::Available)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_top_left(self.position, Vec2::splat(self.radius * 2.0))
    }

    /// Feeds this tick's overlap with the avatar.
    ///
    /// Only the start of a contact counts, and only while the fruit is
    /// available; `award` then runs exactly once with `bonus`.
    pub fn touch(
        &mut self,
        overlapping: bool,
        now: f64,
        respawn_seconds: f64,
        bonus: f32,
        award: &mut dyn FnMut(f32),
    ) -> bool {
        let contact_began = overlapping && !self.touching;
        self.touching = overlapping;

        if !contact_began || !self.is_available() {
            return false;
        }

        self.state = FruitState::Collected {
            respawn_at: now + respawn_seconds,
        };
        award(bonus);
        true
    }

    /// Fires the respawn deadline once it has passed.
    pub fn update(&mut self, now: f64) -> bool {
        match self.state {
            FruitState::Collected { respawn_at } if now >= respawn_at => {
                self.state = FruitState::Available;
                true
            }
            _ => false,
        }
    }

    pub fn has_pending_respawn(&self) -> bool {
        !self.is_available()
    }
}
