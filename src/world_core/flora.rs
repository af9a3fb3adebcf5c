use glam::Vec2;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::world_core::config::{FloraConfig, FruitConfig};
use crate::world_core::fruit::Fruit;
use crate::world_core::heightmap::Heightmap;
use crate::world_core::layer::Layer;
use crate::world_core::physics::Aabb;

#[derive(Debug, Clone, PartialEq)]
pub struct Trunk {
    pub position: Vec2,
    pub height: f32,
    pub width: f32,
}

impl Trunk {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_top_left(self.position, Vec2::new(self.width, self.height))
    }
}

/// Cosmetic wind motion. Never feeds back into simulation state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafSway {
    pub start_delay: f32,
    pub angle_cycle: f32,
    pub width_cycle: f32,
    pub max_angle_deg: f32,
    pub min_width_factor: f32,
    pub max_width_factor: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafPose {
    pub angle_deg: f32,
    pub width_factor: f32,
}

impl LeafSway {
    /// Pose `elapsed` seconds after the leaf was materialized.
    pub fn pose(&self, elapsed: f32) -> LeafPose {
        let t = elapsed - self.start_delay;
        if t < 0.0 {
            return LeafPose {
                angle_deg: 0.0,
                width_factor: 1.0,
            };
        }
        let a = back_and_forth(t, self.angle_cycle);
        let w = back_and_forth(t, self.width_cycle);
        LeafPose {
            angle_deg: -self.max_angle_deg + a * 2.0 * self.max_angle_deg,
            width_factor: self.min_width_factor
                + w * (self.max_width_factor - self.min_width_factor),
        }
    }
}

/// Linear ramp 0 -> 1 over `duration`, then back to 0 over the next `duration`.
fn back_and_forth(t: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return 0.0;
    }
    let phase = (t / duration).rem_euclid(2.0);
    if phase <= 1.0 {
        phase
    } else {
        2.0 - phase
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub position: Vec2,
    pub sway: LeafSway,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub root_x: i64,
    pub trunk: Trunk,
    pub leaves: Vec<Leaf>,
    pub fruits: Vec<Fruit>,
}

impl Tree {
    pub fn entity_count(&self) -> usize {
        1 + self.leaves.len() + self.fruits.len()
    }
}

pub fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seed of the private random stream owned by column `x`:
///
/// ```text
/// column_seed(x, seed) = splitmix64(((seed as u64) << 32) | (x as u32 as u64))
/// stream               = ChaCha8Rng::seed_from_u64(column_seed)
/// ```
///
/// Only the low 32 bits of `x` take part. Draws are taken in a fixed order:
/// the existence roll, the trunk height, then for each canopy cell (rows top
/// to bottom, columns left to right) a leaf roll, the leaf's two sway draws
/// when it exists, and a fruit roll. Every draw consumes exactly one `u32`
/// word of the stream. Changing any of this changes every tree in every world.
pub fn column_seed(x: i64, world_seed: u32) -> u64 {
    splitmix64(((world_seed as u64) << 32) | (x as u32 as u64))
}

pub struct FloraLayer {
    seed: u32,
    heightmap: Heightmap,
    block_size: i32,
    config: FloraConfig,
    fruit: FruitConfig,
}

impl FloraLayer {
    pub fn new(
        seed: u32,
        heightmap: Heightmap,
        block_size: i32,
        config: FloraConfig,
        fruit: FruitConfig,
    ) -> Self {
        Self {
            seed,
            heightmap,
            block_size,
            config,
            fruit,
        }
    }

    fn grow(&self, x: i64, rng: &mut ChaCha8Rng) -> Tree {
        let c = &self.config;
        let size = self.block_size as f32;

        let trunk_blocks = pick_inclusive(rng, c.trunk_min_blocks, c.trunk_max_blocks);
        let ground_y = self.heightmap.column_top(x as f32);
        let trunk_height = trunk_blocks as f32 * size;
        let top_y = ground_y - trunk_height;
        let trunk = Trunk {
            position: Vec2::new(x as f32, top_y),
            height: trunk_height,
            width: size,
        };

        let mut leaves = Vec::new();
        let mut fruits = Vec::new();
        let r = c.canopy_radius_blocks;
        for dy in -r..=r {
            for dx in -r..=r {
                let cell = Vec2::new(x as f32 + dx as f32 * size, top_y + dy as f32 * size);

                if unit(rng) < c.leaf_density {
                    let delay = unit(rng) * c.leaf_max_initial_delay;
                    let jitter = unit(rng);
                    leaves.push(Leaf {
                        position: cell,
                        sway: LeafSway {
                            start_delay: delay,
                            angle_cycle: c.wind_cycle_seconds,
                            width_cycle: c.wind_cycle_seconds + jitter,
                            max_angle_deg: c.leaf_max_angle_deg,
                            min_width_factor: c.leaf_min_width_factor,
                            max_width_factor: c.leaf_max_width_factor,
                        },
                    });
                }

                if unit(rng) < c.fruit_probability {
                    let center = cell + Vec2::splat(size * 0.5);
                    fruits.push(Fruit::new(
                        center - Vec2::splat(self.fruit.radius),
                        self.fruit.radius,
                    ));
                }
            }
        }

        Tree {
            root_x: x,
            trunk,
            leaves,
            fruits,
        }
    }
}

// One word per draw, independent of how `rand` maps words to floats and ranges.
fn unit(rng: &mut ChaCha8Rng) -> f32 {
    (rng.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}

fn pick_inclusive(rng: &mut ChaCha8Rng, min: u32, max: u32) -> u32 {
    let span = (max - min) as u64 + 1;
    min + ((rng.next_u32() as u64 * span) >> 32) as u32
}

impl Layer<i64, Option<Tree>> for FloraLayer {
    /// `x` must be block aligned; the caller owns the alignment.
    fn generate(&self, x: i64) -> Option<Tree> {
        let mut rng = ChaCha8Rng::seed_from_u64(column_seed(x, self.seed));
        if unit(&mut rng) >= self.config.tree_probability {
            return None;
        }
        Some(self.grow(x, &mut rng))
    }
}
