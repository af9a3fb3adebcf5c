use glam::Vec2;

use crate::world_core::flora::{LeafPose, Tree};
use crate::world_core::fruit::Fruit;
use crate::world_core::physics::Aabb;

/// Index of a fixed-width horizontal slice of the world. Unbounded in both
/// directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(pub i32);

impl ChunkId {
    /// Floored, so x in `[-width, 0)` maps to chunk -1, not 0. Positions
    /// beyond the `i32` range saturate to the outermost chunk.
    pub fn containing(x: f32, chunk_width: i32) -> Self {
        Self((x.floor() as i32).div_euclid(chunk_width))
    }

    pub fn start_x(self, chunk_width: i32) -> i64 {
        self.0 as i64 * chunk_width as i64
    }

    pub fn distance(self, other: ChunkId) -> i64 {
        (self.0 as i64 - other.0 as i64).abs()
    }
}

/// Immovable terrain cell. Its edge length is the world's block size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub position: Vec2,
}

impl Block {
    pub fn bounds(&self, block_size: f32) -> Aabb {
        Aabb::from_top_left(self.position, Vec2::splat(block_size))
    }
}

/// Everything materialized for one chunk. Built whole, dropped whole.
#[derive(Debug, Clone)]
pub struct ChunkData {
    pub id: ChunkId,
    pub blocks: Vec<Block>,
    pub trees: Vec<Tree>,
    pub block_size: f32,
    /// World clock value at materialization; leaf sway is timed from here.
    pub materialized_at: f64,
}

impl ChunkData {
    pub fn entity_count(&self) -> usize {
        self.blocks.len() + self.trees.iter().map(Tree::entity_count).sum::<usize>()
    }

    /// Terrain blocks and trunks.
    pub fn solids(&self) -> impl Iterator<Item = Aabb> + '_ {
        let size = self.block_size;
        self.blocks
            .iter()
            .map(move |block| block.bounds(size))
            .chain(self.trees.iter().map(|tree| tree.trunk.bounds()))
    }

    pub fn fruits(&self) -> impl Iterator<Item = &Fruit> {
        self.trees.iter().flat_map(|tree| tree.fruits.iter())
    }

    pub fn fruits_mut(&mut self) -> impl Iterator<Item = &mut Fruit> {
        self.trees.iter_mut().flat_map(|tree| tree.fruits.iter_mut())
    }

    pub fn pending_respawns(&self) -> usize {
        self.fruits().filter(|fruit| fruit.has_pending_respawn()).count()
    }

    /// Leaf positions with their sway at world time `now`.
    pub fn leaf_poses(&self, now: f64) -> impl Iterator<Item = (Vec2, LeafPose)> + '_ {
        let since = (now - self.materialized_at) as f32;
        self.trees
            .iter()
            .flat_map(|tree| tree.leaves.iter())
            .map(move |leaf| (leaf.position, leaf.sway.pose(since)))
    }

    /// Fires every respawn deadline that has passed. Returns how many fired.
    pub fn update_timers(&mut self, now: f64) -> usize {
        self.fruits_mut()
            .map(|fruit| fruit.update(now))
            .filter(|fired| *fired)
            .count()
    }
}
