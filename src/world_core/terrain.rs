use glam::Vec2;

use crate::world_core::chunk::Block;
use crate::world_core::heightmap::Heightmap;
use crate::world_core::layer::Layer;

/// Builds the fixed-depth block stack under one aligned column.
pub struct TerrainLayer {
    heightmap: Heightmap,
    block_size: i32,
    depth: u32,
}

impl TerrainLayer {
    pub fn new(heightmap: Heightmap, block_size: i32, depth: u32) -> Self {
        Self {
            heightmap,
            block_size,
            depth,
        }
    }

    pub fn heightmap(&self) -> &Heightmap {
        &self.heightmap
    }
}

impl Layer<i64, Vec<Block>> for TerrainLayer {
    fn generate(&self, x: i64) -> Vec<Block> {
        let size = self.block_size as f32;
        let top = self.heightmap.column_top(x as f32);
        (0..self.depth)
            .map(|i| Block {
                position: Vec2::new(x as f32, top + i as f32 * size),
            })
            .collect()
    }
}
