use rayon::prelude::*;

use crate::world_core::chunk::{Block, ChunkData, ChunkId};
use crate::world_core::config::GameConfig;
use crate::world_core::flora::{FloraLayer, Tree};
use crate::world_core::heightmap::Heightmap;
use crate::world_core::layer::Layer;
use crate::world_core::terrain::TerrainLayer;

pub struct ChunkGenerator {
    terrain_layer: TerrainLayer,
    flora_layer: FloraLayer,
    block_size: i32,
    chunk_blocks: i32,
}

impl ChunkGenerator {
    pub fn new(config: &GameConfig) -> Self {
        let seed = config.world.seed;
        let block_size = config.terrain.block_size;
        let heightmap = Heightmap::new(seed, config.baseline(), &config.terrain);
        Self {
            flora_layer: FloraLayer::new(
                seed,
                heightmap.clone(),
                block_size,
                config.flora.clone(),
                config.fruit.clone(),
            ),
            terrain_layer: TerrainLayer::new(heightmap, block_size, config.terrain.depth),
            block_size,
            chunk_blocks: config.world.chunk_blocks,
        }
    }

    pub fn heightmap(&self) -> &Heightmap {
        self.terrain_layer.heightmap()
    }

    pub fn chunk_width(&self) -> i32 {
        self.block_size * self.chunk_blocks
    }

    /// Columns are pure, so they are generated in parallel; the chunk is only
    /// returned once every column is done.
    pub fn generate_chunk(&self, id: ChunkId, now: f64) -> ChunkData {
        let start_x = id.start_x(self.chunk_width());

        let columns: Vec<(Vec<Block>, Option<Tree>)> = (0..self.chunk_blocks)
            .into_par_iter()
            .map(|i| {
                let x = start_x + i as i64 * self.block_size as i64;
                (self.terrain_layer.generate(x), self.flora_layer.generate(x))
            })
            .collect();

        let mut blocks = Vec::with_capacity(columns.iter().map(|(b, _)| b.len()).sum());
        let mut trees = Vec::new();
        for (column_blocks, tree) in columns {
            blocks.extend(column_blocks);
            trees.extend(tree);
        }

        ChunkData {
            id,
            blocks,
            trees,
            block_size: self.block_size as f32,
            materialized_at: now,
        }
    }
}
