use std::collections::HashMap;

use crate::world_core::chunk::{ChunkData, ChunkId};
use crate::world_core::chunk_generator::ChunkGenerator;
use crate::world_core::config::GameConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamingStats {
    pub loaded_chunks: usize,
    pub center_chunk: i32,
    pub materialized_total: u64,
    pub dematerialized_total: u64,
}

/// What one `sync` call changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub materialized: Vec<ChunkId>,
    pub dematerialized: Vec<ChunkId>,
}

/// Owns the loaded-chunk table and keeps it centred on the avatar.
///
/// Chunks within `load_radius` of the centre are materialized; a chunk is only
/// dropped once it is more than `load_radius + unload_margin` away, so
/// wandering back and forth over a boundary never reloads anything.
pub struct ChunkStore {
    generator: ChunkGenerator,
    load_radius: i32,
    unload_margin: i32,
    chunk_width: i32,
    loaded: HashMap<ChunkId, ChunkData>,
    center_chunk: ChunkId,
    materialized_total: u64,
    dematerialized_total: u64,
}

impl ChunkStore {
    pub fn new(config: &GameConfig) -> Self {
        let generator = ChunkGenerator::new(config);
        Self {
            chunk_width: generator.chunk_width(),
            generator,
            load_radius: config.world.load_radius,
            unload_margin: config.world.unload_margin,
            loaded: HashMap::new(),
            center_chunk: ChunkId(0),
            materialized_total: 0,
            dematerialized_total: 0,
        }
    }

    pub fn sync(&mut self, center_x: f32, now: f64) -> SyncReport {
        let mut report = SyncReport::default();

        self.center_chunk = ChunkId::containing(center_x, self.chunk_width);
        let center = self.center_chunk.0;

        let first = center.saturating_sub(self.load_radius);
        let last = center.saturating_add(self.load_radius);
        for id in first..=last {
            let id = ChunkId(id);
            if !self.loaded.contains_key(&id) {
                self.materialize(id, now);
                report.materialized.push(id);
            }
        }

        let keep = self.load_radius as i64 + self.unload_margin as i64;
        let mut evict: Vec<ChunkId> = self
            .loaded
            .keys()
            .copied()
            .filter(|id| id.distance(self.center_chunk) > keep)
            .collect();
        evict.sort();
        for id in evict {
            self.dematerialize(id);
            report.dematerialized.push(id);
        }

        report
    }

    fn materialize(&mut self, id: ChunkId, now: f64) {
        let chunk = self.generator.generate_chunk(id, now);
        log::debug!(
            "materialized chunk {} ({} entities, {} trees)",
            id.0,
            chunk.entity_count(),
            chunk.trees.len()
        );
        self.loaded.insert(id, chunk);
        self.materialized_total += 1;
    }

    fn dematerialize(&mut self, id: ChunkId) {
        if let Some(chunk) = self.loaded.remove(&id) {
            log::debug!(
                "dematerialized chunk {} ({} entities, {} pending respawns cancelled)",
                id.0,
                chunk.entity_count(),
                chunk.pending_respawns()
            );
            self.dematerialized_total += 1;
        }
    }

    /// Fires due respawn deadlines in every loaded chunk.
    pub fn update_timers(&mut self, now: f64) -> usize {
        self.loaded
            .values_mut()
            .map(|chunk| chunk.update_timers(now))
            .sum()
    }

    pub fn ground_height(&self, x: f32) -> f32 {
        self.generator.heightmap().sample_height(x)
    }

    pub fn column_top(&self, x: f32) -> f32 {
        self.generator.heightmap().column_top(x)
    }

    pub fn chunks(&self) -> &HashMap<ChunkId, ChunkData> {
        &self.loaded
    }

    pub fn chunks_mut(&mut self) -> impl Iterator<Item = &mut ChunkData> {
        self.loaded.values_mut()
    }

    pub fn chunk(&self, id: ChunkId) -> Option<&ChunkData> {
        self.loaded.get(&id)
    }

    pub fn chunk_mut(&mut self, id: ChunkId) -> Option<&mut ChunkData> {
        self.loaded.get_mut(&id)
    }

    pub fn is_loaded(&self, id: ChunkId) -> bool {
        self.loaded.contains_key(&id)
    }

    pub fn chunk_width(&self) -> i32 {
        self.chunk_width
    }

    pub fn stats(&self) -> StreamingStats {
        StreamingStats {
            loaded_chunks: self.loaded.len(),
            center_chunk: self.center_chunk.0,
            materialized_total: self.materialized_total,
            dematerialized_total: self.dematerialized_total,
        }
    }
}
