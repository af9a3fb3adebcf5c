use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use glam::Vec2;

use crate::ui::EnergyDisplay;
use crate::world_core::avatar::{Avatar, AvatarState, InputState};
use crate::world_core::chunk::ChunkId;
use crate::world_core::config::GameConfig;
use crate::world_core::flora::LeafPose;
use crate::world_core::physics::{Aabb, Contact};
use crate::world_core::time::{sun_placement, SunPlacement, WorldClock};
use crate::world_runtime::streaming::{ChunkStore, SyncReport};

pub struct LightingState {
    pub night_opacity: f32,
    pub sun: SunPlacement,
}

pub struct RuntimeStats {
    pub tick: u64,
    pub elapsed: f64,
    pub loaded_chunks: usize,
    pub center_chunk: i32,
    pub materialized_total: u64,
    pub dematerialized_total: u64,
    pub avatar_state: AvatarState,
    pub avatar_position: Vec2,
    pub energy: f32,
    pub fruits_collected: u64,
}

/// One play session: the chunk store, the avatar and the frame clock, advanced
/// together by `update`.
pub struct WorldRuntime {
    config: GameConfig,
    streaming: ChunkStore,
    avatar: Avatar,
    clock: WorldClock,
    energy_display: Rc<RefCell<EnergyDisplay>>,
    last_contact: Contact,
    tick: u64,
    fruits_collected: u64,
}

impl WorldRuntime {
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;

        let mut streaming = ChunkStore::new(&config);
        let spawn_x = config.avatar.spawn_x;
        let ground_y = streaming.column_top(spawn_x);
        let mut avatar = Avatar::spawn_on_ground(spawn_x, ground_y, config.avatar.clone());

        let energy_display = Rc::new(RefCell::new(EnergyDisplay::new()));
        let display = Rc::clone(&energy_display);
        avatar.subscribe_energy(Box::new(move |energy| {
            display.borrow_mut().update_energy(energy)
        }));

        let clock = WorldClock::new(&config.day_cycle);
        streaming.sync(avatar.center().x, clock.elapsed());

        log::info!(
            "world ready: seed {}, load radius {}, unload margin {}, spawn ({:.1}, {:.1}), {} chunks",
            config.world.seed,
            config.world.load_radius,
            config.world.unload_margin,
            avatar.position().x,
            avatar.position().y,
            streaming.stats().loaded_chunks
        );

        Ok(Self {
            config,
            streaming,
            avatar,
            clock,
            energy_display,
            last_contact: Contact::default(),
            tick: 0,
            fruits_collected: 0,
        })
    }

    /// Advances the whole world by one frame.
    ///
    /// Order: due timers fire, the avatar moves, chunks stream around its new
    /// position, then collisions and fruit pickups resolve against what is
    /// loaded.
    pub fn update(&mut self, dt_seconds: f32, input: &InputState) -> SyncReport {
        self.tick += 1;
        self.clock.update(dt_seconds);
        let now = self.clock.elapsed();

        let respawned = self.streaming.update_timers(now);
        if respawned > 0 {
            log::debug!("{respawned} fruit respawned at {now:.2}s");
        }

        self.avatar.update(input, dt_seconds);

        let report = self.streaming.sync(self.avatar.center().x, now);

        let solids = self.solids_near_avatar();
        self.last_contact = self.avatar.resolve_collisions(&solids);
        self.collect_fruit(now);

        report
    }

    fn solids_near_avatar(&self) -> Vec<Aabb> {
        let bounds = self.avatar.bounds();
        let width = self.streaming.chunk_width();
        let first = ChunkId::containing(bounds.min.x, width).0;
        let last = ChunkId::containing(bounds.max.x, width).0;
        (first..=last)
            .filter_map(|id| self.streaming.chunk(ChunkId(id)))
            .flat_map(|chunk| chunk.solids())
            .collect()
    }

    fn collect_fruit(&mut self, now: f64) {
        let bounds = self.avatar.bounds();
        let respawn = self.config.fruit.respawn_seconds;
        let bonus = self.config.fruit.energy_bonus;

        // Canopies reach into neighbouring chunks, so every loaded fruit is
        // checked; awards are queued and applied once the store is released.
        let mut awards = Vec::new();
        for chunk in self.streaming.chunks_mut() {
            for fruit in chunk.fruits_mut() {
                let overlapping = fruit.bounds().overlaps(&bounds);
                fruit.touch(overlapping, now, respawn, bonus, &mut |amount| {
                    awards.push(amount)
                });
            }
        }

        for amount in awards {
            log::debug!("fruit collected, +{amount} energy");
            self.fruits_collected += 1;
            self.on_fruit_collected(amount);
        }
    }

    pub fn on_fruit_collected(&mut self, amount: f32) {
        self.avatar.increase_energy(amount);
    }

    pub fn ground_height_at(&self, x: f32) -> f32 {
        self.streaming.ground_height(x)
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn avatar_mut(&mut self) -> &mut Avatar {
        &mut self.avatar
    }

    pub fn streaming(&self) -> &ChunkStore {
        &self.streaming
    }

    pub fn last_contact(&self) -> Contact {
        self.last_contact
    }

    pub fn energy_text(&self) -> String {
        self.energy_display.borrow().text().to_string()
    }

    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn leaf_poses(&self) -> Vec<(Vec2, LeafPose)> {
        let now = self.clock.elapsed();
        self.streaming
            .chunks()
            .values()
            .flat_map(|chunk| chunk.leaf_poses(now))
            .collect()
    }

    pub fn lighting(&self) -> LightingState {
        let viewport = Vec2::new(
            self.config.world.viewport_width,
            self.config.world.viewport_height,
        );
        LightingState {
            night_opacity: self.clock.night_opacity(),
            sun: sun_placement(
                &self.clock,
                viewport,
                self.config.terrain.base_ground_factor,
                &self.config.day_cycle,
            ),
        }
    }

    pub fn stats(&self) -> RuntimeStats {
        let streaming = self.streaming.stats();
        RuntimeStats {
            tick: self.tick,
            elapsed: self.clock.elapsed(),
            loaded_chunks: streaming.loaded_chunks,
            center_chunk: streaming.center_chunk,
            materialized_total: streaming.materialized_total,
            dematerialized_total: streaming.dematerialized_total,
            avatar_state: self.avatar.state(),
            avatar_position: self.avatar.position(),
            energy: self.avatar.energy(),
            fruits_collected: self.fruits_collected,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::WorldRuntime;
    use crate::world_core::avatar::{AvatarState, InputState};
    use crate::world_core::chunk::ChunkId;
    use crate::world_core::chunk_generator::ChunkGenerator;
    use crate::world_core::config::GameConfig;
    use crate::world_core::fruit::FruitState;
    use crate::world_core::physics::Aabb;

    const DT: f32 = 1.0 / 60.0;

    fn runtime() -> WorldRuntime {
        WorldRuntime::new(GameConfig::default()).unwrap()
    }

    #[test]
    fn spawn_puts_feet_on_aligned_ground() {
        let world = runtime();
        let h0 = world.ground_height_at(0.0);
        assert!((h0 - 400.0).abs() < 1e-3);

        let aligned = (h0 / 30.0).floor() * 30.0;
        let avatar = world.avatar();
        assert_eq!(avatar.bounds().max.y, aligned);
        assert_eq!(avatar.position().x, 0.0);
        assert_eq!(world.energy_text(), "Energy: 100");
    }

    #[test]
    fn standing_still_settles_on_ground() {
        let mut world = runtime();
        for _ in 0..200 {
            world.update(DT, &InputState::default());
        }
        let settled = world.avatar().position();
        for _ in 0..100 {
            world.update(DT, &InputState::default());
        }
        assert!(world.avatar().is_on_ground());
        assert_eq!(world.avatar().state(), AvatarState::Idle);
        assert_eq!(world.avatar().position().y, settled.y);
        assert_eq!(world.stats().tick, 300);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = GameConfig::default();
        config.terrain.block_size = 0;
        assert!(WorldRuntime::new(config).is_err());
    }

    #[test]
    fn loaded_window_follows_the_avatar() {
        let mut world = runtime();
        let right = InputState {
            left: false,
            right: true,
            jump: false,
        };
        // Hold right and hop whenever the terrain stops us.
        for tick in 0..3000 {
            let blocked = world.last_contact().blocked_horizontally;
            let input = InputState {
                jump: blocked && tick % 2 == 0,
                ..right
            };
            world.update(DT, &input);
            let stats = world.stats();
            assert!(stats.loaded_chunks <= 11);
            assert!(world.avatar().energy() >= 0.0 && world.avatar().energy() <= 100.0);
        }
        let stats = world.stats();
        let center = stats.center_chunk;
        for id in (center - 3)..=(center + 3) {
            assert!(world.streaming().is_loaded(ChunkId(id)));
        }
    }

    fn find_fruit(world: &WorldRuntime) -> Option<(ChunkId, Vec2)> {
        world.streaming().chunks().iter().find_map(|(id, chunk)| {
            chunk.fruits().next().map(|fruit| (*id, fruit.position()))
        })
    }

    #[test]
    fn fruit_pickup_awards_energy_and_respawns_after_thirty_seconds() {
        let mut config = GameConfig::default();
        config.flora.tree_probability = 0.5;
        config.flora.fruit_probability = 0.5;
        let mut world = WorldRuntime::new(config).unwrap();

        let (chunk_id, fruit_pos) = find_fruit(&world).expect("no fruit near spawn");

        world.avatar_mut().increase_energy(-50.0);
        assert_eq!(world.avatar().energy(), 50.0);

        let now = world.elapsed();
        let mut awarded = Vec::new();
        let fruit = world
            .streaming
            .chunk_mut(chunk_id)
            .and_then(|chunk| chunk.fruits_mut().next())
            .expect("fruit still loaded");
        assert!(fruit.touch(true, now, 30.0, 10.0, &mut |a| awarded.push(a)));
        for amount in awarded {
            world.on_fruit_collected(amount);
        }
        let collected_at = now;
        assert_eq!(world.avatar().energy(), 60.0);

        let state = |world: &WorldRuntime| {
            world
                .streaming()
                .chunk(chunk_id)
                .and_then(|c| c.fruits().find(|f| f.position() == fruit_pos))
                .map(|f| f.state())
        };
        assert!(matches!(state(&world), Some(FruitState::Collected { .. })));

        let mut respawn_tick = None;
        for tick in 1..=1900u32 {
            world.update(DT, &InputState::default());
            if respawn_tick.is_none() && state(&world) == Some(FruitState::Available) {
                respawn_tick = Some(tick);
                let waited = world.elapsed() - collected_at;
                assert!(waited >= 30.0, "respawned early after {waited}s");
                assert!(waited < 30.0 + DT as f64 + 1e-6, "respawned late after {waited}s");
            }
        }
        assert!(respawn_tick.is_some());
    }

    #[test]
    fn standing_in_a_fruit_awards_it_once() {
        let mut config = GameConfig::default();
        config.terrain.broad.amplitude_blocks = 0.0;
        config.terrain.detail.amplitude_blocks = 0.0;

        // Flat ground: find a spot where a standing avatar overlaps exactly one
        // low-hanging fruit and no trunk.
        let generator = ChunkGenerator::new(&config);
        let ground = generator.heightmap().column_top(0.0);
        let size = config.avatar.size;
        let chunks: Vec<_> = (-60..60)
            .map(|id| generator.generate_chunk(ChunkId(id), 0.0))
            .collect();
        let trunks: Vec<Aabb> = chunks
            .iter()
            .flat_map(|chunk| chunk.trees.iter().map(|tree| tree.trunk.bounds()))
            .collect();
        let fruits: Vec<Aabb> = chunks
            .iter()
            .flat_map(|chunk| chunk.fruits().map(|fruit| fruit.bounds()))
            .collect();
        let standing = |x: f32| Aabb::from_top_left(Vec2::new(x, ground - size), Vec2::splat(size));
        let spawn_x = fruits
            .iter()
            .flat_map(|fruit| {
                let first = fruit.min.x as i32 - size as i32 + 1;
                (first..=fruit.max.x as i32).map(|x| x as f32)
            })
            .find(|&x| {
                let avatar = standing(x);
                fruits.iter().filter(|fruit| fruit.overlaps(&avatar)).count() == 1
                    && !trunks.iter().any(|trunk| trunk.overlaps(&avatar))
            })
            .expect("no fruit within reach of a standing avatar");

        config.avatar.spawn_x = spawn_x;
        let mut world = WorldRuntime::new(config).unwrap();
        world.avatar_mut().increase_energy(-50.0);

        let idle = InputState::default();
        world.update(DT, &idle);
        assert_eq!(world.stats().fruits_collected, 1);
        // Idle gain of 1, then the +10 award.
        assert_eq!(world.avatar().energy(), 61.0);
        assert_eq!(world.energy_text(), "Energy: 61");

        for _ in 0..30 {
            world.update(DT, &idle);
        }
        assert_eq!(world.avatar().position().x, spawn_x);
        assert_eq!(world.stats().fruits_collected, 1);
        assert_eq!(world.avatar().energy(), 91.0);
    }

    #[test]
    fn energy_display_follows_changes() {
        let mut world = runtime();
        let right = InputState {
            left: false,
            right: true,
            jump: false,
        };
        world.update(DT, &right);
        if world.avatar().state() == AvatarState::Run {
            assert_eq!(world.energy_text(), "Energy: 98");
        }
        world.avatar_mut().increase_energy(-1000.0);
        assert_eq!(world.energy_text(), "Energy: 0");
    }

    #[test]
    fn leaves_rest_until_their_delay_then_sway() {
        let mut config = GameConfig::default();
        config.flora.tree_probability = 0.5;
        let mut world = WorldRuntime::new(config).unwrap();
        let at_rest = world.leaf_poses();
        assert!(!at_rest.is_empty());
        assert!(at_rest
            .iter()
            .all(|(_, pose)| pose.angle_deg == 0.0 && pose.width_factor == 1.0));

        for _ in 0..60 {
            world.update(DT, &InputState::default());
        }
        for (_, pose) in world.leaf_poses() {
            assert!(pose.angle_deg.abs() <= 6.0 + 1e-4);
            assert!((0.995 - 1e-6..=1.005 + 1e-6).contains(&pose.width_factor));
        }
    }

    #[test]
    fn lighting_tracks_the_clock() {
        let mut world = runtime();
        assert_eq!(world.lighting().night_opacity, 0.0);
        for _ in 0..(15 * 60) {
            world.update(DT, &InputState::default());
        }
        assert!(world.lighting().night_opacity > 0.45);
    }
}
