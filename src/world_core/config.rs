use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub terrain: TerrainConfig,
    pub flora: FloraConfig,
    pub fruit: FruitConfig,
    pub avatar: AvatarConfig,
    pub day_cycle: DayCycleConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            terrain: TerrainConfig::default(),
            flora: FloraConfig::default(),
            fruit: FruitConfig::default(),
            avatar: AvatarConfig::default(),
            day_cycle: DayCycleConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn load() -> Self {
        let path = std::path::Path::new("config.json");
        if !path.exists() {
            log::info!("no config.json found, using defaults");
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(config) => {
                    log::info!("loaded config.json");
                    config
                }
                Err(e) => {
                    log::warn!("failed to parse config.json: {e}, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("failed to read config.json: {e}, using defaults");
                Self::default()
            }
        }
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Rejects settings the generators and the streaming store cannot work with.
    pub fn validate(&self) -> Result<()> {
        let w = &self.world;
        let t = &self.terrain;
        let f = &self.flora;

        if t.block_size <= 0 {
            bail!("terrain.block_size must be positive, got {}", t.block_size);
        }
        if t.depth == 0 {
            bail!("terrain.depth must be at least one block");
        }
        if w.chunk_blocks <= 0 {
            bail!("world.chunk_blocks must be positive, got {}", w.chunk_blocks);
        }
        if w.load_radius < 0 || w.unload_margin < 0 {
            bail!(
                "world radii must be non-negative, got load {} unload margin {}",
                w.load_radius,
                w.unload_margin
            );
        }
        if w.viewport_width <= 0.0 || w.viewport_height <= 0.0 {
            bail!(
                "viewport must be positive, got {}x{}",
                w.viewport_width,
                w.viewport_height
            );
        }
        if f.trunk_min_blocks > f.trunk_max_blocks {
            bail!(
                "flora trunk range is inverted: {}..={}",
                f.trunk_min_blocks,
                f.trunk_max_blocks
            );
        }
        if self.fruit.respawn_seconds <= 0.0 {
            bail!("fruit.respawn_seconds must be positive");
        }
        if self.avatar.max_energy <= 0.0 {
            bail!("avatar.max_energy must be positive");
        }
        if self.day_cycle.cycle_seconds <= 0.0 {
            bail!("day_cycle.cycle_seconds must be positive");
        }
        Ok(())
    }

    pub fn chunk_width(&self) -> i32 {
        self.world.chunk_blocks * self.terrain.block_size
    }

    /// Ground level at x = 0, in screen pixels from the top of the viewport.
    pub fn baseline(&self) -> f32 {
        self.world.viewport_height * self.terrain.base_ground_factor
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: u32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub chunk_blocks: i32,
    pub load_radius: i32,
    pub unload_margin: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 1234,
            viewport_width: 1200.0,
            viewport_height: 600.0,
            chunk_blocks: 10,
            load_radius: 3,
            unload_margin: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NoiseLayer {
    pub wavelength_blocks: f32,
    pub amplitude_blocks: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub block_size: i32,
    pub depth: u32,
    pub base_ground_factor: f32,
    pub broad: NoiseLayer,
    pub detail: NoiseLayer,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            block_size: 30,
            depth: 20,
            base_ground_factor: 2.0 / 3.0,
            broad: NoiseLayer {
                wavelength_blocks: 10.0,
                amplitude_blocks: 4.0,
            },
            detail: NoiseLayer {
                wavelength_blocks: 2.5,
                amplitude_blocks: 0.6,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FloraConfig {
    pub tree_probability: f32,
    pub trunk_min_blocks: u32,
    pub trunk_max_blocks: u32,
    pub canopy_radius_blocks: i32,
    pub leaf_density: f32,
    pub fruit_probability: f32,
    pub leaf_max_initial_delay: f32,
    pub wind_cycle_seconds: f32,
    pub leaf_max_angle_deg: f32,
    pub leaf_min_width_factor: f32,
    pub leaf_max_width_factor: f32,
}

impl Default for FloraConfig {
    fn default() -> Self {
        Self {
            tree_probability: 0.1,
            trunk_min_blocks: 4,
            trunk_max_blocks: 8,
            canopy_radius_blocks: 2,
            leaf_density: 0.8,
            fruit_probability: 0.08,
            leaf_max_initial_delay: 0.5,
            wind_cycle_seconds: 2.0,
            leaf_max_angle_deg: 6.0,
            leaf_min_width_factor: 0.995,
            leaf_max_width_factor: 1.005,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FruitConfig {
    pub radius: f32,
    pub energy_bonus: f32,
    pub respawn_seconds: f64,
}

impl Default for FruitConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            energy_bonus: 10.0,
            respawn_seconds: 30.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    pub size: f32,
    pub spawn_x: f32,
    pub gravity: f32,
    pub run_speed: f32,
    pub jump_velocity: f32,
    pub max_energy: f32,
    pub idle_gain: f32,
    pub run_cost: f32,
    pub run_threshold: f32,
    pub jump_cost: f32,
    pub double_jump_cost: f32,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            size: 50.0,
            spawn_x: 0.0,
            gravity: 600.0,
            run_speed: 400.0,
            jump_velocity: -650.0,
            max_energy: 100.0,
            idle_gain: 1.0,
            run_cost: 2.0,
            run_threshold: 2.0,
            jump_cost: 20.0,
            double_jump_cost: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DayCycleConfig {
    pub cycle_seconds: f32,
    pub midnight_opacity: f32,
    pub sun_diameter: f32,
    pub halo_scale: f32,
}

impl Default for DayCycleConfig {
    fn default() -> Self {
        Self {
            cycle_seconds: 30.0,
            midnight_opacity: 0.5,
            sun_diameter: 80.0,
            halo_scale: 2.0,
        }
    }
}
