use noise::{NoiseFn, OpenSimplex};

use crate::world_core::config::{NoiseLayer, TerrainConfig};

/// Ground elevation along the horizontal axis.
///
/// Each noise layer is sampled along a line and shifted by its own value at
/// `x = 0`, so the surface passes exactly through the baseline at the origin.
#[derive(Clone)]
pub struct Heightmap {
    broad: OpenSimplex,
    detail: OpenSimplex,
    baseline: f32,
    block_size: f32,
    broad_layer: NoiseLayer,
    detail_layer: NoiseLayer,
}

impl Heightmap {
    pub fn new(seed: u32, baseline: f32, config: &TerrainConfig) -> Self {
        Self {
            broad: OpenSimplex::new(seed),
            detail: OpenSimplex::new(seed.wrapping_add(907)),
            baseline,
            block_size: config.block_size as f32,
            broad_layer: config.broad.clone(),
            detail_layer: config.detail.clone(),
        }
    }

    pub fn sample_height(&self, x: f32) -> f32 {
        let broad = self.sample_layer(&self.broad, &self.broad_layer, x);
        let detail = self.sample_layer(&self.detail, &self.detail_layer, x);
        self.baseline + broad + detail
    }

    /// Top of the column's surface block, aligned down to a block boundary.
    pub fn column_top(&self, x: f32) -> f32 {
        (self.sample_height(x) / self.block_size).floor() * self.block_size
    }

    fn sample_layer(&self, noise: &OpenSimplex, layer: &NoiseLayer, x: f32) -> f32 {
        let wavelength = (layer.wavelength_blocks * self.block_size) as f64;
        if wavelength <= 0.0 || layer.amplitude_blocks == 0.0 {
            return 0.0;
        }
        let origin = noise.get([0.0, 0.0]);
        let value = noise.get([x as f64 / wavelength, 0.0]);
        ((value - origin) as f32) * layer.amplitude_blocks * self.block_size
    }
}
