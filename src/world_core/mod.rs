pub mod avatar;
pub mod chunk;
pub mod chunk_generator;
pub mod config;
pub mod flora;
pub mod fruit;
pub mod heightmap;
pub mod layer;
pub mod physics;
pub mod terrain;
pub mod time;
