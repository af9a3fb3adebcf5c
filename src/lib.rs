pub mod app;
pub mod ui;
pub mod world_core;
pub mod world_runtime;
