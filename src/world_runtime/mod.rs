mod runtime;
mod streaming;

pub use runtime::{LightingState, RuntimeStats, WorldRuntime};
pub use streaming::{ChunkStore, StreamingStats, SyncReport};
