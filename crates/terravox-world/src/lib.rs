//! Chunked voxel world for the Terravox sandbox.
//!
//! Terrain is generated per 16x16 column chunk from seeded gradient noise,
//! streamed around a focus position, and kept alive by a budgeted random-tick
//! pass (falling blocks, water, fire, farmland) plus a day clock and mob
//! spawner. [`World`] ties these together.

pub mod biome;
pub mod block_physics;
pub mod chunk;
pub mod chunk_manager;
pub mod clock;
pub mod decoration;
pub mod events;
pub mod generation;
pub mod gradient;
pub mod scheduler;
pub mod spawning;
pub mod streaming;
pub mod world;

pub use biome::{Biome, BiomeMap};
pub use block_physics::{BlockPhysics, BlockPhysicsStats};
pub use chunk::Chunk;
pub use chunk_manager::ChunkManager;
pub use clock::DayClock;
pub use events::WorldEvent;
pub use generation::{ColumnInfo, TerrainConfig, TerrainGenerator};
pub use gradient::GradientNoise;
pub use scheduler::RandomTickQueue;
pub use spawning::{MobCensus, SpawnConfig, Spawner};
pub use streaming::{ChunkStreamer, StreamingConfig, StreamingReport};
pub use world::{TickConfig, TickContext, World, WorldConfig, WorldUpdate, MAX_LOAD_RADIUS};

/// World seed for procedural generation.
pub type WorldSeed = u64;
