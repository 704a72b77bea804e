//! Player, mobs and their registry for the Terravox voxel sandbox.
//!
//! Mobs live in a [`hecs`] world owned by [`EntityRegistry`]; the player is
//! a plain struct that also mines and places blocks. Both move through
//! `terravox_physics::step`.

pub mod health;
pub mod inventory;
pub mod mob;
pub mod player;
pub mod registry;

pub use health::Health;
pub use hecs::Entity;
pub use mob::{AttackCooldown, Mob, MobStats};
pub use inventory::Inventory;
pub use player::{MineOutcome, MiningProgress, Player, PlayerIntent, WORLD_BOTTOM_THRESHOLD};
pub use registry::{EntityRegistry, MobUpdate};
