//! Entity physics for the Terravox voxel sandbox.
//!
//! Bodies are axis-aligned boxes standing on their bottom centre. [`step`]
//! integrates gravity and moves them one axis at a time against any
//! [`BlockAccess`](terravox_core::BlockAccess) implementation, so the same
//! code runs against streamed chunks or a hand-built [`BlockGrid`].

pub mod body;
pub mod collision;
pub mod config;
pub mod grid;
pub mod raycast;

pub use body::{Body, MotionState};
pub use collision::{aabb_collides, step, StepOutcome};
pub use config::PhysicsConfig;
pub use grid::BlockGrid;
pub use raycast::{raycast, RaycastHit};
