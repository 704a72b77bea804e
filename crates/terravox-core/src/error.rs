//! Error types for the workspace.

use thiserror::Error;

/// Workspace-wide error type.
///
/// Per-voxel access never fails; these cover configuration and snapshot data.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration rejected at construction time
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid data error
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Edit of a cell that is unloaded or outside the world height
    #[error("Out of bounds: {0}")]
    OutOfBounds(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
