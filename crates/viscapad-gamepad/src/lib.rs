mod pad;
mod types;

use thiserror::Error;

pub use crate::pad::Gamepad;
pub use crate::types::{Axis, Button, RawSample, SampleBatch};

/// Error type for gamepad backend operations.
#[derive(Debug, Error)]
pub enum GamepadError {
    /// Failed to initialize the backend (SDL2 or subsystems).
    #[error("backend init failed: {0}")]
    Init(String),
    /// The active controller is gone; the caller should poll for a new one.
    #[error("controller disconnected")]
    Disconnected,
}

/// Convenient result alias for gamepad operations.
pub type Result<T> = std::result::Result<T, GamepadError>;
