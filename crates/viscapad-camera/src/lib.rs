mod camera;
mod types;
mod wire;

use thiserror::Error;

pub use crate::camera::Camera;
pub use crate::types::{ExposureMode, FocusDrive, FocusMode, WhiteBalanceMode};

/// Error type for camera link operations.
#[derive(Debug, Error)]
pub enum CameraError {
    /// The camera did not answer within the socket timeout.
    #[error("no response from camera")]
    NoResponse,
    /// The camera answered with a VISCA error reply.
    #[error("command rejected by camera (code 0x{0:02x})")]
    Rejected(u8),
    /// The camera answered with bytes that do not form a VISCA reply.
    #[error("malformed reply from camera")]
    BadReply,
    /// Socket-level failure.
    #[error("camera socket error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient result alias for camera operations.
pub type Result<T> = std::result::Result<T, CameraError>;
