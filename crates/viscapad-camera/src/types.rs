/// Focus control ownership reported and set on the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMode {
    Auto,
    Manual,
}

impl FocusMode {
    pub fn opposite(self) -> Self {
        match self {
            Self::Auto => Self::Manual,
            Self::Manual => Self::Auto,
        }
    }
}

/// Direction of a manual focus drive command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusDrive {
    Near,
    Stop,
    Far,
}

/// Automatic exposure program selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExposureMode {
    Auto,
    Manual,
}

/// White balance program selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhiteBalanceMode {
    Auto,
    Manual,
}
