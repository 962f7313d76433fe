//! Camera boundary used by the control loop.

use std::time::Duration;

use viscapad_camera::{Camera, ExposureMode, FocusDrive, FocusMode, Result, WhiteBalanceMode};

/// Camera operations the control loop needs.
///
/// [`viscapad_camera::Camera`] is the production implementation,
/// tests substitute a recording fake.
pub trait CameraLink {
    fn pan_tilt(&mut self, pan: i32, tilt: i32) -> Result<()>;
    fn zoom(&mut self, speed: i32) -> Result<()>;
    fn focus_mode(&mut self) -> Result<FocusMode>;
    fn set_focus_mode(&mut self, mode: FocusMode) -> Result<()>;
    fn one_push_focus(&mut self) -> Result<()>;
    fn manual_focus(&mut self, drive: FocusDrive) -> Result<()>;
    fn recall_preset(&mut self, slot: u8) -> Result<()>;
    fn save_preset(&mut self, slot: u8) -> Result<()>;
    fn set_exposure_mode(&mut self, mode: ExposureMode) -> Result<()>;
    fn set_white_balance(&mut self, mode: WhiteBalanceMode) -> Result<()>;
    fn disconnect(&mut self);
}

impl CameraLink for Camera {
    fn pan_tilt(&mut self, pan: i32, tilt: i32) -> Result<()> {
        Camera::pan_tilt(self, pan, tilt)
    }

    fn zoom(&mut self, speed: i32) -> Result<()> {
        Camera::zoom(self, speed)
    }

    fn focus_mode(&mut self) -> Result<FocusMode> {
        Camera::focus_mode(self)
    }

    fn set_focus_mode(&mut self, mode: FocusMode) -> Result<()> {
        Camera::set_focus_mode(self, mode)
    }

    fn one_push_focus(&mut self) -> Result<()> {
        Camera::one_push_focus(self)
    }

    fn manual_focus(&mut self, drive: FocusDrive) -> Result<()> {
        Camera::manual_focus(self, drive)
    }

    fn recall_preset(&mut self, slot: u8) -> Result<()> {
        Camera::recall_preset(self, slot)
    }

    fn save_preset(&mut self, slot: u8) -> Result<()> {
        Camera::save_preset(self, slot)
    }

    fn set_exposure_mode(&mut self, mode: ExposureMode) -> Result<()> {
        Camera::set_exposure_mode(self, mode)
    }

    fn set_white_balance(&mut self, mode: WhiteBalanceMode) -> Result<()> {
        Camera::set_white_balance(self, mode)
    }

    fn disconnect(&mut self) {
        Camera::disconnect(self);
    }
}

/// Opens camera links by host address.
pub trait CameraConnector {
    type Link: CameraLink;

    fn connect(&mut self, host: &str) -> Result<Self::Link>;
}

/// Production connector for VISCA-over-IP cameras.
#[derive(Debug, Clone)]
pub struct ViscaConnector {
    port: u16,
    timeout: Duration,
}

impl ViscaConnector {
    #[must_use]
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self { port, timeout }
    }
}

impl CameraConnector for ViscaConnector {
    type Link = Camera;

    fn connect(&mut self, host: &str) -> Result<Camera> {
        Camera::connect(host, self.port, self.timeout)
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! Recording camera fake shared by the control loop tests.

    use std::cell::RefCell;
    use std::rc::Rc;

    use viscapad_camera::{CameraError, ExposureMode, FocusDrive, FocusMode, WhiteBalanceMode};

    use super::{CameraConnector, CameraLink};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Call {
        Connect,
        PanTilt(i32, i32),
        Zoom(i32),
        SetFocusMode(FocusMode),
        OnePush,
        ManualFocus(FocusDrive),
        RecallPreset(u8),
        SavePreset(u8),
        Exposure(ExposureMode),
        WhiteBalance(WhiteBalanceMode),
        Disconnect,
    }

    pub(crate) type Journal = Rc<RefCell<Vec<(String, Call)>>>;

    pub(crate) struct FakeConnector {
        pub journal: Journal,
        /// Hosts that refuse the connection.
        pub unreachable: Vec<String>,
        /// Focus mode reported by every opened link.
        pub focus: FocusMode,
        /// Makes preset recalls fail with a rejection.
        pub reject_recall: bool,
        /// Makes focus mode changes fail with a rejection.
        pub reject_focus: bool,
        /// Makes pan-tilt drives fail with a rejection.
        pub reject_drive: bool,
    }

    impl FakeConnector {
        pub(crate) fn new() -> (Self, Journal) {
            let journal: Journal = Rc::default();
            let connector = Self {
                journal: Rc::clone(&journal),
                unreachable: Vec::new(),
                focus: FocusMode::Auto,
                reject_recall: false,
                reject_focus: false,
                reject_drive: false,
            };
            (connector, journal)
        }
    }

    impl CameraConnector for FakeConnector {
        type Link = FakeLink;

        fn connect(&mut self, host: &str) -> Result<FakeLink, CameraError> {
            if self.unreachable.iter().any(|h| h == host) {
                return Err(CameraError::NoResponse);
            }
            self.journal
                .borrow_mut()
                .push((host.to_string(), Call::Connect));
            Ok(FakeLink {
                host: host.to_string(),
                journal: Rc::clone(&self.journal),
                focus: self.focus,
                reject_recall: self.reject_recall,
                reject_focus: self.reject_focus,
                reject_drive: self.reject_drive,
            })
        }
    }

    pub(crate) struct FakeLink {
        host: String,
        journal: Journal,
        focus: FocusMode,
        reject_recall: bool,
        reject_focus: bool,
        reject_drive: bool,
    }

    impl FakeLink {
        fn record(&self, call: Call) {
            self.journal.borrow_mut().push((self.host.clone(), call));
        }
    }

    impl CameraLink for FakeLink {
        fn pan_tilt(&mut self, pan: i32, tilt: i32) -> Result<(), CameraError> {
            self.record(Call::PanTilt(pan, tilt));
            if self.reject_drive {
                return Err(CameraError::Rejected(0x41));
            }
            Ok(())
        }

        fn zoom(&mut self, speed: i32) -> Result<(), CameraError> {
            self.record(Call::Zoom(speed));
            Ok(())
        }

        fn focus_mode(&mut self) -> Result<FocusMode, CameraError> {
            Ok(self.focus)
        }

        fn set_focus_mode(&mut self, mode: FocusMode) -> Result<(), CameraError> {
            self.record(Call::SetFocusMode(mode));
            if self.reject_focus {
                return Err(CameraError::Rejected(0x41));
            }
            self.focus = mode;
            Ok(())
        }

        fn one_push_focus(&mut self) -> Result<(), CameraError> {
            self.record(Call::OnePush);
            Ok(())
        }

        fn manual_focus(&mut self, drive: FocusDrive) -> Result<(), CameraError> {
            self.record(Call::ManualFocus(drive));
            Ok(())
        }

        fn recall_preset(&mut self, slot: u8) -> Result<(), CameraError> {
            self.record(Call::RecallPreset(slot));
            if self.reject_recall {
                return Err(CameraError::Rejected(0x41));
            }
            Ok(())
        }

        fn save_preset(&mut self, slot: u8) -> Result<(), CameraError> {
            self.record(Call::SavePreset(slot));
            Ok(())
        }

        fn set_exposure_mode(&mut self, mode: ExposureMode) -> Result<(), CameraError> {
            self.record(Call::Exposure(mode));
            Ok(())
        }

        fn set_white_balance(&mut self, mode: WhiteBalanceMode) -> Result<(), CameraError> {
            self.record(Call::WhiteBalance(mode));
            Ok(())
        }

        fn disconnect(&mut self) {
            self.record(Call::Disconnect);
        }
    }
}
