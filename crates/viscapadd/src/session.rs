//! Address book and the active camera connection.

use colored::Colorize;

use viscapad_camera::{CameraError, FocusMode, Result};

use crate::camera::{CameraConnector, CameraLink};
use crate::{print_info, print_warning};

/// Owns the configured camera addresses and at most one open link.
pub struct CameraSession<C: CameraConnector> {
    connector: C,
    hosts: Vec<String>,
    active: Option<(usize, C::Link)>,
}

impl<C: CameraConnector> CameraSession<C> {
    pub fn new(connector: C, hosts: Vec<String>) -> Self {
        Self { connector, hosts, active: None }
    }

    /// Index of the camera currently driven, if any.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.active.as_ref().map(|(index, _)| *index)
    }

    /// Whether a camera with this index is configured at all.
    #[must_use]
    pub fn has_camera(&self, index: usize) -> bool {
        index < self.hosts.len()
    }

    /// The active link, if connected.
    pub fn link(&mut self) -> Option<&mut C::Link> {
        self.active.as_mut().map(|(_, link)| link)
    }

    /// Walks the address book until a camera answers.
    ///
    /// Returns the focus mode the first reachable camera reports. The
    /// last connection error surfaces when every address stays quiet.
    pub fn connect_initial(&mut self) -> Result<FocusMode> {
        let mut last = None;
        for index in 0..self.hosts.len() {
            print_info!("connecting to camera {}", index + 1);
            match self.open(index) {
                Ok(mode) => return Ok(mode),
                Err(e) => {
                    print_warning!("camera {} unreachable: {e}", index + 1);
                    last = Some(e);
                }
            }
        }
        Err(last.unwrap_or(CameraError::NoResponse))
    }

    /// Stops and closes the current camera, then connects another one.
    ///
    /// On failure the session is left without an active camera, the
    /// caller decides whether to fall back.
    pub fn switch_to(&mut self, index: usize) -> Result<FocusMode> {
        self.shutdown();
        self.open(index)
    }

    /// Re-asserts the pan and tilt speeds on the active camera.
    ///
    /// Quietly succeeds when no camera is connected.
    pub fn drive(&mut self, pan: i32, tilt: i32) -> Result<()> {
        match self.active.as_mut() {
            Some((_, link)) => link.pan_tilt(pan, tilt),
            None => Ok(()),
        }
    }

    /// Stops all motion and releases the connection.
    pub fn shutdown(&mut self) {
        if let Some((_, link)) = self.active.as_mut() {
            let _ = link.zoom(0);
            let _ = link.pan_tilt(0, 0);
            link.disconnect();
        }
        self.active = None;
    }

    fn open(&mut self, index: usize) -> Result<FocusMode> {
        let mut link = self.connector.connect(&self.hosts[index])?;
        link.zoom(0)?;
        let mode = match link.focus_mode() {
            Ok(mode) => mode,
            Err(e) => {
                print_warning!("camera {} focus state query failed: {e}", index + 1);
                FocusMode::Auto
            }
        };
        self.active = Some((index, link));
        print_info!("camera {} connected", index + 1);
        Ok(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::fake::{Call, FakeConnector};

    fn entry(host: &str, call: Call) -> (String, Call) {
        (host.to_string(), call)
    }

    #[test]
    fn discovery_skips_unreachable_cameras() {
        let (mut connector, journal) = FakeConnector::new();
        connector.unreachable = vec!["cam-a".to_string()];
        let mut session =
            CameraSession::new(connector, vec!["cam-a".to_string(), "cam-b".to_string()]);

        let mode = session.connect_initial().expect("second camera answers");
        assert_eq!(mode, FocusMode::Auto);
        assert_eq!(session.active_index(), Some(1));
        assert_eq!(
            *journal.borrow(),
            vec![entry("cam-b", Call::Connect), entry("cam-b", Call::Zoom(0))]
        );
    }

    #[test]
    fn discovery_fails_when_nothing_answers() {
        let (mut connector, journal) = FakeConnector::new();
        connector.unreachable = vec!["cam-a".to_string(), "cam-b".to_string()];
        let mut session =
            CameraSession::new(connector, vec!["cam-a".to_string(), "cam-b".to_string()]);

        assert!(matches!(
            session.connect_initial(),
            Err(CameraError::NoResponse)
        ));
        assert_eq!(session.active_index(), None);
        assert!(journal.borrow().is_empty());
    }

    #[test]
    fn discovery_reports_manual_focus_state() {
        let (mut connector, _journal) = FakeConnector::new();
        connector.focus = FocusMode::Manual;
        let mut session = CameraSession::new(connector, vec!["cam-a".to_string()]);

        let mode = session.connect_initial().expect("camera answers");
        assert_eq!(mode, FocusMode::Manual);
    }

    #[test]
    fn switching_stops_the_previous_camera_first() {
        let (connector, journal) = FakeConnector::new();
        let mut session =
            CameraSession::new(connector, vec!["cam-a".to_string(), "cam-b".to_string()]);
        session.connect_initial().expect("first camera answers");

        session.switch_to(1).expect("second camera answers");

        assert_eq!(session.active_index(), Some(1));
        assert_eq!(
            *journal.borrow(),
            vec![
                entry("cam-a", Call::Connect),
                entry("cam-a", Call::Zoom(0)),
                entry("cam-a", Call::Zoom(0)),
                entry("cam-a", Call::PanTilt(0, 0)),
                entry("cam-a", Call::Disconnect),
                entry("cam-b", Call::Connect),
                entry("cam-b", Call::Zoom(0)),
            ]
        );
    }

    #[test]
    fn failed_switch_leaves_no_active_camera() {
        let (mut connector, _journal) = FakeConnector::new();
        connector.unreachable = vec!["cam-b".to_string()];
        let mut session =
            CameraSession::new(connector, vec!["cam-a".to_string(), "cam-b".to_string()]);
        session.connect_initial().expect("first camera answers");

        assert!(session.switch_to(1).is_err());
        assert_eq!(session.active_index(), None);
        assert!(session.link().is_none());
    }

    #[test]
    fn driving_without_a_camera_is_quiet() {
        let (connector, journal) = FakeConnector::new();
        let mut session = CameraSession::new(connector, vec!["cam-a".to_string()]);

        session.drive(5, -3).expect("no camera, nothing to fail");
        assert!(journal.borrow().is_empty());
    }

    #[test]
    fn shutdown_is_idempotent() {
        let (connector, journal) = FakeConnector::new();
        let mut session = CameraSession::new(connector, vec!["cam-a".to_string()]);
        session.connect_initial().expect("camera answers");

        session.shutdown();
        let after_first = journal.borrow().len();
        session.shutdown();

        assert_eq!(journal.borrow().len(), after_first);
        assert_eq!(
            journal.borrow().last(),
            Some(&entry("cam-a", Call::Disconnect))
        );
    }
}
