use std::io;
use std::net::UdpSocket;
use std::time::Duration;

use crate::types::{ExposureMode, FocusDrive, FocusMode, WhiteBalanceMode};
use crate::wire::{self, Reply, CONTROL_RESET_SEQ, TYPE_COMMAND, TYPE_CONTROL, TYPE_INQUIRY};
use crate::{CameraError, Result};

/// Blocking VISCA-over-IP client for one camera.
///
/// Every command waits for the camera's ACK (or error) within the socket
/// timeout, so calls are synchronous and cheap to reason about from a
/// single control thread.
pub struct Camera {
    socket: UdpSocket,
    seq: u32,
}

impl Camera {
    /// Binds an ephemeral local port, addresses the camera and resets its
    /// sequence counter. Fails with [`CameraError::NoResponse`] when the
    /// camera does not answer the reset within `timeout`.
    pub fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self> {
        let socket = UdpSocket::bind(("0.0.0.0", 0))?;
        socket.connect((host, port))?;
        socket.set_read_timeout(Some(timeout))?;
        let mut camera = Self { socket, seq: 0 };
        camera.reset_sequence()?;
        Ok(camera)
    }

    /// Best-effort interface clear. The link is not usable afterwards.
    pub fn disconnect(&mut self) {
        let _ = self.send_visca(TYPE_COMMAND, &wire::if_clear());
    }

    pub fn pan_tilt(&mut self, pan: i32, tilt: i32) -> Result<()> {
        self.command(&wire::pan_tilt_drive(pan, tilt))
    }

    pub fn zoom(&mut self, speed: i32) -> Result<()> {
        self.command(&wire::zoom_drive(speed))
    }

    pub fn focus_mode(&mut self) -> Result<FocusMode> {
        let data = self.inquire(&wire::focus_mode_inquiry())?;
        wire::focus_mode_from_reply(&data)
    }

    pub fn set_focus_mode(&mut self, mode: FocusMode) -> Result<()> {
        self.command(&wire::focus_mode_set(mode))
    }

    pub fn one_push_focus(&mut self) -> Result<()> {
        self.command(&wire::one_push_focus())
    }

    pub fn manual_focus(&mut self, drive: FocusDrive) -> Result<()> {
        self.command(&wire::manual_focus(drive))
    }

    pub fn recall_preset(&mut self, slot: u8) -> Result<()> {
        self.command(&wire::preset_recall(slot))
    }

    pub fn save_preset(&mut self, slot: u8) -> Result<()> {
        self.command(&wire::preset_save(slot))
    }

    pub fn set_exposure_mode(&mut self, mode: ExposureMode) -> Result<()> {
        self.command(&wire::exposure_mode_set(mode))
    }

    pub fn set_white_balance(&mut self, mode: WhiteBalanceMode) -> Result<()> {
        self.command(&wire::white_balance_set(mode))
    }

    pub fn set_power(&mut self, on: bool) -> Result<()> {
        self.command(&wire::power_set(on))
    }

    fn reset_sequence(&mut self) -> Result<()> {
        let frame = wire::encode_frame(TYPE_CONTROL, 0, &CONTROL_RESET_SEQ);
        self.socket.send(&frame)?;
        // Any decodable answer proves a camera is listening
        let mut buf = [0u8; 256];
        let read = self.recv(&mut buf)?;
        wire::decode_frame(&buf[..read])?;
        self.seq = 0;
        Ok(())
    }

    fn send_visca(&mut self, payload_type: [u8; 2], payload: &[u8]) -> Result<u32> {
        self.seq = self.seq.wrapping_add(1);
        let frame = wire::encode_frame(payload_type, self.seq, payload);
        self.socket.send(&frame)?;
        Ok(self.seq)
    }

    /// Sends a command and waits for its ACK, skipping stale replies to
    /// earlier sequence numbers (late completions of previous commands).
    fn command(&mut self, payload: &[u8]) -> Result<()> {
        let seq = self.send_visca(TYPE_COMMAND, payload)?;
        let mut buf = [0u8; 256];
        loop {
            let read = self.recv(&mut buf)?;
            let Ok(frame) = wire::decode_frame(&buf[..read]) else {
                continue;
            };
            if frame.seq != seq {
                continue;
            }
            match wire::classify_reply(frame.payload) {
                Reply::Ack | Reply::Completion(_) => return Ok(()),
                Reply::Error(code) => return Err(CameraError::Rejected(code)),
                Reply::Other => return Err(CameraError::BadReply),
            }
        }
    }

    fn inquire(&mut self, payload: &[u8]) -> Result<Vec<u8>> {
        let seq = self.send_visca(TYPE_INQUIRY, payload)?;
        let mut buf = [0u8; 256];
        loop {
            let read = self.recv(&mut buf)?;
            let Ok(frame) = wire::decode_frame(&buf[..read]) else {
                continue;
            };
            if frame.seq != seq {
                continue;
            }
            match wire::classify_reply(frame.payload) {
                Reply::Completion(data) => return Ok(data.to_vec()),
                Reply::Error(code) => return Err(CameraError::Rejected(code)),
                Reply::Ack => continue,
                Reply::Other => return Err(CameraError::BadReply),
            }
        }
    }

    fn recv(&self, buf: &mut [u8]) -> Result<usize> {
        match self.socket.recv(buf) {
            Ok(read) => Ok(read),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
                ) =>
            {
                Err(CameraError::NoResponse)
            }
            Err(e) => Err(e.into()),
        }
    }
}
