//! Byte-level VISCA-over-IP: the Sony UDP wrapper around VISCA payloads
//! plus the payload builders used by [`crate::Camera`].

use crate::types::{ExposureMode, FocusDrive, FocusMode, WhiteBalanceMode};
use crate::{CameraError, Result};

pub(crate) const TYPE_COMMAND: [u8; 2] = [0x01, 0x00];
pub(crate) const TYPE_INQUIRY: [u8; 2] = [0x01, 0x10];
pub(crate) const TYPE_CONTROL: [u8; 2] = [0x02, 0x00];

/// Control-command payload that resets the camera's sequence counter.
pub(crate) const CONTROL_RESET_SEQ: [u8; 1] = [0x01];

pub(crate) const PAN_SPEED_MAX: u32 = 0x18;
pub(crate) const TILT_SPEED_MAX: u32 = 0x14;
pub(crate) const ZOOM_SPEED_MAX: u32 = 0x07;

/// Wraps a VISCA payload into the 8-byte UDP header:
/// payload type, payload length, big-endian sequence counter.
pub(crate) fn encode_frame(
    payload_type: [u8; 2],
    seq: u32,
    payload: &[u8],
) -> Vec<u8> {
    let mut frame = Vec::with_capacity(8 + payload.len());
    frame.extend_from_slice(&payload_type);
    frame.extend_from_slice(&(payload.len() as u16).to_be_bytes());
    frame.extend_from_slice(&seq.to_be_bytes());
    frame.extend_from_slice(payload);
    frame
}

pub(crate) struct Frame<'a> {
    pub(crate) seq: u32,
    pub(crate) payload: &'a [u8],
}

pub(crate) fn decode_frame(buf: &[u8]) -> Result<Frame<'_>> {
    if buf.len() < 8 {
        return Err(CameraError::BadReply);
    }
    let declared = usize::from(u16::from_be_bytes([buf[2], buf[3]]));
    if declared == 0 || buf.len() < 8 + declared {
        return Err(CameraError::BadReply);
    }
    Ok(Frame {
        seq: u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]),
        payload: &buf[8..8 + declared],
    })
}

/// VISCA reply classes. `Other` covers control replies and shapes this
/// client never sends a matching request for.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Reply<'a> {
    Ack,
    Completion(&'a [u8]),
    Error(u8),
    Other,
}

pub(crate) fn classify_reply(payload: &[u8]) -> Reply<'_> {
    if payload.len() < 3 || payload[0] != 0x90 || payload[payload.len() - 1] != 0xFF
    {
        return Reply::Other;
    }
    match payload[1] >> 4 {
        0x04 => Reply::Ack,
        0x05 => Reply::Completion(&payload[2..payload.len() - 1]),
        0x06 if payload.len() >= 4 => Reply::Error(payload[2]),
        _ => Reply::Other,
    }
}

/// Continuous pan/tilt drive. Sign picks the direction, magnitude the
/// speed (clamped to the VISCA ranges), zero stops that axis. The speed
/// byte stays nonzero for stops; cameras ignore it there.
pub(crate) fn pan_tilt_drive(pan: i32, tilt: i32) -> [u8; 9] {
    let pan_speed = pan.unsigned_abs().clamp(1, PAN_SPEED_MAX) as u8;
    let tilt_speed = tilt.unsigned_abs().clamp(1, TILT_SPEED_MAX) as u8;
    let pan_dir: u8 = match pan {
        p if p < 0 => 0x01,
        p if p > 0 => 0x02,
        _ => 0x03,
    };
    let tilt_dir: u8 = match tilt {
        t if t > 0 => 0x01,
        t if t < 0 => 0x02,
        _ => 0x03,
    };
    [
        0x81, 0x01, 0x06, 0x01, pan_speed, tilt_speed, pan_dir, tilt_dir, 0xFF,
    ]
}

/// Continuous zoom drive: positive tele, negative wide, zero stop.
pub(crate) fn zoom_drive(speed: i32) -> [u8; 6] {
    let magnitude = speed.unsigned_abs().min(ZOOM_SPEED_MAX) as u8;
    let byte = match speed {
        s if s > 0 => 0x20 | magnitude,
        s if s < 0 => 0x30 | magnitude,
        _ => 0x00,
    };
    [0x81, 0x01, 0x04, 0x07, byte, 0xFF]
}

pub(crate) fn focus_mode_set(mode: FocusMode) -> [u8; 6] {
    let byte = match mode {
        FocusMode::Auto => 0x02,
        FocusMode::Manual => 0x03,
    };
    [0x81, 0x01, 0x04, 0x38, byte, 0xFF]
}

pub(crate) fn focus_mode_inquiry() -> [u8; 5] {
    [0x81, 0x09, 0x04, 0x38, 0xFF]
}

pub(crate) fn focus_mode_from_reply(data: &[u8]) -> Result<FocusMode> {
    match data {
        [0x02] => Ok(FocusMode::Auto),
        [0x03] => Ok(FocusMode::Manual),
        _ => Err(CameraError::BadReply),
    }
}

pub(crate) fn one_push_focus() -> [u8; 6] {
    [0x81, 0x01, 0x04, 0x38, 0x04, 0xFF]
}

pub(crate) fn manual_focus(drive: FocusDrive) -> [u8; 6] {
    let byte = match drive {
        FocusDrive::Stop => 0x00,
        FocusDrive::Far => 0x02,
        FocusDrive::Near => 0x03,
    };
    [0x81, 0x01, 0x04, 0x08, byte, 0xFF]
}

pub(crate) fn preset_save(slot: u8) -> [u8; 7] {
    [0x81, 0x01, 0x04, 0x3F, 0x01, slot & 0x7F, 0xFF]
}

pub(crate) fn preset_recall(slot: u8) -> [u8; 7] {
    [0x81, 0x01, 0x04, 0x3F, 0x02, slot & 0x7F, 0xFF]
}

pub(crate) fn exposure_mode_set(mode: ExposureMode) -> [u8; 6] {
    let byte = match mode {
        ExposureMode::Auto => 0x00,
        ExposureMode::Manual => 0x03,
    };
    [0x81, 0x01, 0x04, 0x39, byte, 0xFF]
}

pub(crate) fn white_balance_set(mode: WhiteBalanceMode) -> [u8; 6] {
    let byte = match mode {
        WhiteBalanceMode::Auto => 0x00,
        WhiteBalanceMode::Manual => 0x05,
    };
    [0x81, 0x01, 0x04, 0x35, byte, 0xFF]
}

pub(crate) fn power_set(on: bool) -> [u8; 6] {
    let byte = if on { 0x02 } else { 0x03 };
    [0x81, 0x01, 0x04, 0x00, byte, 0xFF]
}

pub(crate) fn if_clear() -> [u8; 5] {
    [0x81, 0x01, 0x00, 0x01, 0xFF]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_header_carries_type_length_and_sequence() {
        let frame = encode_frame(TYPE_COMMAND, 0x0102_0304, &[0xAA, 0xBB]);
        assert_eq!(
            frame,
            vec![0x01, 0x00, 0x00, 0x02, 0x01, 0x02, 0x03, 0x04, 0xAA, 0xBB]
        );
    }

    #[test]
    fn frame_round_trip() {
        let encoded = encode_frame(TYPE_INQUIRY, 7, &focus_mode_inquiry());
        let decoded = decode_frame(&encoded).expect("decode frame");
        assert_eq!(decoded.seq, 7);
        assert_eq!(decoded.payload, &focus_mode_inquiry()[..]);
    }

    #[test]
    fn decode_rejects_truncated_frames() {
        assert!(decode_frame(&[0x01, 0x00, 0x00]).is_err());
        // Header promises more payload than was received
        assert!(decode_frame(&[0x01, 0x11, 0x00, 0x04, 0, 0, 0, 1, 0x90]).is_err());
    }

    #[test]
    fn pan_tilt_drive_picks_directions_from_signs() {
        assert_eq!(
            pan_tilt_drive(5, -3),
            [0x81, 0x01, 0x06, 0x01, 0x05, 0x03, 0x02, 0x02, 0xFF]
        );
        assert_eq!(
            pan_tilt_drive(-20, 18),
            [0x81, 0x01, 0x06, 0x01, 0x14, 0x12, 0x01, 0x01, 0xFF]
        );
    }

    #[test]
    fn pan_tilt_drive_zero_is_stop_with_nonzero_speed() {
        assert_eq!(
            pan_tilt_drive(0, 0),
            [0x81, 0x01, 0x06, 0x01, 0x01, 0x01, 0x03, 0x03, 0xFF]
        );
    }

    #[test]
    fn pan_tilt_drive_clamps_speeds() {
        let frame = pan_tilt_drive(100, -100);
        assert_eq!(frame[4], 0x18);
        assert_eq!(frame[5], 0x14);
    }

    #[test]
    fn zoom_drive_encodes_tele_wide_and_stop() {
        assert_eq!(zoom_drive(7)[4], 0x27);
        assert_eq!(zoom_drive(-3)[4], 0x33);
        assert_eq!(zoom_drive(0)[4], 0x00);
        assert_eq!(zoom_drive(40)[4], 0x27);
    }

    #[test]
    fn classifies_ack_completion_and_error() {
        assert_eq!(classify_reply(&[0x90, 0x41, 0xFF]), Reply::Ack);
        assert_eq!(
            classify_reply(&[0x90, 0x50, 0x02, 0xFF]),
            Reply::Completion(&[0x02])
        );
        assert_eq!(classify_reply(&[0x90, 0x60, 0x41, 0xFF]), Reply::Error(0x41));
        assert_eq!(classify_reply(&[0x01]), Reply::Other);
        assert_eq!(classify_reply(&[0x90, 0x50, 0x02]), Reply::Other);
    }

    #[test]
    fn focus_mode_reply_parses_known_bytes_only() {
        assert_eq!(
            focus_mode_from_reply(&[0x02]).expect("auto"),
            FocusMode::Auto
        );
        assert_eq!(
            focus_mode_from_reply(&[0x03]).expect("manual"),
            FocusMode::Manual
        );
        assert!(focus_mode_from_reply(&[0x04]).is_err());
        assert!(focus_mode_from_reply(&[]).is_err());
    }
}
