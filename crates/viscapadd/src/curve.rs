//! Joystick deflection to camera speed mapping.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CurveError {
    #[error("curve needs at least two points, got {0}")]
    TooShort(usize),
    #[error("curve sequences differ in length ({joy} joystick points, {cam} camera points)")]
    LengthMismatch { joy: usize, cam: usize },
    #[error("curve points must be finite")]
    NotFinite,
    #[error("curve must map a centered stick to a stopped camera")]
    NonZeroOrigin,
    #[error("joystick breakpoints must stay within 0..=1")]
    OutOfRange,
    #[error("joystick breakpoints must be strictly increasing")]
    JoyNotIncreasing,
    #[error("camera speeds must be non-decreasing")]
    CamNotMonotonic,
}

/// Piecewise-linear response curve.
///
/// `joy` holds stick deflection breakpoints in `0..=1`, `cam` the
/// camera speed at each breakpoint. Between breakpoints the speed is
/// interpolated linearly, outside them it is clamped to the end
/// values. Negative deflections mirror through zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedCurve {
    joy: Vec<f32>,
    cam: Vec<f32>,
}

impl SpeedCurve {
    pub fn new(joy: Vec<f32>, cam: Vec<f32>) -> Result<Self, CurveError> {
        if joy.len() < 2 {
            return Err(CurveError::TooShort(joy.len()));
        }
        if joy.len() != cam.len() {
            return Err(CurveError::LengthMismatch { joy: joy.len(), cam: cam.len() });
        }
        if joy.iter().chain(cam.iter()).any(|point| !point.is_finite()) {
            return Err(CurveError::NotFinite);
        }
        if joy[0].abs() > 0.0 || cam[0].abs() > 0.0 {
            return Err(CurveError::NonZeroOrigin);
        }
        if joy.iter().any(|point| !(0.0..=1.0).contains(point)) {
            return Err(CurveError::OutOfRange);
        }
        if joy.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(CurveError::JoyNotIncreasing);
        }
        if cam.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err(CurveError::CamNotMonotonic);
        }
        Ok(Self { joy, cam })
    }

    /// Maps a normalized deflection to a signed integer speed.
    ///
    /// The magnitude runs through the curve and is rounded to the
    /// nearest step, the sign of the input is reapplied afterwards.
    #[must_use]
    pub fn apply(&self, value: f32) -> i32 {
        #[allow(clippy::cast_possible_truncation)]
        let speed = self.interp(value.abs()).round() as i32;
        if value < 0.0 {
            -speed
        } else {
            speed
        }
    }

    fn interp(&self, magnitude: f32) -> f32 {
        if magnitude <= self.joy[0] {
            return self.cam[0];
        }
        for segment in 1..self.joy.len() {
            if magnitude <= self.joy[segment] {
                let x0 = self.joy[segment - 1];
                let x1 = self.joy[segment];
                let y0 = self.cam[segment - 1];
                let y1 = self.cam[segment];
                return y0 + (y1 - y0) * (magnitude - x0) / (x1 - x0);
            }
        }
        self.cam.last().copied().unwrap_or(0.0)
    }
}
