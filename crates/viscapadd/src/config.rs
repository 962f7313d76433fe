//! Daemon configuration.
//!
//! Everything has a default tuned for the original camera rig, so the
//! daemon runs without any file at all. A YAML file can override any
//! subset of the settings.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::curve::{CurveError, SpeedCurve};

const DEFAULT_PATH: &str = "viscapad.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{axis} curve: {source}")]
    Curve {
        axis: &'static str,
        source: CurveError,
    },
    #[error("camera list is empty")]
    NoCameras,
    #[error("deadzone must be within 0..1, got {0}")]
    BadDeadzone(f32),
    #[error("invalid long press threshold: {0}s")]
    BadLongPress(f32),
    #[error("tick period must not be zero")]
    ZeroTick,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCurve {
    joy: Vec<f32>,
    cam: Vec<f32>,
}

impl RawCurve {
    fn pan() -> Self {
        Self {
            joy: vec![0.0, 0.05, 0.3, 0.7, 0.9, 1.0],
            cam: vec![0.0, 0.0, 2.0, 8.0, 15.0, 20.0],
        }
    }

    fn tilt() -> Self {
        Self {
            joy: vec![0.0, 0.07, 0.3, 0.65, 0.85, 1.0],
            cam: vec![0.0, 0.0, 3.0, 6.0, 14.0, 18.0],
        }
    }

    fn zoom() -> Self {
        Self {
            joy: vec![0.0, 0.1, 1.0],
            cam: vec![0.0, 0.0, 7.0],
        }
    }

    fn build(self, axis: &'static str) -> Result<SpeedCurve, ConfigError> {
        SpeedCurve::new(self.joy, self.cam).map_err(|source| ConfigError::Curve { axis, source })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
struct RawCurves {
    pan: RawCurve,
    tilt: RawCurve,
    zoom: RawCurve,
}

impl Default for RawCurves {
    fn default() -> Self {
        Self {
            pan: RawCurve::pan(),
            tilt: RawCurve::tilt(),
            zoom: RawCurve::zoom(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
struct RawConfig {
    cameras: Vec<String>, // tried in order at startup
    port: u16,
    deadzone: f32,
    long_press_secs: f32,
    tick_ms: u64,
    reconnect_poll_ms: u64,
    command_timeout_ms: u64,
    invert_tilt: bool,
    curves: RawCurves,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            cameras: vec![
                "192.168.3.241".to_string(),
                "192.168.3.242".to_string(),
                "192.168.3.243".to_string(),
            ],
            port: 52381,
            deadzone: 0.1,
            long_press_secs: 2.0,
            tick_ms: 30,
            reconnect_poll_ms: 500,
            command_timeout_ms: 200,
            invert_tilt: true,
            curves: RawCurves::default(),
        }
    }
}

impl RawConfig {
    fn into_config(self) -> Result<Config, ConfigError> {
        if self.cameras.is_empty() {
            return Err(ConfigError::NoCameras);
        }
        if !(0.0..1.0).contains(&self.deadzone) {
            return Err(ConfigError::BadDeadzone(self.deadzone));
        }
        let long_press = Duration::try_from_secs_f32(self.long_press_secs)
            .map_err(|_| ConfigError::BadLongPress(self.long_press_secs))?;
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }
        Ok(Config {
            cameras: self.cameras,
            port: self.port,
            deadzone: self.deadzone,
            long_press,
            tick: Duration::from_millis(self.tick_ms),
            reconnect_poll: Duration::from_millis(self.reconnect_poll_ms),
            command_timeout: Duration::from_millis(self.command_timeout_ms),
            invert_tilt: self.invert_tilt,
            pan_curve: self.curves.pan.build("pan")?,
            tilt_curve: self.curves.tilt.build("tilt")?,
            zoom_curve: self.curves.zoom.build("zoom")?,
        })
    }
}

/// Validated daemon settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub cameras: Vec<String>,
    pub port: u16,
    pub deadzone: f32,
    pub long_press: Duration,
    pub tick: Duration,
    pub reconnect_poll: Duration,
    pub command_timeout: Duration,
    pub invert_tilt: bool,
    pub pan_curve: SpeedCurve,
    pub tilt_curve: SpeedCurve,
    pub zoom_curve: SpeedCurve,
}

impl Config {
    /// Reads the configuration file.
    ///
    /// Without an explicit path the default location is tried, and
    /// when no file exists there the built-in defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => parse_config(&fs::read_to_string(path)?),
            None => {
                let fallback = Path::new(DEFAULT_PATH);
                if fallback.exists() {
                    parse_config(&fs::read_to_string(fallback)?)
                } else {
                    RawConfig::default().into_config()
                }
            }
        }
    }
}

/// Parse yaml configuration.
pub fn parse_config(input: &str) -> Result<Config, ConfigError> {
    if input.trim().is_empty() {
        return RawConfig::default().into_config();
    }
    let raw: RawConfig = serde_yaml::from_str(input)?;
    raw.into_config()
}
