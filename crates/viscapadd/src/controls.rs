//! Control behaviors and the binding table.
//!
//! Every physical control is bound to exactly one behavior from the
//! closed set below. Handlers mutate the shared [`ControlMode`] and
//! talk to the camera through the session; errors they cannot handle
//! themselves bubble up to the dispatcher.

use std::time::Duration;
use std::time::Instant;

use ahash::AHashMap;
use colored::Colorize;

use viscapad_camera::{ExposureMode, FocusDrive, FocusMode, Result, WhiteBalanceMode};

use crate::camera::{CameraConnector, CameraLink};
use crate::config::Config;
use crate::curve::SpeedCurve;
use crate::event::{AxisCode, ButtonCode, ControlId, LogicalEvent};
use crate::hold::{HoldTracker, ReleaseLatch};
use crate::session::CameraSession;
use crate::{print_debug, print_error, print_info, print_warning};

/// Which motion a movement control drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Pan,
    Tilt,
    Zoom,
}

/// Side of the focus chord a shoulder button contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusSide {
    Near,
    Far,
}

/// Shared control-surface state the handlers read and write.
#[derive(Debug)]
pub struct ControlMode {
    /// Pan speed re-asserted every tick.
    pub pan: i32,
    /// Tilt speed re-asserted every tick.
    pub tilt: i32,
    /// Freezes pan and suppresses tilt and zoom input.
    pub pan_lock: bool,
    /// Runtime tilt direction flip.
    pub invert_tilt: bool,
    /// Local mirror of the active camera's focus mode.
    pub focus_mode: FocusMode,
    pub near_held: bool,
    pub far_held: bool,
    /// Set by the exit control, checked by the dispatcher.
    pub exit: bool,
}

impl ControlMode {
    #[must_use]
    pub fn new(invert_tilt: bool) -> Self {
        Self {
            pan: 0,
            tilt: 0,
            pan_lock: false,
            invert_tilt,
            focus_mode: FocusMode::Auto,
            near_held: false,
            far_held: false,
            exit: false,
        }
    }

    /// Forgets which chord buttons are held.
    pub fn clear_held(&mut self) {
        self.near_held = false;
        self.far_held = false;
    }
}

/// Continuous axis driving pan, tilt or zoom speed.
#[derive(Debug)]
pub struct Movement {
    motion: Motion,
    invert: bool,
    curve: SpeedCurve,
    deadzone: f32,
}

impl Movement {
    #[must_use]
    pub fn new(motion: Motion, invert: bool, curve: SpeedCurve, deadzone: f32) -> Self {
        Self { motion, invert, curve, deadzone }
    }

    fn speed_for(&self, axis: AxisCode, raw: i32) -> i32 {
        let deflection = axis.normalized(raw);
        let input = if deflection.abs() < self.deadzone {
            0.0
        } else {
            deflection
        };
        let speed = self.curve.apply(input);
        if self.invert {
            -speed
        } else {
            speed
        }
    }

    fn apply<C: CameraConnector>(
        &self,
        event: &LogicalEvent,
        mode: &mut ControlMode,
        session: &mut CameraSession<C>,
    ) -> Result<()> {
        let LogicalEvent::Axis { axis, value } = *event else {
            return Ok(());
        };
        let speed = self.speed_for(axis, value);
        match self.motion {
            Motion::Pan => {
                if !mode.pan_lock {
                    mode.pan = speed;
                }
            }
            Motion::Tilt => {
                if !mode.pan_lock {
                    mode.tilt = if mode.invert_tilt { -speed } else { speed };
                }
            }
            Motion::Zoom => {
                if mode.pan_lock {
                    return Ok(());
                }
                if let Some(camera) = session.link() {
                    print_debug!("zoom speed {speed}");
                    camera.zoom(speed)?;
                }
            }
        }
        Ok(())
    }
}

/// One side of the focus chord.
///
/// Alone in manual mode the button nudges focus while held, pressed
/// together with the other side it toggles auto/manual focus.
#[derive(Debug)]
pub struct Focus {
    side: FocusSide,
    latch: ReleaseLatch,
}

impl Focus {
    #[must_use]
    pub fn new(side: FocusSide) -> Self {
        Self { side, latch: ReleaseLatch::default() }
    }

    fn apply<C: CameraConnector>(
        &mut self,
        event: &LogicalEvent,
        mode: &mut ControlMode,
        session: &mut CameraSession<C>,
    ) -> Result<()> {
        let LogicalEvent::Button { pressed, .. } = *event else {
            return Ok(());
        };
        match self.side {
            FocusSide::Near => mode.near_held = pressed,
            FocusSide::Far => mode.far_held = pressed,
        }
        if pressed && mode.near_held && mode.far_held {
            return self.toggle(mode, session);
        }
        if mode.focus_mode != FocusMode::Manual {
            return Ok(());
        }
        let Some(camera) = session.link() else {
            return Ok(());
        };
        if pressed {
            let drive = match self.side {
                FocusSide::Near => FocusDrive::Near,
                FocusSide::Far => FocusDrive::Far,
            };
            camera.manual_focus(drive)
        } else {
            if self.latch.consume() {
                return Ok(());
            }
            camera.manual_focus(FocusDrive::Stop)
        }
    }

    fn toggle<C: CameraConnector>(
        &mut self,
        mode: &mut ControlMode,
        session: &mut CameraSession<C>,
    ) -> Result<()> {
        let Some(camera) = session.link() else {
            return Ok(());
        };
        let target = mode.focus_mode.opposite();
        camera.set_focus_mode(target)?;
        mode.focus_mode = target;
        match target {
            FocusMode::Auto => {
                print_info!("focus: auto");
            }
            FocusMode::Manual => {
                // This button's release must not stop a drive that never started
                self.latch.arm();
                print_info!("focus: manual");
            }
        }
        Ok(())
    }
}

/// Switches the active camera on release.
#[derive(Debug)]
pub struct CameraSelect {
    index: usize,
}

impl CameraSelect {
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    fn apply<C: CameraConnector>(
        &self,
        event: &LogicalEvent,
        mode: &mut ControlMode,
        session: &mut CameraSession<C>,
    ) -> Result<()> {
        let LogicalEvent::Button { pressed, .. } = *event else {
            return Ok(());
        };
        if pressed {
            return Ok(());
        }
        if !session.has_camera(self.index) {
            print_warning!("no camera {} configured", self.index + 1);
            return Ok(());
        }
        let previous = session.active_index();
        match session.switch_to(self.index) {
            Ok(focus) => {
                mode.focus_mode = focus;
                Ok(())
            }
            Err(e) => {
                print_error!("camera {} did not answer: {e}", self.index + 1);
                let Some(previous) = previous else {
                    return Err(e);
                };
                print_info!("falling back to camera {}", previous + 1);
                let focus = session.switch_to(previous)?;
                mode.focus_mode = focus;
                Ok(())
            }
        }
    }
}

/// Hat direction bound to a pair of preset slots.
///
/// A short press recalls the slot, holding past the threshold saves
/// the current position into it instead.
#[derive(Debug)]
pub struct Preset {
    positive_slot: u8,
    negative_slot: Option<u8>,
    positive: HoldTracker,
    negative: HoldTracker,
    latch: ReleaseLatch,
}

impl Preset {
    #[must_use]
    pub fn new(positive_slot: u8, negative_slot: Option<u8>, threshold: Duration) -> Self {
        Self {
            positive_slot,
            negative_slot,
            positive: HoldTracker::new(threshold),
            negative: HoldTracker::new(threshold),
            latch: ReleaseLatch::default(),
        }
    }

    fn apply<C: CameraConnector>(
        &mut self,
        event: &LogicalEvent,
        session: &mut CameraSession<C>,
        now: Instant,
    ) -> Result<()> {
        let LogicalEvent::Axis { value, .. } = *event else {
            return Ok(());
        };
        match value {
            1 => self.positive.set(now),
            -1 => self.negative.set(now),
            0 => self.release(session, now),
            _ => {}
        }
        Ok(())
    }

    fn release<C: CameraConnector>(&mut self, session: &mut CameraSession<C>, now: Instant) {
        let positive_held = self.positive.is_set();
        let negative_held = self.negative.is_set();
        if !positive_held && !negative_held {
            // Stray center report
            return;
        }
        // The threshold may have been crossed since the last tick
        self.poll_save(session, now);
        self.positive.reset();
        self.negative.reset();
        if self.latch.consume() {
            return;
        }
        let slot = if negative_held {
            self.negative_slot
        } else {
            Some(self.positive_slot)
        };
        let Some(slot) = slot else {
            return;
        };
        let Some(camera) = session.link() else {
            return;
        };
        match camera.recall_preset(slot) {
            Ok(()) => {
                print_info!("preset {slot} recalled");
            }
            Err(e) => {
                print_error!("preset {slot} recall failed (is it saved?): {e}");
            }
        }
    }

    /// Saves once when a held direction crosses the threshold.
    ///
    /// Must run before the trackers are reset, both from the tick
    /// poll and from the release path.
    fn poll_save<C: CameraConnector>(&mut self, session: &mut CameraSession<C>, now: Instant) {
        if self.latch.is_armed() {
            return;
        }
        let slot = if self.positive.is_long_press(now) {
            Some(self.positive_slot)
        } else if self.negative.is_long_press(now) {
            self.negative_slot
        } else {
            None
        };
        let Some(slot) = slot else {
            return;
        };
        let Some(camera) = session.link() else {
            return;
        };
        match camera.save_preset(slot) {
            Ok(()) => {
                print_info!("preset {slot} saved");
            }
            Err(e) => {
                print_error!("preset {slot} save failed: {e}");
            }
        }
        self.latch.arm();
    }
}

/// One bound control behavior.
#[derive(Debug)]
pub enum Control {
    Movement(Movement),
    Focus(Focus),
    CameraSelect(CameraSelect),
    Preset(Preset),
    PanLock,
    InvertTilt,
    OnePushFocus,
    ManualExposure,
    Exit,
}

impl Control {
    /// Feeds one event to the control.
    pub fn apply<C: CameraConnector>(
        &mut self,
        event: &LogicalEvent,
        mode: &mut ControlMode,
        session: &mut CameraSession<C>,
        now: Instant,
    ) -> Result<()> {
        match self {
            Self::Movement(movement) => movement.apply(event, mode, session),
            Self::Focus(focus) => focus.apply(event, mode, session),
            Self::CameraSelect(select) => select.apply(event, mode, session),
            Self::Preset(preset) => preset.apply(event, session, now),
            Self::PanLock => pan_lock(event, mode, session),
            Self::InvertTilt => invert_tilt(event, mode),
            Self::OnePushFocus => one_push_focus(event, session),
            Self::ManualExposure => manual_exposure(event, session),
            Self::Exit => exit_control(event, mode),
        }
    }

    /// Gives time-based controls a chance to act between events.
    pub fn on_tick<C: CameraConnector>(&mut self, session: &mut CameraSession<C>, now: Instant) {
        if let Self::Preset(preset) = self {
            preset.poll_save(session, now);
        }
    }

    /// Drops held-state that a controller swap made stale.
    pub fn clear_transients(&mut self) {
        match self {
            Self::Focus(focus) => {
                let _ = focus.latch.consume();
            }
            Self::Preset(preset) => {
                preset.positive.reset();
                preset.negative.reset();
                let _ = preset.latch.consume();
            }
            _ => {}
        }
    }
}

fn pan_lock<C: CameraConnector>(
    event: &LogicalEvent,
    mode: &mut ControlMode,
    session: &mut CameraSession<C>,
) -> Result<()> {
    let LogicalEvent::Button { pressed, .. } = *event else {
        return Ok(());
    };
    if pressed {
        mode.pan_lock = true;
        mode.tilt = 0;
        print_info!("pan lock on, pan speed {} held", mode.pan);
        if let Some(camera) = session.link() {
            camera.zoom(0)?;
        }
    } else {
        mode.pan_lock = false;
        mode.pan = 0;
        print_info!("pan lock off");
    }
    Ok(())
}

fn invert_tilt(event: &LogicalEvent, mode: &mut ControlMode) -> Result<()> {
    let LogicalEvent::Button { pressed, .. } = *event else {
        return Ok(());
    };
    if !pressed {
        mode.invert_tilt = !mode.invert_tilt;
        print_info!(
            "tilt inversion {}",
            if mode.invert_tilt { "on" } else { "off" }
        );
    }
    Ok(())
}

fn one_push_focus<C: CameraConnector>(
    event: &LogicalEvent,
    session: &mut CameraSession<C>,
) -> Result<()> {
    let LogicalEvent::Button { pressed, .. } = *event else {
        return Ok(());
    };
    if pressed {
        return Ok(());
    }
    let Some(camera) = session.link() else {
        return Ok(());
    };
    print_info!("one-push focus");
    camera.one_push_focus()
}

fn manual_exposure<C: CameraConnector>(
    event: &LogicalEvent,
    session: &mut CameraSession<C>,
) -> Result<()> {
    let LogicalEvent::Button { pressed, .. } = *event else {
        return Ok(());
    };
    if pressed {
        return Ok(());
    }
    let Some(camera) = session.link() else {
        return Ok(());
    };
    camera.set_exposure_mode(ExposureMode::Manual)?;
    camera.set_white_balance(WhiteBalanceMode::Manual)?;
    print_info!("exposure and white balance set to manual");
    Ok(())
}

fn exit_control(event: &LogicalEvent, mode: &mut ControlMode) -> Result<()> {
    let LogicalEvent::Button { pressed, .. } = *event else {
        return Ok(());
    };
    if !pressed {
        mode.exit = true;
        print_info!("exit requested");
    }
    Ok(())
}

/// The built-in control layout.
#[must_use]
pub fn default_bindings(config: &Config) -> AHashMap<ControlId, Control> {
    let mut bindings = AHashMap::new();
    bindings.insert(
        ControlId::Axis(AxisCode::LeftX),
        Control::Movement(Movement::new(
            Motion::Pan,
            true,
            config.pan_curve.clone(),
            config.deadzone,
        )),
    );
    bindings.insert(
        ControlId::Axis(AxisCode::RightX),
        Control::Movement(Movement::new(
            Motion::Pan,
            true,
            config.pan_curve.clone(),
            config.deadzone,
        )),
    );
    bindings.insert(
        ControlId::Axis(AxisCode::LeftY),
        Control::Movement(Movement::new(
            Motion::Tilt,
            false,
            config.tilt_curve.clone(),
            config.deadzone,
        )),
    );
    bindings.insert(
        ControlId::Axis(AxisCode::LeftTrigger),
        Control::Movement(Movement::new(
            Motion::Zoom,
            true,
            config.zoom_curve.clone(),
            config.deadzone,
        )),
    );
    bindings.insert(
        ControlId::Axis(AxisCode::RightTrigger),
        Control::Movement(Movement::new(
            Motion::Zoom,
            false,
            config.zoom_curve.clone(),
            config.deadzone,
        )),
    );
    bindings.insert(
        ControlId::Button(ButtonCode::LeftShoulder),
        Control::Focus(Focus::new(FocusSide::Near)),
    );
    bindings.insert(
        ControlId::Button(ButtonCode::RightShoulder),
        Control::Focus(Focus::new(FocusSide::Far)),
    );
    bindings.insert(
        ControlId::Button(ButtonCode::A),
        Control::CameraSelect(CameraSelect::new(0)),
    );
    bindings.insert(
        ControlId::Button(ButtonCode::B),
        Control::CameraSelect(CameraSelect::new(1)),
    );
    bindings.insert(
        ControlId::Button(ButtonCode::Y),
        Control::CameraSelect(CameraSelect::new(2)),
    );
    bindings.insert(ControlId::Button(ButtonCode::X), Control::OnePushFocus);
    bindings.insert(
        ControlId::Axis(AxisCode::HatX),
        Control::Preset(Preset::new(2, Some(0), config.long_press)),
    );
    bindings.insert(
        ControlId::Axis(AxisCode::HatY),
        Control::Preset(Preset::new(3, Some(1), config.long_press)),
    );
    bindings.insert(ControlId::Button(ButtonCode::Back), Control::PanLock);
    bindings.insert(ControlId::Button(ButtonCode::Start), Control::ManualExposure);
    bindings.insert(ControlId::Button(ButtonCode::LeftStick), Control::InvertTilt);
    bindings.insert(ControlId::Button(ButtonCode::Guide), Control::Exit);
    bindings
}
