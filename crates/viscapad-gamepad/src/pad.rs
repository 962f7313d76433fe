use std::time::Duration;

use sdl2::controller::{Axis as SdlAxis, Button as SdlButton, GameController};
use sdl2::event::Event;
use sdl2::EventPump;
use sdl2::Sdl;
use sdl2::{GameControllerSubsystem, JoystickSubsystem};

use crate::types::{Axis, Button, RawSample, SampleBatch};
use crate::{GamepadError, Result};

/// SDL2-backed handle over the first attached game controller.
///
/// SDL objects are not `Send`; construct and use a `Gamepad` entirely within
/// one thread.
pub struct Gamepad {
    _sdl: Sdl,
    controller_subsystem: GameControllerSubsystem,
    joystick_subsystem: JoystickSubsystem,
    event_pump: EventPump,
    active: Option<GameController>,
}

impl Gamepad {
    /// Initializes SDL and opens the first game controller, if any is
    /// already attached.
    pub fn new() -> Result<Self> {
        let sdl = sdl2::init().map_err(GamepadError::Init)?;
        let controller_subsystem =
            sdl.game_controller().map_err(GamepadError::Init)?;
        let joystick_subsystem = sdl.joystick().map_err(GamepadError::Init)?;
        let event_pump = sdl.event_pump().map_err(GamepadError::Init)?;

        let mut pad = Self {
            _sdl: sdl,
            controller_subsystem,
            joystick_subsystem,
            event_pump,
            active: None,
        };
        pad.try_connect();
        Ok(pad)
    }

    pub fn is_connected(&self) -> bool {
        self.active.is_some()
    }

    /// Name of the active controller.
    pub fn name(&self) -> Option<String> {
        self.active.as_ref().map(GameController::name)
    }

    /// Scans for an attached game controller and opens the first one found.
    /// Returns whether a controller is open afterwards.
    pub fn try_connect(&mut self) -> bool {
        if self.active.is_some() {
            return true;
        }
        // Hotplug detection needs the event queue pumped
        self.event_pump.pump_events();
        let Ok(num_joysticks) = self.joystick_subsystem.num_joysticks() else {
            return false;
        };
        for index in 0..num_joysticks {
            if !self.controller_subsystem.is_game_controller(index) {
                continue;
            }
            if let Ok(controller) = self.controller_subsystem.open(index) {
                self.active = Some(controller);
                return true;
            }
        }
        false
    }

    /// Waits up to `wait` for the first backend event, then drains the rest
    /// without blocking. Samples from devices other than the active
    /// controller, and event types outside the sample model, are discarded.
    ///
    /// Fails with [`GamepadError::Disconnected`] once the active controller
    /// is removed; the batch gathered in that pass is dropped.
    pub fn pump(&mut self, wait: Duration) -> Result<SampleBatch> {
        if self.active.is_none() {
            return Err(GamepadError::Disconnected);
        }
        let mut batch = SampleBatch::new();
        let timeout = u32::try_from(wait.as_millis()).unwrap_or(u32::MAX).max(1);
        if let Some(event) = self.event_pump.wait_event_timeout(timeout) {
            self.ingest(&event, &mut batch);
            // Drain any additional queued events quickly
            while let Some(event) = self.event_pump.poll_event() {
                self.ingest(&event, &mut batch);
            }
        }
        if self.active.is_none() {
            return Err(GamepadError::Disconnected);
        }
        Ok(batch)
    }

    fn ingest(&mut self, event: &Event, batch: &mut SampleBatch) {
        let active_id = match &self.active {
            Some(controller) => controller.instance_id(),
            None => return,
        };
        match *event {
            Event::ControllerDeviceRemoved { which, .. } => {
                if which == active_id {
                    self.active = None;
                }
            }
            Event::ControllerAxisMotion {
                which, axis, value, ..
            } => {
                if which == active_id {
                    if let Some(axis) = map_sdl_axis(axis) {
                        batch.push(RawSample::Axis { axis, value });
                    }
                }
            }
            Event::ControllerButtonDown { which, button, .. } => {
                if which == active_id {
                    if let Some(button) = map_sdl_button(button) {
                        batch.push(RawSample::Button {
                            button,
                            pressed: true,
                        });
                    }
                }
            }
            Event::ControllerButtonUp { which, button, .. } => {
                if which == active_id {
                    if let Some(button) = map_sdl_button(button) {
                        batch.push(RawSample::Button {
                            button,
                            pressed: false,
                        });
                    }
                }
            }
            _ => {}
        }
    }
}

fn map_sdl_button(button: SdlButton) -> Option<Button> {
    Some(match button {
        SdlButton::A => Button::A,
        SdlButton::B => Button::B,
        SdlButton::X => Button::X,
        SdlButton::Y => Button::Y,
        SdlButton::Back => Button::Back,
        SdlButton::Guide => Button::Guide,
        SdlButton::Start => Button::Start,
        SdlButton::LeftStick => Button::LeftStick,
        SdlButton::RightStick => Button::RightStick,
        SdlButton::LeftShoulder => Button::LeftShoulder,
        SdlButton::RightShoulder => Button::RightShoulder,
        SdlButton::DPadUp => Button::DPadUp,
        SdlButton::DPadDown => Button::DPadDown,
        SdlButton::DPadLeft => Button::DPadLeft,
        SdlButton::DPadRight => Button::DPadRight,
        _ => return None,
    })
}

fn map_sdl_axis(axis: SdlAxis) -> Option<Axis> {
    Some(match axis {
        SdlAxis::LeftX => Axis::LeftX,
        SdlAxis::LeftY => Axis::LeftY,
        SdlAxis::RightX => Axis::RightX,
        SdlAxis::RightY => Axis::RightY,
        SdlAxis::TriggerLeft => Axis::LeftTrigger,
        SdlAxis::TriggerRight => Axis::RightTrigger,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_sdl_axis() {
        let axes = [
            (SdlAxis::LeftX, Axis::LeftX),
            (SdlAxis::LeftY, Axis::LeftY),
            (SdlAxis::RightX, Axis::RightX),
            (SdlAxis::RightY, Axis::RightY),
            (SdlAxis::TriggerLeft, Axis::LeftTrigger),
            (SdlAxis::TriggerRight, Axis::RightTrigger),
        ];
        for (sdl, expected) in axes {
            assert_eq!(map_sdl_axis(sdl), Some(expected));
        }
    }

    #[test]
    fn ignores_unsupported_buttons() {
        assert_eq!(map_sdl_button(SdlButton::Touchpad), None);
        assert_eq!(map_sdl_button(SdlButton::A), Some(Button::A));
        assert_eq!(map_sdl_button(SdlButton::DPadLeft), Some(Button::DPadLeft));
    }
}
