//! Device thread: normalizes controller samples into logical events.
//!
//! Continuous axis samples go into the shared cache where only the
//! latest value survives, discrete edges are queued so none is lost.
//! The thread also owns the reconnect loop, the dispatcher just
//! learns about a swap through [`LogicalEvent::Reconnected`].

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use colored::Colorize;
use crossbeam_channel::Sender;

use viscapad_gamepad::{Axis, Button, Gamepad, GamepadError, RawSample};

use crate::axis::AxisCache;
use crate::event::{AxisCode, ButtonCode, LogicalEvent};
use crate::{print_error, print_info, print_warning};

const PUMP_WAIT: Duration = Duration::from_millis(10);

/// Producer half of the event pipeline.
pub struct EventSource {
    cache: Arc<AxisCache>,
    events: Sender<LogicalEvent>,
    reconnect_poll: Duration,
}

enum ButtonClass {
    Plain(ButtonCode),
    Hat { axis: AxisCode, direction: i32 },
}

impl EventSource {
    #[must_use]
    pub fn new(cache: Arc<AxisCache>, events: Sender<LogicalEvent>, reconnect_poll: Duration) -> Self {
        Self { cache, events, reconnect_poll }
    }

    /// Spawns the device thread.
    ///
    /// The backend objects are created inside the thread and never
    /// leave it. The thread ends when the event channel closes or the
    /// backend fails to come up.
    pub fn spawn(self) -> std::io::Result<thread::JoinHandle<()>> {
        thread::Builder::new()
            .name("viscapadd-input".into())
            .spawn(move || self.run())
    }

    fn run(self) {
        let mut pad = match Gamepad::new() {
            Ok(pad) => pad,
            Err(e) => {
                print_error!("controller backend failed: {e}");
                return;
            }
        };

        if !pad.is_connected() {
            print_info!("waiting for a controller");
            self.poll_until_connected(&mut pad);
        }
        print_info!("controller connected: {}", pad.name().unwrap_or_default());

        loop {
            match pad.pump(PUMP_WAIT) {
                Ok(batch) => {
                    for sample in batch {
                        if !self.ingest(sample) {
                            return;
                        }
                    }
                }
                Err(GamepadError::Disconnected) => {
                    print_warning!("controller disconnected, waiting for it to return");
                    self.poll_until_connected(&mut pad);
                    print_info!("controller connected: {}", pad.name().unwrap_or_default());
                    if self.events.send(LogicalEvent::Reconnected).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    print_error!("controller backend failed: {e}");
                    return;
                }
            }
        }
    }

    fn poll_until_connected(&self, pad: &mut Gamepad) {
        while !pad.try_connect() {
            thread::sleep(self.reconnect_poll);
        }
    }

    /// Routes one raw sample. Returns `false` when the consumer side
    /// of the channel is gone.
    fn ingest(&self, sample: RawSample) -> bool {
        match sample {
            RawSample::Axis { axis, value } => {
                self.cache.set(cache_code(axis), i32::from(value));
                true
            }
            RawSample::Button { button, pressed } => match classify_button(button) {
                ButtonClass::Hat { axis, direction } => {
                    let value = if pressed { direction } else { 0 };
                    self.events.send(LogicalEvent::Axis { axis, value }).is_ok()
                }
                ButtonClass::Plain(button) => self
                    .events
                    .send(LogicalEvent::Button { button, pressed })
                    .is_ok(),
            },
        }
    }
}

fn cache_code(axis: Axis) -> AxisCode {
    match axis {
        Axis::LeftX => AxisCode::LeftX,
        Axis::LeftY => AxisCode::LeftY,
        Axis::RightX => AxisCode::RightX,
        Axis::RightY => AxisCode::RightY,
        Axis::LeftTrigger => AxisCode::LeftTrigger,
        Axis::RightTrigger => AxisCode::RightTrigger,
    }
}

/// D-pad buttons become hat axis reports, everything else maps 1:1.
fn classify_button(button: Button) -> ButtonClass {
    match button {
        Button::DPadLeft => ButtonClass::Hat { axis: AxisCode::HatX, direction: -1 },
        Button::DPadRight => ButtonClass::Hat { axis: AxisCode::HatX, direction: 1 },
        Button::DPadUp => ButtonClass::Hat { axis: AxisCode::HatY, direction: -1 },
        Button::DPadDown => ButtonClass::Hat { axis: AxisCode::HatY, direction: 1 },
        Button::A => ButtonClass::Plain(ButtonCode::A),
        Button::B => ButtonClass::Plain(ButtonCode::B),
        Button::X => ButtonClass::Plain(ButtonCode::X),
        Button::Y => ButtonClass::Plain(ButtonCode::Y),
        Button::Back => ButtonClass::Plain(ButtonCode::Back),
        Button::Start => ButtonClass::Plain(ButtonCode::Start),
        Button::Guide => ButtonClass::Plain(ButtonCode::Guide),
        Button::LeftStick => ButtonClass::Plain(ButtonCode::LeftStick),
        Button::RightStick => ButtonClass::Plain(ButtonCode::RightStick),
        Button::LeftShoulder => ButtonClass::Plain(ButtonCode::LeftShoulder),
        Button::RightShoulder => ButtonClass::Plain(ButtonCode::RightShoulder),
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::unbounded;

    use super::*;

    fn source() -> (EventSource, Arc<AxisCache>, crossbeam_channel::Receiver<LogicalEvent>) {
        let cache = Arc::new(AxisCache::default());
        let (tx, rx) = unbounded();
        let source = EventSource::new(Arc::clone(&cache), tx, Duration::from_millis(1));
        (source, cache, rx)
    }

    #[test]
    fn axis_samples_land_in_the_cache() {
        let (source, cache, rx) = source();
        assert!(source.ingest(RawSample::Axis { axis: Axis::LeftX, value: -20000 }));
        assert_eq!(cache.take_if_changed(AxisCode::LeftX), Some(-20000));
        assert!(rx.try_recv().is_err(), "axis samples are not queued");
    }

    #[test]
    fn button_edges_are_queued_in_order() {
        let (source, _cache, rx) = source();
        assert!(source.ingest(RawSample::Button { button: Button::A, pressed: true }));
        assert!(source.ingest(RawSample::Button { button: Button::A, pressed: false }));
        assert_eq!(
            rx.try_recv(),
            Ok(LogicalEvent::Button { button: ButtonCode::A, pressed: true })
        );
        assert_eq!(
            rx.try_recv(),
            Ok(LogicalEvent::Button { button: ButtonCode::A, pressed: false })
        );
    }

    #[test]
    fn dpad_synthesizes_hat_axis_reports() {
        let (source, _cache, rx) = source();
        assert!(source.ingest(RawSample::Button { button: Button::DPadRight, pressed: true }));
        assert!(source.ingest(RawSample::Button { button: Button::DPadRight, pressed: false }));
        assert!(source.ingest(RawSample::Button { button: Button::DPadUp, pressed: true }));
        assert_eq!(
            rx.try_recv(),
            Ok(LogicalEvent::Axis { axis: AxisCode::HatX, value: 1 })
        );
        assert_eq!(
            rx.try_recv(),
            Ok(LogicalEvent::Axis { axis: AxisCode::HatX, value: 0 })
        );
        assert_eq!(
            rx.try_recv(),
            Ok(LogicalEvent::Axis { axis: AxisCode::HatY, value: -1 })
        );
    }

    #[test]
    fn closed_channel_stops_ingestion() {
        let (source, _cache, rx) = source();
        drop(rx);
        assert!(!source.ingest(RawSample::Button { button: Button::B, pressed: true }));
    }

    #[test]
    fn trigger_samples_use_their_own_slots() {
        let (source, cache, _rx) = source();
        assert!(source.ingest(RawSample::Axis { axis: Axis::LeftTrigger, value: 32767 }));
        assert!(source.ingest(RawSample::Axis { axis: Axis::RightTrigger, value: 100 }));
        assert_eq!(cache.take_if_changed(AxisCode::LeftTrigger), Some(32767));
        assert_eq!(cache.take_if_changed(AxisCode::RightTrigger), Some(100));
    }
}
