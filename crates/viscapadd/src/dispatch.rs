//! The control loop.
//!
//! One tick roughly every 30ms: drain queued edges, apply the newest
//! axis values, give long-press controls a chance to fire, then
//! re-assert pan and tilt on the active camera. The re-assert doubles
//! as a keep-alive, cameras stop a drive that is not refreshed.

use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use ahash::AHashMap;
use colored::Colorize;
use crossbeam_channel::{select, tick, Receiver};

use crate::axis::AxisCache;
use crate::camera::CameraConnector;
use crate::controls::{Control, ControlMode};
use crate::event::{AxisCode, ControlId, LogicalEvent};
use crate::session::CameraSession;
use crate::{print_debug, print_error, print_warning};

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Consumer half of the event pipeline.
pub struct Dispatcher<C: CameraConnector> {
    events: Receiver<LogicalEvent>,
    stop: Receiver<()>,
    cache: Arc<AxisCache>,
    bindings: AHashMap<ControlId, Control>,
    mode: ControlMode,
    session: CameraSession<C>,
    tick: Duration,
}

impl<C: CameraConnector> Dispatcher<C> {
    pub fn new(
        events: Receiver<LogicalEvent>,
        stop: Receiver<()>,
        cache: Arc<AxisCache>,
        bindings: AHashMap<ControlId, Control>,
        mode: ControlMode,
        session: CameraSession<C>,
        tick: Duration,
    ) -> Self {
        Self { events, stop, cache, bindings, mode, session, tick }
    }

    /// Runs until a stop signal arrives or the exit control fires.
    ///
    /// Returns the session so the caller can stop the camera and
    /// close the connection.
    pub fn run(mut self) -> CameraSession<C> {
        let stop = self.stop.clone();
        let ticker = tick(self.tick);
        loop {
            select! {
                recv(stop) -> _ => break,
                recv(ticker) -> _ => {
                    if self.run_tick(Instant::now()) == Flow::Exit {
                        break;
                    }
                }
            }
        }
        self.session
    }

    fn run_tick(&mut self, now: Instant) -> Flow {
        while let Ok(event) = self.events.try_recv() {
            self.deliver(&event, now);
            if self.mode.exit {
                return Flow::Exit;
            }
        }

        for axis in AxisCode::CACHED {
            let Some(value) = self.cache.take_if_changed(axis) else {
                continue;
            };
            // Unbound axes are drained quietly
            let Some(control) = self.bindings.get_mut(&ControlId::Axis(axis)) else {
                continue;
            };
            let event = LogicalEvent::Axis { axis, value };
            if let Err(e) = control.apply(&event, &mut self.mode, &mut self.session, now) {
                print_error!("control failure: {e}");
            }
        }

        for control in self.bindings.values_mut() {
            control.on_tick(&mut self.session, now);
        }

        if let Err(e) = self.session.drive(self.mode.pan, self.mode.tilt) {
            print_error!("pan-tilt control failure: {e}");
        }
        Flow::Continue
    }

    fn deliver(&mut self, event: &LogicalEvent, now: Instant) {
        let Some(id) = event.control_id() else {
            // Controller swap: held buttons never get their release edges
            print_debug!("clearing held state after controller swap");
            self.mode.clear_held();
            for control in self.bindings.values_mut() {
                control.clear_transients();
            }
            return;
        };
        let Some(control) = self.bindings.get_mut(&id) else {
            print_warning!("unmapped control: {id:?}");
            return;
        };
        if let Err(e) = control.apply(event, &mut self.mode, &mut self.session, now) {
            print_error!("control failure: {e}");
        }
    }
}
