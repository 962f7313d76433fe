use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use crossbeam_channel::unbounded;

use viscapad_camera::Camera;
use viscapadd::axis::AxisCache;
use viscapadd::camera::ViscaConnector;
use viscapadd::cli::{Cli, Command, PowerState};
use viscapadd::config::Config;
use viscapadd::controls::{default_bindings, ControlMode};
use viscapadd::dispatch::Dispatcher;
use viscapadd::logging;
use viscapadd::session::CameraSession;
use viscapadd::source::EventSource;
use viscapadd::{print_error, print_info, print_warning};

/// Slot recalled after power-on so cameras return to a known shot.
const HOME_PRESET: u8 = 8;
/// Cameras need a while after power-on before they accept commands.
const BOOT_WAIT: Duration = Duration::from_secs(20);

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::setup(cli.verbose, cli.no_color);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            print_error!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Command::Run => run(&config),
        Command::Configure => configure(&config),
        Command::Power { state } => power(&config, state == PowerState::On),
    }
}

fn run(config: &Config) -> ExitCode {
    // Handle Ctrl+C to exit cleanly
    let (stop_tx, stop_rx) = unbounded::<()>();
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(());
    })
    .expect("failed to set Ctrl+C handler");

    let cache = Arc::new(AxisCache::default());
    let (event_tx, event_rx) = unbounded();
    let source = EventSource::new(Arc::clone(&cache), event_tx, config.reconnect_poll);
    if let Err(e) = source.spawn() {
        print_error!("failed to start the input thread: {e}");
        return ExitCode::FAILURE;
    }

    let connector = ViscaConnector::new(config.port, config.command_timeout);
    let mut session = CameraSession::new(connector, config.cameras.clone());
    let focus = match session.connect_initial() {
        Ok(focus) => focus,
        Err(e) => {
            print_error!("could not connect to any camera: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut mode = ControlMode::new(config.invert_tilt);
    mode.focus_mode = focus;
    let dispatcher = Dispatcher::new(
        event_rx,
        stop_rx,
        cache,
        default_bindings(config),
        mode,
        session,
        config.tick,
    );

    print_info!("viscapadd started. Listening for controller events.");
    let mut session = dispatcher.run();
    session.shutdown();
    print_info!("stopped");
    ExitCode::SUCCESS
}

fn configure(config: &Config) -> ExitCode {
    if power_all(config, true) == config.cameras.len() {
        return ExitCode::FAILURE;
    }
    print_info!("waiting {}s for the cameras to boot", BOOT_WAIT.as_secs());
    thread::sleep(BOOT_WAIT);

    let mut failures = 0;
    for (index, host) in config.cameras.iter().enumerate() {
        match Camera::connect(host, config.port, config.command_timeout) {
            Ok(mut camera) => {
                match camera.recall_preset(HOME_PRESET) {
                    Ok(()) => {
                        print_info!("camera {} moved to its home shot", index + 1);
                    }
                    Err(e) => {
                        print_warning!("camera {} home recall failed: {e}", index + 1);
                        failures += 1;
                    }
                }
                camera.disconnect();
            }
            Err(e) => {
                print_warning!("camera {} unreachable: {e}", index + 1);
                failures += 1;
            }
        }
    }
    if failures == config.cameras.len() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn power(config: &Config, on: bool) -> ExitCode {
    if power_all(config, on) == config.cameras.len() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Sends the power command to every configured camera.
///
/// Returns how many cameras could not be reached or refused.
fn power_all(config: &Config, on: bool) -> usize {
    let state = if on { "on" } else { "off" };
    let mut failures = 0;
    for (index, host) in config.cameras.iter().enumerate() {
        match Camera::connect(host, config.port, config.command_timeout) {
            Ok(mut camera) => {
                match camera.set_power(on) {
                    Ok(()) => {
                        print_info!("camera {} powered {state}", index + 1);
                    }
                    Err(e) => {
                        print_warning!("camera {} power command failed: {e}", index + 1);
                        failures += 1;
                    }
                }
                camera.disconnect();
            }
            Err(e) => {
                print_warning!("camera {} unreachable: {e}", index + 1);
                failures += 1;
            }
        }
    }
    failures
}
