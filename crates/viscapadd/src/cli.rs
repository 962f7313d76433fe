use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PowerState {
    On,
    Off,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum Command {
    /// Run the control loop in the foreground.
    Run,
    /// Power on every configured camera and recall its home preset.
    Configure,
    /// Switch every configured camera on or off.
    Power {
        /// The power state to apply
        #[clap(value_enum)]
        state: PowerState,
    },
}

/// Drive VISCA-over-IP PTZ cameras with a gamepad.
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Turn debugging information on
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// The command to run
    #[clap(subcommand)]
    pub command: Command,
}
