use crate::app::DEFAULT_ZOOM;
use crate::config::Backend;
use crate::types::{Coords, WorkoutKind};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mapty",
    version,
    about = "Record running and cycling workouts on a map"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Cmd>,

    /// Directory holding persisted workouts.
    ///
    /// Default: the platform data dir, e.g. ~/.local/share/mapty
    #[arg(long, env = "MAPTY_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Key-value backend for persisted workouts.
    #[arg(long, value_enum, env = "MAPTY_BACKEND", default_value_t = Backend::Json, global = true)]
    pub backend: Backend,

    /// Current position as LAT,LNG. Without it the map stays unavailable.
    #[arg(long, env = "MAPTY_HOME", allow_hyphen_values = true, global = true)]
    pub home: Option<Coords>,

    /// Map zoom level.
    #[arg(long, default_value_t = DEFAULT_ZOOM, global = true)]
    pub zoom: u8,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Print one line per workout, newest first (default).
    List,

    /// Click the map at a position and submit the form.
    Add {
        /// Position as LAT,LNG.
        #[arg(long, allow_hyphen_values = true)]
        at: Coords,

        #[arg(long = "type", default_value = "running")]
        kind: WorkoutKind,

        /// km
        #[arg(long)]
        distance: String,

        /// minutes
        #[arg(long)]
        duration: String,

        /// steps/min (running)
        #[arg(long)]
        cadence: Option<String>,

        /// meters (cycling)
        #[arg(long)]
        elevation: Option<String>,
    },

    /// Open a workout in the form, override fields and submit.
    Edit {
        id: String,

        #[arg(long = "type")]
        kind: Option<WorkoutKind>,

        #[arg(long)]
        distance: Option<String>,

        #[arg(long)]
        duration: Option<String>,

        #[arg(long)]
        cadence: Option<String>,

        #[arg(long)]
        elevation: Option<String>,
    },

    /// Delete a workout.
    Delete { id: String },

    /// Print the rendered list entry of a workout.
    Show { id: String },

    /// Forget every workout.
    Reset,
}
