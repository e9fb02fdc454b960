#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::Result;
use clap::Parser;
use mapty::app::{App, ListAction, SubmitOutcome};
use mapty::cli::{self, Cmd};
use mapty::config::AppConfig;
use mapty::error::WorkoutError;
use mapty::map::{FixedLocation, MemoryMap, StderrNotifier};
use mapty::render::{self, MemoryList};
use mapty::storage::WorkoutRepository;
use mapty::types::WorkoutId;
use mapty::utils;
use std::process::ExitCode;

#[macro_use]
extern crate mapty;

type CliApp = App<MemoryMap, MemoryList, StderrNotifier>;

fn main() -> Result<ExitCode> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let config = AppConfig::from_cli(&cli)?;
    dlog!(
        "data_dir={} backend={:?} home={:?}",
        config.data_dir.display(),
        config.backend,
        config.home
    );

    let repo = WorkoutRepository::new(config.open_store()?);
    let mut geo = FixedLocation(config.home);
    let mut app = App::start(
        MemoryMap::default(),
        MemoryList::default(),
        StderrNotifier,
        repo,
        &mut geo,
        config.zoom,
    );

    match run(&mut app, &mut geo, cli.cmd.unwrap_or(Cmd::List)) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        // Already shown through the notifier.
        Err(
            WorkoutError::Validation
            | WorkoutError::MissingCoordinates
            | WorkoutError::MapUnavailable
            | WorkoutError::Storage(_),
        ) => Ok(ExitCode::FAILURE),
        Err(e @ WorkoutError::NotFound(_)) => {
            eprintln!("{e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run(app: &mut CliApp, geo: &mut FixedLocation, cmd: Cmd) -> mapty::error::Result<()> {
    match cmd {
        Cmd::List => {
            if app.store().is_empty() {
                tracing::info!("no workouts yet");
            }
            for w in app.store().all().iter().rev() {
                println!("{}", render::summary_line(w));
            }
        }
        Cmd::Add {
            at,
            kind,
            distance,
            duration,
            cadence,
            elevation,
        } => {
            app.handle_map_click(at)?;
            let input = app.form_mut().input_mut();
            input.kind = kind;
            input.distance = distance;
            input.duration = duration;
            input.cadence = cadence.unwrap_or_default();
            input.elevation = elevation.unwrap_or_default();

            if let SubmitOutcome::Created(id) = app.submit()? {
                println!("{id}");
            }
        }
        Cmd::Edit {
            id,
            kind,
            distance,
            duration,
            cadence,
            elevation,
        } => {
            let id = WorkoutId::from(id);
            app.handle_list_click(&id, ListAction::Edit)?;

            if kind.is_some_and(|k| k != app.form().input().kind) {
                app.toggle_type();
            }
            let input = app.form_mut().input_mut();
            if let Some(v) = distance {
                input.distance = v;
            }
            if let Some(v) = duration {
                input.duration = v;
            }
            if let Some(v) = cadence {
                input.cadence = v;
            }
            if let Some(v) = elevation {
                input.elevation = v;
            }

            app.submit()?;
            if let Some(w) = app.store().get(&id) {
                println!("{}", render::summary_line(w));
            }
        }
        Cmd::Delete { id } => {
            app.handle_list_click(&WorkoutId::from(id), ListAction::Delete)?;
        }
        Cmd::Show { id } => {
            let id = WorkoutId::from(id);
            match app.list().get(&id) {
                Some(html) => print!("{html}"),
                None => return Err(WorkoutError::NotFound(id)),
            }
        }
        Cmd::Reset => {
            app.reset(geo)?;
            println!("all workouts removed");
        }
    }
    Ok(())
}
