use crate::cli::Cli;
use crate::database::{JsonFileStore, KeyValueStore, SqliteStore};
use crate::types::Coords;
use anyhow::{Context, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const SQLITE_FILE: &str = "mapty.sqlite";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// `<data-dir>/workouts.json`
    Json,
    /// `<data-dir>/mapty.sqlite`
    Sqlite,
}

/// Settings resolved from flags, environment and platform defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub backend: Backend,
    /// Answer to the geolocation lookup; `None` means no location.
    pub home: Option<Coords>,
    pub zoom: u8,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let data_dir = match &cli.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .map(|d| d.join("mapty"))
                .context("no platform data directory; pass --data-dir or set MAPTY_DATA_DIR")?,
        };

        Ok(Self {
            data_dir,
            backend: cli.backend,
            home: cli.home,
            zoom: cli.zoom,
        })
    }

    pub fn open_store(&self) -> Result<Box<dyn KeyValueStore>> {
        Ok(match self.backend {
            Backend::Json => Box::new(JsonFileStore::open(&self.data_dir)?),
            Backend::Sqlite => Box::new(SqliteStore::open(&self.data_dir.join(SQLITE_FILE))?),
        })
    }
}
