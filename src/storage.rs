use crate::database::KeyValueStore;
use crate::types::{Coords, Detail, Workout, WorkoutId, WorkoutKind};
use anyhow::{Context, Result};
use std::collections::HashSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const STORAGE_KEY: &str = "workouts";

/// Plain persisted form of a workout.
///
/// Derived fields are written so the payload reads like the live objects,
/// but they are recomputed when the record is promoted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    pub id: WorkoutId,
    pub date: DateTime<Utc>,
    pub coords: Coords,
    pub distance: f64,
    pub duration: f64,
    #[serde(rename = "type")]
    pub kind: WorkoutKind,
    #[serde(default)]
    pub clicks: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

impl From<&Workout> for WorkoutRecord {
    fn from(w: &Workout) -> Self {
        Self {
            id: w.id().clone(),
            date: w.date(),
            coords: w.coords(),
            distance: w.distance(),
            duration: w.duration(),
            kind: w.kind(),
            clicks: w.clicks(),
            description: Some(w.description().to_string()),
            cadence: w.cadence(),
            pace: w.pace(),
            elevation_gain: w.elevation_gain(),
            speed: w.speed(),
        }
    }
}

impl WorkoutRecord {
    /// Rebuilds the tagged variant and its derived fields.
    pub fn promote(self) -> Result<Workout> {
        let detail = match self.kind {
            WorkoutKind::Running => Detail::Running {
                cadence: self
                    .cadence
                    .with_context(|| format!("running workout {} has no cadence", self.id))?,
            },
            WorkoutKind::Cycling => Detail::Cycling {
                elevation_gain: self.elevation_gain.with_context(|| {
                    format!("cycling workout {} has no elevationGain", self.id)
                })?,
            },
        };

        Ok(Workout::restore(
            self.id,
            self.date,
            self.coords,
            self.distance,
            self.duration,
            detail,
            self.clicks,
        ))
    }
}

pub fn encode(workouts: &[Workout]) -> Result<String> {
    let records: Vec<WorkoutRecord> = workouts.iter().map(WorkoutRecord::from).collect();
    serde_json::to_string(&records).context("serializing workouts")
}

pub fn decode(raw: &str) -> Result<Vec<Workout>> {
    // The stored value may be a literal `null`.
    let records: Option<Vec<WorkoutRecord>> =
        serde_json::from_str(raw).context("parsing stored workouts")?;
    let records = records.unwrap_or_default();

    // Ids stay unique in memory; a repeated id keeps its first record.
    let mut seen = HashSet::with_capacity(records.len());
    let mut out = Vec::with_capacity(records.len());
    for r in records {
        if !seen.insert(r.id.clone()) {
            tracing::warn!(id = %r.id, "duplicate stored workout dropped");
            continue;
        }
        out.push(r.promote()?);
    }
    Ok(out)
}

/// Reads and writes the whole store under [`STORAGE_KEY`].
pub struct WorkoutRepository {
    kv: Box<dyn KeyValueStore>,
}

impl WorkoutRepository {
    pub fn new(kv: Box<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Absent or malformed state loads as an empty store.
    pub fn load(&self) -> Vec<Workout> {
        let raw = match self.kv.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                let err = format!("{e:#}");
                tracing::warn!(%err, "reading stored workouts failed; starting empty");
                return Vec::new();
            }
        };

        match decode(&raw) {
            Ok(workouts) => {
                tracing::debug!(count = workouts.len(), "loaded workouts");
                workouts
            }
            Err(e) => {
                let err = format!("{e:#}");
                tracing::warn!(%err, "stored workouts are malformed; starting empty");
                Vec::new()
            }
        }
    }

    pub fn save(&mut self, workouts: &[Workout]) -> Result<()> {
        let raw = encode(workouts)?;
        self.kv
            .set(STORAGE_KEY, &raw)
            .context("writing workouts")
    }

    pub fn clear(&mut self) -> Result<()> {
        self.kv.remove(STORAGE_KEY).context("removing workouts")
    }
}
