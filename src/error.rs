use crate::types::WorkoutId;
use thiserror::Error;

/// Errors surfaced to the user while handling a gesture.
///
/// Each one is also shown through the [`Notifier`](crate::map::Notifier) at the
/// point where it is detected.
#[derive(Debug, Error)]
pub enum WorkoutError {
    #[error("Please enter positive numbers")]
    Validation,

    #[error("Can't get coords")]
    MissingCoordinates,

    #[error("Map is not available (no location detected)")]
    MapUnavailable,

    #[error("Workout not found: {0}")]
    NotFound(WorkoutId),

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, WorkoutError>;
