use crate::error::{Result, WorkoutError};
use crate::types::{Detail, Workout, WorkoutKind};

/// Raw form values as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInput {
    pub kind: WorkoutKind,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

impl Default for FormInput {
    fn default() -> Self {
        Self {
            kind: WorkoutKind::Running,
            distance: String::new(),
            duration: String::new(),
            cadence: String::new(),
            elevation: String::new(),
        }
    }
}

/// A submitted form that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutInput {
    pub distance: f64,
    pub duration: f64,
    pub detail: Detail,
}

/// Numeric coercion of a form field: blank is `0`, garbage is NaN.
pub fn parse_field(raw: &str) -> f64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0.0;
    }
    raw.parse().unwrap_or(f64::NAN)
}

fn all_valid(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite() && *v > 0.0)
}

impl FormInput {
    pub fn from_workout(w: &Workout) -> Self {
        let mut input = Self {
            kind: w.kind(),
            distance: w.distance().to_string(),
            duration: w.duration().to_string(),
            ..Self::default()
        };
        match w.activity().detail() {
            Detail::Running { cadence } => input.cadence = cadence.to_string(),
            Detail::Cycling { elevation_gain } => input.elevation = elevation_gain.to_string(),
        }
        input
    }

    /// Only the field matching the selected type is read.
    pub fn validate(&self) -> Result<WorkoutInput> {
        let distance = parse_field(&self.distance);
        let duration = parse_field(&self.duration);
        let detail = match self.kind {
            WorkoutKind::Running => Detail::Running {
                cadence: parse_field(&self.cadence),
            },
            WorkoutKind::Cycling => Detail::Cycling {
                elevation_gain: parse_field(&self.elevation),
            },
        };

        if !all_valid(&[distance, duration, detail.value()]) {
            return Err(WorkoutError::Validation);
        }

        Ok(WorkoutInput {
            distance,
            duration,
            detail,
        })
    }
}

/// Visible state of the workout form.
#[derive(Debug, Clone, Default)]
pub struct Form {
    visible: bool,
    input: FormInput,
}

impl Form {
    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Blanks the numeric fields; the selected type is kept.
    pub fn clear_fields(&mut self) {
        self.input = FormInput {
            kind: self.input.kind,
            ..FormInput::default()
        };
    }

    pub fn fill(&mut self, w: &Workout) {
        self.input = FormInput::from_workout(w);
    }

    pub fn toggle_kind(&mut self) {
        self.input.kind = self.input.kind.toggled();
    }

    pub fn cadence_row_visible(&self) -> bool {
        self.input.kind == WorkoutKind::Running
    }

    pub fn elevation_row_visible(&self) -> bool {
        self.input.kind == WorkoutKind::Cycling
    }

    pub const fn input(&self) -> &FormInput {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut FormInput {
        &mut self.input
    }
}
