use chrono::{DateTime, Datelike, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// prettier month names for descriptions, indexed by `month0()`
const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WorkoutId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for WorkoutId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A geographic position. Serialized as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(c: Coords) -> Self {
        [c.lat, c.lng]
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Parses `"LAT,LNG"`.
impl FromStr for Coords {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| format!("expected LAT,LNG, got {s:?}"))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|e| format!("bad latitude {lat:?}: {e}"))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|e| format!("bad longitude {lng:?}: {e}"))?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(format!("coordinates out of range: {lat},{lng}"));
        }
        Ok(Self { lat, lng })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Running => Self::Cycling,
            Self::Cycling => Self::Running,
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "running" => Ok(Self::Running),
            "cycling" => Ok(Self::Cycling),
            other => Err(format!("unknown workout type {other:?} (running|cycling)")),
        }
    }
}

/// The user-entered, variant-specific value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Detail {
    /// steps/min
    Running { cadence: f64 },
    /// meters
    Cycling { elevation_gain: f64 },
}

impl Detail {
    pub const fn kind(self) -> WorkoutKind {
        match self {
            Self::Running { .. } => WorkoutKind::Running,
            Self::Cycling { .. } => WorkoutKind::Cycling,
        }
    }

    pub const fn value(self) -> f64 {
        match self {
            Self::Running { cadence } => cadence,
            Self::Cycling { elevation_gain } => elevation_gain,
        }
    }
}

/// Variant payload of a workout: the entered value plus its derived metric.
///
/// Exactly one variant exists at a time, so a type change on edit replaces the
/// whole payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activity {
    Running { cadence: f64, pace: f64 },
    Cycling { elevation_gain: f64, speed: f64 },
}

impl Activity {
    fn derive(distance: f64, duration: f64, detail: Detail) -> Self {
        match detail {
            Detail::Running { cadence } => Self::Running {
                cadence,
                pace: compute_pace(distance, duration),
            },
            Detail::Cycling { elevation_gain } => Self::Cycling {
                elevation_gain,
                speed: compute_speed(distance, duration),
            },
        }
    }

    pub const fn kind(&self) -> WorkoutKind {
        match self {
            Self::Running { .. } => WorkoutKind::Running,
            Self::Cycling { .. } => WorkoutKind::Cycling,
        }
    }

    pub const fn detail(&self) -> Detail {
        match *self {
            Self::Running { cadence, .. } => Detail::Running { cadence },
            Self::Cycling { elevation_gain, .. } => Detail::Cycling { elevation_gain },
        }
    }
}

/// min/km
pub fn compute_pace(distance: f64, duration: f64) -> f64 {
    duration / distance
}

/// km/h
pub fn compute_speed(distance: f64, duration: f64) -> f64 {
    distance / (duration / 60.0)
}

/// `"<Type> on <Month> <day>"`, using the local calendar date of `date`.
pub fn describe(kind: WorkoutKind, date: DateTime<Utc>) -> String {
    let local = date.with_timezone(&Local);
    format!(
        "{} on {} {}",
        kind.label(),
        MONTHS[local.month0() as usize],
        local.day()
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: WorkoutId,
    date: DateTime<Utc>,
    coords: Coords,
    distance: f64,
    duration: f64,
    clicks: u32,
    description: String,
    activity: Activity,
}

impl Workout {
    /// Builds a fresh workout stamped now. Inputs are expected to be validated.
    pub fn new(coords: Coords, distance: f64, duration: f64, detail: Detail) -> Self {
        Self::restore(
            WorkoutId::generate(),
            Utc::now(),
            coords,
            distance,
            duration,
            detail,
            0,
        )
    }

    pub fn running(coords: Coords, distance: f64, duration: f64, cadence: f64) -> Self {
        Self::new(coords, distance, duration, Detail::Running { cadence })
    }

    pub fn cycling(coords: Coords, distance: f64, duration: f64, elevation_gain: f64) -> Self {
        Self::new(coords, distance, duration, Detail::Cycling { elevation_gain })
    }

    /// Rebuilds a workout with a known identity, recomputing every derived field.
    pub fn restore(
        id: WorkoutId,
        date: DateTime<Utc>,
        coords: Coords,
        distance: f64,
        duration: f64,
        detail: Detail,
        clicks: u32,
    ) -> Self {
        let activity = Activity::derive(distance, duration, detail);
        Self {
            description: describe(activity.kind(), date),
            id,
            date,
            coords,
            distance,
            duration,
            clicks,
            activity,
        }
    }

    /// Edits the workout in place. `id`, `date` and `coords` are kept; the
    /// variant payload is replaced, so switching type drops the old fields.
    pub fn update(&mut self, distance: f64, duration: f64, detail: Detail) {
        self.distance = distance;
        self.duration = duration;
        self.activity = Activity::derive(distance, duration, detail);
        self.description = describe(self.activity.kind(), self.date);
    }

    pub const fn id(&self) -> &WorkoutId {
        &self.id
    }

    pub const fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub const fn coords(&self) -> Coords {
        self.coords
    }

    pub const fn distance(&self) -> f64 {
        self.distance
    }

    pub const fn duration(&self) -> f64 {
        self.duration
    }

    pub const fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub const fn activity(&self) -> &Activity {
        &self.activity
    }

    pub const fn kind(&self) -> WorkoutKind {
        self.activity.kind()
    }

    pub const fn cadence(&self) -> Option<f64> {
        match self.activity {
            Activity::Running { cadence, .. } => Some(cadence),
            Activity::Cycling { .. } => None,
        }
    }

    pub const fn pace(&self) -> Option<f64> {
        match self.activity {
            Activity::Running { pace, .. } => Some(pace),
            Activity::Cycling { .. } => None,
        }
    }

    pub const fn elevation_gain(&self) -> Option<f64> {
        match self.activity {
            Activity::Cycling { elevation_gain, .. } => Some(elevation_gain),
            Activity::Running { .. } => None,
        }
    }

    pub const fn speed(&self) -> Option<f64> {
        match self.activity {
            Activity::Cycling { speed, .. } => Some(speed),
            Activity::Running { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const NYC: Coords = Coords::new(40.7, -74.0);

    #[test]
    fn running_derives_pace_and_description() {
        let w = Workout::running(NYC, 5.0, 25.0, 180.0);
        assert_eq!(w.kind(), WorkoutKind::Running);
        assert_eq!(w.pace(), Some(5.0));
        assert_eq!(w.cadence(), Some(180.0));
        assert_eq!(w.speed(), None);
        assert_eq!(w.elevation_gain(), None);
        assert!(w.description().starts_with("Running on "));
    }

    #[test]
    fn cycling_derives_speed() {
        let w = Workout::cycling(NYC, 20.0, 60.0, 300.0);
        assert_eq!(w.speed(), Some(20.0));
        assert_eq!(w.elevation_gain(), Some(300.0));
        assert_eq!(w.pace(), None);
        assert!(w.description().starts_with("Cycling on "));
    }

    #[test]
    fn update_switches_variant_and_keeps_identity() {
        let mut w = Workout::running(NYC, 5.0, 25.0, 180.0);
        let (id, date, coords) = (w.id().clone(), w.date(), w.coords());

        w.update(20.0, 60.0, Detail::Cycling { elevation_gain: 300.0 });

        assert_eq!(w.id(), &id);
        assert_eq!(w.date(), date);
        assert_eq!(w.coords(), coords);
        assert_eq!(w.cadence(), None);
        assert_eq!(w.pace(), None);
        assert_eq!(w.speed(), Some(20.0));
        assert!(w.description().starts_with("Cycling on "));

        w.update(10.0, 50.0, Detail::Running { cadence: 170.0 });
        assert_eq!(w.speed(), None);
        assert_eq!(w.elevation_gain(), None);
        assert_eq!(w.pace(), Some(5.0));
        assert!(w.description().starts_with("Running on "));
    }

    #[test]
    fn describe_uses_local_month_and_day() {
        let date = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let local = date.with_timezone(&Local);
        let expected = format!(
            "Cycling on {} {}",
            MONTHS[local.month0() as usize],
            local.day()
        );
        assert_eq!(describe(WorkoutKind::Cycling, date), expected);
    }

    #[test]
    fn coords_parse() {
        let c: Coords = "40.7, -74.0".parse().unwrap();
        assert_eq!(c, NYC);
        assert!("40.7".parse::<Coords>().is_err());
        assert!("91,0".parse::<Coords>().is_err());
        assert!("abc,0".parse::<Coords>().is_err());
    }

    #[test]
    fn kind_parse_and_toggle() {
        assert_eq!("Running".parse::<WorkoutKind>(), Ok(WorkoutKind::Running));
        assert_eq!("cycling".parse::<WorkoutKind>(), Ok(WorkoutKind::Cycling));
        assert!("swimming".parse::<WorkoutKind>().is_err());
        assert_eq!(WorkoutKind::Running.toggled(), WorkoutKind::Cycling);
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(WorkoutId::generate(), WorkoutId::generate());
    }
}
