use crate::types::{Workout, WorkoutId};

/// Ordered, id-unique collection of workouts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutStore {
    workouts: Vec<Workout>,
}

impl WorkoutStore {
    /// Later duplicates of an id are dropped.
    pub fn from_workouts(workouts: Vec<Workout>) -> Self {
        let mut store = Self::default();
        for w in workouts {
            if store.get(w.id()).is_none() {
                store.workouts.push(w);
            }
        }
        store
    }

    pub fn all(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn position(&self, id: &WorkoutId) -> Option<usize> {
        self.workouts.iter().position(|w| w.id() == id)
    }

    pub fn get(&self, id: &WorkoutId) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    /// Mutating through this keeps the workout at its index.
    pub fn get_mut(&mut self, id: &WorkoutId) -> Option<&mut Workout> {
        self.workouts.iter_mut().find(|w| w.id() == id)
    }

    /// Appends unless the id is already present.
    pub fn push(&mut self, workout: Workout) -> bool {
        if self.get(workout.id()).is_some() {
            return false;
        }
        self.workouts.push(workout);
        true
    }

    pub fn remove(&mut self, id: &WorkoutId) -> Option<Workout> {
        let idx = self.position(id)?;
        Some(self.workouts.remove(idx))
    }

    pub fn clear(&mut self) {
        self.workouts.clear();
    }
}
