use crate::dlog;
use crate::error::{Result, WorkoutError};
use crate::form::Form;
use crate::map::{Geolocator, MapView, MarkerHandle, Notifier, ViewOptions};
use crate::render::{self, WorkoutList};
use crate::storage::WorkoutRepository;
use crate::store::WorkoutStore;
use crate::types::{Coords, Workout, WorkoutId};
use std::collections::HashMap;

pub const DEFAULT_ZOOM: u8 = 13;

/// What the user clicked on inside a list entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    Focus,
    Edit,
    Delete,
}

/// An open edit: the original's id plus a copy taken when editing started.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub original: WorkoutId,
    pub snapshot: Workout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(WorkoutId),
    Updated(WorkoutId),
}

pub struct App<M, L, N> {
    map: M,
    map_ready: bool,
    zoom: u8,
    list: L,
    notifier: N,
    repo: WorkoutRepository,
    store: WorkoutStore,
    markers: HashMap<WorkoutId, MarkerHandle>,
    pending_click: Option<Coords>,
    editing: Option<EditSession>,
    form: Form,
}

impl<M: MapView, L: WorkoutList, N: Notifier> App<M, L, N> {
    /// Loads persisted workouts, renders them, then asks for the position and
    /// initialises the map.
    pub fn start(
        map: M,
        list: L,
        notifier: N,
        repo: WorkoutRepository,
        geo: &mut dyn Geolocator,
        zoom: u8,
    ) -> Self {
        let mut app = Self {
            map,
            map_ready: false,
            zoom,
            list,
            notifier,
            repo,
            store: WorkoutStore::default(),
            markers: HashMap::new(),
            pending_click: None,
            editing: None,
            form: Form::default(),
        };
        app.boot(geo);
        app
    }

    fn boot(&mut self, geo: &mut dyn Geolocator) {
        self.store = WorkoutStore::from_workouts(self.repo.load());
        for w in self.store.all() {
            self.list.prepend(w.id(), render::workout_html(w));
        }
        tracing::debug!(workouts = self.store.len(), "store loaded");

        match geo.current_position() {
            Ok(center) => self.load_map(center),
            Err(e) => {
                tracing::warn!(err = %e, "map not initialised");
                self.notifier.alert("No location detected");
            }
        }
    }

    fn load_map(&mut self, center: Coords) {
        self.map.create_map(center, self.zoom);
        self.map_ready = true;
        self.markers.clear();

        let workouts: Vec<Workout> = self.store.all().to_vec();
        for w in &workouts {
            self.render_marker(w);
        }
        tracing::info!(center = %center, zoom = self.zoom, markers = workouts.len(), "map ready");
    }

    fn render_marker(&mut self, w: &Workout) {
        if !self.map_ready {
            dlog!("marker_skipped id={} reason=no_map", w.id());
            return;
        }
        let handle = self.map.add_marker(w.coords(), render::popup(w));
        if let Some(old) = self.markers.insert(w.id().clone(), handle) {
            self.map.remove_marker(old);
        }
    }

    fn drop_marker(&mut self, id: &WorkoutId) {
        match self.markers.remove(id) {
            Some(handle) => self.map.remove_marker(handle),
            None => dlog!("marker_missing id={id}"),
        }
    }

    fn fail(&mut self, err: WorkoutError) -> WorkoutError {
        self.notifier.alert(&err.to_string());
        err
    }

    /// Saves what the store is about to become. Callers apply the change to
    /// the store, list and markers only once this succeeds.
    fn persist(&mut self, next: &[Workout]) -> Result<()> {
        if let Err(e) = self.repo.save(next) {
            return Err(self.fail(WorkoutError::Storage(e)));
        }
        dlog!("persisted count={}", next.len());
        Ok(())
    }

    /// Remembers the clicked position and opens a blank form.
    pub fn handle_map_click(&mut self, coords: Coords) -> Result<()> {
        if !self.map_ready {
            return Err(self.fail(WorkoutError::MapUnavailable));
        }
        self.pending_click = Some(coords);
        self.editing = None;
        self.form.clear_fields();
        self.form.show();
        Ok(())
    }

    pub fn handle_list_click(&mut self, id: &WorkoutId, action: ListAction) -> Result<()> {
        let Some(coords) = self.store.get(id).map(Workout::coords) else {
            dlog!("list_click_ignored id={id}");
            return Err(WorkoutError::NotFound(id.clone()));
        };
        self.move_to(coords);

        match action {
            ListAction::Focus => Ok(()),
            ListAction::Edit => self.begin_edit(id),
            ListAction::Delete => self.delete(id),
        }
    }

    fn move_to(&mut self, coords: Coords) {
        if self.map_ready {
            self.map.set_view(coords, self.zoom, ViewOptions::default());
        } else {
            dlog!("pan_skipped reason=no_map");
        }
    }

    /// Opens the form on a copy of the workout.
    pub fn begin_edit(&mut self, id: &WorkoutId) -> Result<()> {
        let snapshot = self
            .store
            .get(id)
            .cloned()
            .ok_or_else(|| WorkoutError::NotFound(id.clone()))?;

        self.form.fill(&snapshot);
        self.form.show();
        self.editing = Some(EditSession {
            original: id.clone(),
            snapshot,
        });
        Ok(())
    }

    /// Persists the store without the workout, then removes its marker, list
    /// entry and store entry. A workout without a marker is still removed.
    pub fn delete(&mut self, id: &WorkoutId) -> Result<()> {
        if self.store.get(id).is_none() {
            return Err(WorkoutError::NotFound(id.clone()));
        }

        let next: Vec<Workout> = self
            .store
            .all()
            .iter()
            .filter(|w| w.id() != id)
            .cloned()
            .collect();
        self.persist(&next)?;

        self.drop_marker(id);
        self.list.remove(id);
        self.store.remove(id);
        if self.editing.as_ref().is_some_and(|s| &s.original == id) {
            self.editing = None;
            self.form.clear_fields();
            self.form.hide();
        }

        tracing::info!(id = %id, remaining = self.store.len(), "workout deleted");
        Ok(())
    }

    pub fn handle_escape(&mut self) {
        self.form.clear_fields();
        self.form.hide();
        self.editing = None;
    }

    pub fn toggle_type(&mut self) {
        self.form.toggle_kind();
    }

    /// Creates a workout at the pending click, or applies the open edit.
    pub fn submit(&mut self) -> Result<SubmitOutcome> {
        let target = self
            .editing
            .as_ref()
            .map(|s| s.snapshot.coords())
            .or(self.pending_click);
        let Some(coords) = target else {
            return Err(self.fail(WorkoutError::MissingCoordinates));
        };

        let input = match self.form.input().validate() {
            Ok(input) => input,
            Err(e) => return Err(self.fail(e)),
        };

        let outcome = if let Some(session) = self.editing.take() {
            let id = session.original.clone();
            let Some(current) = self.store.get(&id) else {
                return Err(self.fail(WorkoutError::NotFound(id)));
            };
            let mut updated = current.clone();
            updated.update(input.distance, input.duration, input.detail);

            let next: Vec<Workout> = self
                .store
                .all()
                .iter()
                .map(|w| if w.id() == &id { updated.clone() } else { w.clone() })
                .collect();
            if let Err(e) = self.persist(&next) {
                self.editing = Some(session);
                return Err(e);
            }

            if let Some(original) = self.store.get_mut(&id) {
                *original = updated.clone();
            }
            self.list.replace(&id, render::workout_html(&updated));
            self.drop_marker(&id);
            self.render_marker(&updated);

            tracing::info!(id = %id, kind = %updated.kind(), "workout updated");
            SubmitOutcome::Updated(id)
        } else {
            let workout = Workout::new(coords, input.distance, input.duration, input.detail);
            let id = workout.id().clone();

            let mut next = self.store.all().to_vec();
            next.push(workout.clone());
            self.persist(&next)?;

            self.render_marker(&workout);
            self.list.prepend(&id, render::workout_html(&workout));
            self.store.push(workout);

            tracing::info!(id = %id, coords = %coords, "workout created");
            SubmitOutcome::Created(id)
        };

        self.form.clear_fields();
        self.form.hide();
        Ok(outcome)
    }

    /// Drops persisted state and boots again from empty.
    pub fn reset(&mut self, geo: &mut dyn Geolocator) -> Result<()> {
        if let Err(e) = self.repo.clear() {
            return Err(self.fail(WorkoutError::Storage(e)));
        }

        let handles: Vec<MarkerHandle> = self.markers.drain().map(|(_, h)| h).collect();
        for h in handles {
            self.map.remove_marker(h);
        }
        self.list.clear();
        self.store.clear();
        self.pending_click = None;
        self.editing = None;
        self.form = Form::default();
        self.map_ready = false;

        tracing::info!("state reset");
        self.boot(geo);
        Ok(())
    }

    pub const fn store(&self) -> &WorkoutStore {
        &self.store
    }

    pub const fn map(&self) -> &M {
        &self.map
    }

    pub const fn map_ready(&self) -> bool {
        self.map_ready
    }

    pub const fn list(&self) -> &L {
        &self.list
    }

    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    pub const fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    pub const fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    pub const fn pending_click(&self) -> Option<Coords> {
        self.pending_click
    }

    pub fn marker_for(&self, id: &WorkoutId) -> Option<MarkerHandle> {
        self.markers.get(id).copied()
    }
}
