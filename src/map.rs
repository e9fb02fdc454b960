use crate::types::Coords;
use std::collections::BTreeMap;
use thiserror::Error;

/// Opaque handle to a rendered marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub content: String,
    pub class_name: String,
    pub max_width: u32,
    pub min_width: u32,
    pub auto_close: bool,
    pub close_on_click: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOptions {
    pub animate: bool,
    /// seconds
    pub pan_duration: f64,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            animate: true,
            pan_duration: 1.0,
        }
    }
}

pub trait MapView {
    fn create_map(&mut self, center: Coords, zoom: u8);
    fn add_marker(&mut self, coords: Coords, popup: Popup) -> MarkerHandle;
    fn remove_marker(&mut self, handle: MarkerHandle);
    fn set_view(&mut self, coords: Coords, zoom: u8, opts: ViewOptions);
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("geolocation failed: {0}")]
pub struct GeolocationError(pub String);

pub trait Geolocator {
    fn current_position(&mut self) -> Result<Coords, GeolocationError>;
}

/// Blocking user-visible message.
pub trait Notifier {
    fn alert(&mut self, message: &str);
}

/// Geolocation answered from configuration. `None` behaves like a denied
/// permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(pub Option<Coords>);

impl Geolocator for FixedLocation {
    fn current_position(&mut self) -> Result<Coords, GeolocationError> {
        self.0
            .ok_or_else(|| GeolocationError("no position configured".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub coords: Coords,
    pub popup: Popup,
}

/// Map that records what would be drawn.
#[derive(Debug, Clone, Default)]
pub struct MemoryMap {
    pub center: Option<Coords>,
    pub zoom: u8,
    pub markers: BTreeMap<MarkerHandle, Marker>,
    next_handle: u64,
}

impl MemoryMap {
    pub fn marker(&self, handle: MarkerHandle) -> Option<&Marker> {
        self.markers.get(&handle)
    }
}

impl MapView for MemoryMap {
    fn create_map(&mut self, center: Coords, zoom: u8) {
        self.center = Some(center);
        self.zoom = zoom;
        self.markers.clear();
    }

    fn add_marker(&mut self, coords: Coords, popup: Popup) -> MarkerHandle {
        let handle = MarkerHandle(self.next_handle);
        self.next_handle += 1;
        self.markers.insert(handle, Marker { coords, popup });
        handle
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        self.markers.remove(&handle);
    }

    fn set_view(&mut self, coords: Coords, zoom: u8, _opts: ViewOptions) {
        self.center = Some(coords);
        self.zoom = zoom;
    }
}

/// Notifier that keeps every message, for tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    pub messages: Vec<String>,
}

impl Notifier for RecordingNotifier {
    fn alert(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

/// Prints notices to stderr for the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&mut self, message: &str) {
        tracing::warn!(notice = message, "user notice");
        eprintln!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_map_hands_out_distinct_handles() {
        let mut map = MemoryMap::default();
        map.create_map(Coords::new(0.0, 0.0), 13);
        let popup = Popup {
            content: "x".into(),
            class_name: "running-popup".into(),
            max_width: 250,
            min_width: 100,
            auto_close: false,
            close_on_click: false,
        };
        let a = map.add_marker(Coords::new(1.0, 1.0), popup.clone());
        let b = map.add_marker(Coords::new(1.0, 1.0), popup);
        assert_ne!(a, b);
        map.remove_marker(a);
        assert!(map.marker(a).is_none());
        assert!(map.marker(b).is_some());
    }

    #[test]
    fn fixed_location_without_position_fails() {
        assert!(FixedLocation(None).current_position().is_err());
        let here = Coords::new(52.2, 21.0);
        assert_eq!(FixedLocation(Some(here)).current_position(), Ok(here));
    }
}
