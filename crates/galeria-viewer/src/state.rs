//! Observable state of the viewer widget.
//!
//! The widget publishes its state through stores; the site reads and writes
//! them only through the [`Store`] contract. `MainState` is the whole
//! element's state, `ImageState` belongs to one opened image.

use serde::{Deserialize, Serialize};

use crate::camera::View;
use crate::model::{ActiveTour, ImageInfo, Marker, MarkerSelection};
use crate::store::Store;

/// State shared by the whole viewer element: the shown image, the running
/// tour and the opened marker, each independently readable and settable.
#[derive(Debug, Clone, Default)]
pub struct MainState {
    /// The currently shown image.
    pub current: Store<Option<ImageInfo>>,
    /// The running tour, if any.
    pub tour: Store<Option<ActiveTour>>,
    /// The opened marker, if any.
    pub marker: Store<Option<Marker>>,
}

impl MainState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimal snapshot of the element state, by id.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            image: self.current.get().map(|info| info.id),
            tour: self.tour.get().map(|tour| tour.id().to_string()),
            marker: self.marker.get().map(|marker| marker.id),
        }
    }

    /// Close any running tour and opened marker.
    pub fn clear(&self) {
        self.tour.set(None);
        self.marker.set(None);
    }
}

/// Per-image state: the last known viewport and the marker selection.
#[derive(Debug, Clone, Default)]
pub struct ImageState {
    /// Current or last known viewport of the image.
    pub view: Store<Option<View>>,
    /// Marker opened in this image, by id or full payload.
    pub marker: Store<Option<MarkerSelection>>,
}

impl ImageState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Independent, minimal description of a viewer state, usable to replicate
/// it elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tour: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn marker(id: &str) -> Marker {
        serde_json::from_value(json!({ "id": id, "x": 0.5, "y": 0.5 })).unwrap()
    }

    #[test]
    fn snapshot_reflects_store_contents() {
        let state = MainState::new();
        assert_eq!(state.snapshot(), StateSnapshot::default());

        state.marker.set(Some(marker("m-1")));
        let snapshot = state.snapshot();
        assert_eq!(snapshot.marker.as_deref(), Some("m-1"));
        assert_eq!(snapshot.tour, None);
    }

    #[test]
    fn clear_closes_tour_and_marker() {
        let state = MainState::new();
        state.marker.set(Some(marker("m-1")));
        state
            .tour
            .set(Some(serde_json::from_value(json!({ "id": "t-1", "steps": [] })).unwrap()));

        state.clear();

        assert_eq!(state.snapshot(), StateSnapshot::default());
    }

    #[test]
    fn image_state_tracks_the_last_viewport() {
        let state = ImageState::new();
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));

        let sink = std::sync::Arc::clone(&seen);
        let _sub = state.view.subscribe(move |view| sink.lock().unwrap().push(*view));

        state.view.set(Some([0.1, 0.1, 0.9, 0.9]));

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec![None, Some([0.1, 0.1, 0.9, 0.9])]);
    }
}
