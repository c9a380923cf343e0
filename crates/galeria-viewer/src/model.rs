//! Payloads exchanged with the viewer widget.
//!
//! These records come from the widget's publishing backend. The site passes
//! them through without validating them, so every type keeps its unknown
//! fields in a flattened map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::camera::View;

/// A point of interest placed on a zoomable image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: String,
    /// Relative X coordinate, 0..1.
    pub x: f64,
    /// Relative Y coordinate, 0..1.
    pub y: f64,
    /// Viewport to fly to when the marker opens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<View>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A guided tour along a sequence of markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerTour {
    pub id: String,
    /// Marker ids, in tour order.
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Total duration in seconds, when precomputed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A timeline-driven camera tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoTour {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Either kind of running tour. Marker tours are recognized by their
/// `steps` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActiveTour {
    Marker(MarkerTour),
    Video(VideoTour),
}

impl ActiveTour {
    pub fn id(&self) -> &str {
        match self {
            ActiveTour::Marker(tour) => &tour.id,
            ActiveTour::Video(tour) => &tour.id,
        }
    }
}

/// Static description of a zoomable image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Viewport/UI/camera settings; opaque to this site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A marker selection as the widget accepts it: a bare id or the full
/// payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkerSelection {
    Id(String),
    Payload(Marker),
}

impl MarkerSelection {
    pub fn id(&self) -> &str {
        match self {
            MarkerSelection::Id(id) => id,
            MarkerSelection::Payload(marker) => &marker.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn marker_round_trips_unknown_fields() {
        let raw = json!({
            "id": "m-1",
            "x": 0.25,
            "y": 0.75,
            "title": "Detail",
            "audioAutoPlay": true,
            "class": "highlight"
        });

        let marker: Marker = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(marker.id, "m-1");
        assert_eq!(marker.extra.get("class"), Some(&json!("highlight")));

        let back = serde_json::to_value(&marker).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn active_tour_distinguishes_marker_and_video_tours() {
        let marker_tour = json!({ "id": "t-1", "steps": ["m-1", "m-2"] });
        let video_tour = json!({ "id": "t-2", "duration": 42.5 });

        match serde_json::from_value::<ActiveTour>(marker_tour).unwrap() {
            ActiveTour::Marker(tour) => assert_eq!(tour.steps.len(), 2),
            other => panic!("expected marker tour, got {other:?}"),
        }
        match serde_json::from_value::<ActiveTour>(video_tour).unwrap() {
            ActiveTour::Video(tour) => assert_eq!(tour.duration, Some(42.5)),
            other => panic!("expected video tour, got {other:?}"),
        }
    }

    #[test]
    fn marker_selection_accepts_id_or_payload() {
        let by_id: MarkerSelection = serde_json::from_value(json!("m-9")).unwrap();
        assert_eq!(by_id.id(), "m-9");

        let by_payload: MarkerSelection =
            serde_json::from_value(json!({ "id": "m-3", "x": 0.1, "y": 0.2 })).unwrap();
        assert_eq!(by_payload.id(), "m-3");
    }

    #[test]
    fn image_info_keeps_settings_opaque() {
        let raw = json!({
            "id": "img-1",
            "width": 4096.0,
            "height": 2048.0,
            "settings": { "view": [0.0, 0.0, 1.0, 1.0], "camspeed": 2 }
        });

        let info: ImageInfo = serde_json::from_value(raw).unwrap();
        assert_eq!(
            info.settings.as_ref().and_then(|s| s.get("camspeed")),
            Some(&json!(2))
        );
    }
}
