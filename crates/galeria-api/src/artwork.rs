//! Artwork records and the display-record mapper.
//!
//! Records are backend-defined JSON; the only field this site relies on is
//! a stable `id`, from which a predictable thumbnail path is derived.
//! Everything else passes through untouched.

use serde_json::{Map, Value};

/// Base path of the museum's thumbnail renderer.
pub const THUMBNAIL_BASE: &str = "https://www.webumenia.sk/dielo/nahlad";

/// Longest-edge size requested for display thumbnails, in pixels.
pub const THUMBNAIL_SIZE: u32 = 600;

/// Thumbnail URL for an artwork id. Pure; the same id always yields the
/// same URL.
pub fn thumbnail_url(id: &str) -> String {
    format!("{THUMBNAIL_BASE}/{id}/{THUMBNAIL_SIZE}")
}

/// Adapt a raw artwork record into its display shape.
///
/// Returns a new record: top-level fields are preserved, `content` is
/// copied with one added `thumbnail` field derived from the record's `id`.
/// The input is never mutated and nothing is validated: a missing `id`
/// yields a thumbnail URL with an empty id segment, and a missing or
/// non-record `content` is replaced by an otherwise empty one. Reapplying
/// the mapper to its own output overwrites `thumbnail` with the same value.
pub fn build_artwork(response: &Value) -> Value {
    let mut record = match response.as_object() {
        Some(fields) => fields.clone(),
        None => Map::new(),
    };

    let id = record.get("id").map(id_segment).unwrap_or_default();

    let mut content = match record.get("content").and_then(Value::as_object) {
        Some(fields) => fields.clone(),
        None => Map::new(),
    };
    content.insert("thumbnail".into(), Value::String(thumbnail_url(&id)));

    record.insert("content".into(), Value::Object(content));
    Value::Object(record)
}

/// Title shown for a display record, from `content.title`.
pub fn title(record: &Value) -> Option<&str> {
    record.pointer("/content/title").and_then(Value::as_str)
}

/// Author line for a display record, from `content.author`.
pub fn author(record: &Value) -> Option<&str> {
    record.pointer("/content/author").and_then(Value::as_str)
}

/// Thumbnail URL of a display record, from `content.thumbnail`.
pub fn thumbnail(record: &Value) -> Option<&str> {
    record.pointer("/content/thumbnail").and_then(Value::as_str)
}

fn id_segment(id: &Value) -> String {
    match id {
        Value::String(id) => id.clone(),
        Value::Number(id) => id.to_string(),
        _ => String::new(),
    }
}
