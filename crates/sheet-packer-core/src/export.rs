use crate::model::Layout;
use serde_json::{Value, json};

/// Serialize the layout as `{ sheet, sprites: [...], meta }` (array-of-sprites style).
/// Suitable for generic tooling and simple consumption.
pub fn to_json_array<K: ToString>(layout: &Layout<K>) -> Value {
    let sprites_val = layout
        .sprites
        .iter()
        .map(|s| {
            json!({
                "key": s.key.to_string(),
                "frame": {"x": s.frame.x, "y": s.frame.y, "w": s.frame.w, "h": s.frame.h},
            })
        })
        .collect::<Vec<_>>();
    json!({
        "sheet": {"w": layout.width, "h": layout.height},
        "sprites": sprites_val,
        "meta": &layout.meta,
    })
}

/// Sprites keyed by name.
/// Shape: `{ frames: { name: { frame, sourceSize } }, meta: { ..., size } }`, the TexturePacker-like
/// JSON hash many engine pipelines expect.
pub fn to_json_hash<K: ToString>(layout: &Layout<K>) -> Value {
    let mut frames = serde_json::Map::new();
    for s in &layout.sprites {
        frames.insert(
            s.key.to_string(),
            json!({
                "frame": {"x": s.frame.x, "y": s.frame.y, "w": s.frame.w, "h": s.frame.h},
                "rotated": false,
                "trimmed": false,
                "sourceSize": {"w": s.frame.w, "h": s.frame.h},
            }),
        );
    }
    let mut meta = serde_json::to_value(&layout.meta).unwrap_or_else(|_| json!({}));
    if let Value::Object(m) = &mut meta {
        m.insert("size".into(), json!({"w": layout.width, "h": layout.height}));
    }
    json!({ "frames": frames, "meta": meta })
}
