//! Sprites backed by image files. Only the header is read to learn the size.

use std::path::Path;

use tracing::warn;

use crate::error::Result;
use crate::sheet::SpriteEntry;

/// Reads `(width, height)` of the image at `path` without decoding pixel data.
pub fn image_size(path: &Path) -> Result<(u32, u32)> {
    Ok(image::image_dimensions(path)?)
}

/// Builds a sprite for the image at `path`.
///
/// An unreadable image yields a pending sprite, which fails packing with `SpriteUnavailable`.
pub fn load_sprite<K>(key: K, path: &Path) -> SpriteEntry<K> {
    match image_size(path) {
        Ok((w, h)) => SpriteEntry::new(key, w, h),
        Err(err) => {
            warn!(path = %path.display(), %err, "image size unavailable");
            SpriteEntry::pending(key)
        }
    }
}
