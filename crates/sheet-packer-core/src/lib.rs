//! Core library for packing sprites onto a growable sheet.
//!
//! - Engine: widest-first greedy placement into a ledger of free zones; when nothing fits the
//!   canvas grows according to a `GrowthPolicy`
//! - Policies: highest-fit (exact growth, optional aspect ratio) and diagonal-fit (power-of-two
//!   growth, optional aspect ratio), selected from the `Constraints` flags
//! - Data model is serde-serializable; JSON exporters are provided in `export`.
//!
//! Quick example:
//! ```
//! use sheet_packer_core::{Constraints, pack_layout};
//! # fn main() -> sheet_packer_core::Result<()> {
//! let layout = pack_layout(vec![("a", 3, 4), ("b", 5, 5)], Constraints::default())?;
//! assert_eq!((layout.width, layout.height), (8, 5));
//! # Ok(()) }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
#[cfg(feature = "image")]
pub mod image_source;
pub mod model;
pub mod packer;
pub mod pipeline;
pub mod sheet;

pub use config::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use packer::*;
pub use pipeline::*;
pub use sheet::*;

/// Convenience prelude for common types and functions.
/// Importing `sheet_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{Constraints, ConstraintsBuilder};
    pub use crate::model::{Layout, Meta, PackStats, Placement, Position, Rect};
    pub use crate::packer::{GrowthPolicy, SheetPacker};
    pub use crate::sheet::{Sheet, SheetNode, Sprite, SpriteEntry, SpriteSheet};
    pub use crate::{pack_layout, pack_sheet, pack_sheets};
}
