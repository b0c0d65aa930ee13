use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
///
/// Edges are half-open: the rectangle covers `[x, x + w) x [y, y + h)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }
    pub fn area(&self) -> u64 {
        (self.w as u64) * (self.h as u64)
    }
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
    /// Returns true if `r` lies fully inside `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        crate::geometry::contains(self, r)
    }
    /// Returns true if the two rectangles share interior area.
    pub fn intersects(&self, r: &Rect) -> bool {
        crate::geometry::intersects(self, r)
    }
    pub fn intersection(&self, r: &Rect) -> Option<Rect> {
        crate::geometry::intersection(self, r)
    }
}

/// Location of a sprite on its sheet. `(-1, -1)` marks a sprite that has not been placed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const UNPLACED: Position = Position { x: -1, y: -1 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub(crate) fn from_corner((x, y): (u32, u32)) -> Self {
        Self {
            x: i32::try_from(x).unwrap_or(i32::MAX),
            y: i32::try_from(y).unwrap_or(i32::MAX),
        }
    }

    pub fn is_placed(&self) -> bool {
        self.x >= 0 && self.y >= 0
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::UNPLACED
    }
}

/// A placed sprite within a layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement<K = String> {
    /// User-specified key (e.g., filename or asset path).
    pub key: K,
    /// Placed rectangle within the sheet.
    pub frame: Rect,
}

/// Layout-level metadata (common fields used by exporters).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meta {
    /// Schema version for the JSON metadata formats; current: "1".
    pub schema_version: String,
    pub app: String,
    pub version: String,
    /// Name of the growth policy that produced the layout.
    pub policy: String,
    pub power_of_two: bool,
    pub maintain_aspect_ratio: bool,
    pub max_dim: (u32, u32),
}

/// Final sheet size plus every placed sprite, in sheet enumeration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout<K = String> {
    pub width: u32,
    pub height: u32,
    pub sprites: Vec<Placement<K>>,
    pub meta: Meta,
}

/// Statistics about sheet packing efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PackStats {
    pub num_sprites: usize,
    /// Sheet area (width * height).
    pub canvas_area: u64,
    /// Sum of sprite areas.
    pub used_area: u64,
    /// Occupancy ratio: used_area / canvas_area (0.0 to 1.0).
    /// Higher is better (less wasted space).
    pub occupancy: f64,
    pub width: u32,
    pub height: u32,
}

impl<K> Layout<K> {
    /// Computes packing statistics for this layout.
    pub fn stats(&self) -> PackStats {
        let canvas_area = (self.width as u64) * (self.height as u64);
        let used_area: u64 = self.sprites.iter().map(|s| s.frame.area()).sum();
        let occupancy = if canvas_area > 0 {
            used_area as f64 / canvas_area as f64
        } else {
            0.0
        };
        PackStats {
            num_sprites: self.sprites.len(),
            canvas_area,
            used_area,
            occupancy,
            width: self.width,
            height: self.height,
        }
    }
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Sheet: {}x{}, Sprites: {}, Occupancy: {:.2}%, Total Area: {} px², Used Area: {} px²",
            self.width,
            self.height,
            self.num_sprites,
            self.occupancy * 100.0,
            self.canvas_area,
            self.used_area,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.canvas_area.saturating_sub(self.used_area)
    }

    /// Returns wasted space as a percentage (0.0 to 100.0).
    pub fn waste_percentage(&self) -> f64 {
        if self.canvas_area > 0 {
            (self.wasted_area() as f64 / self.canvas_area as f64) * 100.0
        } else {
            0.0
        }
    }
}
