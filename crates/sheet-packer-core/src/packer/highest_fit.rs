//! Highest-fit family: tries the topmost, then leftmost, free zone first.

use super::Axis;
use crate::config::Constraints;
use crate::model::Rect;

/// Ascending by `(y, x)`.
pub fn sort_zones(zones: &mut [Rect]) {
    zones.sort_by_key(|z| (z.y, z.x));
}

/// Grows `need` until it matches the aspect ratio of `constraints`.
///
/// The driving dimension covers both its own need and what the other need implies through the
/// ratio; the paired dimension is then derived from it.
pub fn keep_aspect(need: (u32, u32), axis: Axis, constraints: &Constraints) -> (u32, u32) {
    let (w_need, h_need) = need;
    match axis {
        Axis::Width => {
            let w = w_need.max(constraints.width_for_height(h_need));
            (w, constraints.height_for_width(w))
        }
        Axis::Height => {
            let h = h_need.max(constraints.height_for_width(w_need));
            (constraints.width_for_height(h), h)
        }
    }
}
