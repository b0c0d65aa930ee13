//! Diagonal-fit family: tries the zone closest to the origin first and keeps the sheet at
//! power-of-two sizes.

use super::Axis;
use crate::config::{Constraints, round_up_power_of_two};
use crate::model::Rect;

/// Ascending by `x + y`.
pub fn sort_zones(zones: &mut [Rect]) {
    zones.sort_by_key(|z| z.x as u64 + z.y as u64);
}

/// Total for one dimension: unchanged when `need` fits in `current`, else rounded up to a power of two.
///
/// Rounds with `round_up_power_of_two`, so a need that already is a power of two is kept (8 stays
/// 8) instead of moving to the strictly greater one that `next_power_of_two` would return.
fn adjust(need: u32, current: u32) -> u32 {
    if need <= current {
        current
    } else {
        round_up_power_of_two(need)
    }
}

pub fn round_pow2(need: (u32, u32), canvas: (u32, u32)) -> (u32, u32) {
    (adjust(need.0, canvas.0), adjust(need.1, canvas.1))
}

/// Rounds the driving dimension to a power of two, then derives the other one from the aspect
/// ratio. The derived dimension is not rounded again; with power-of-two maxima the ratio is a
/// power of two as well, so it still comes out as one.
pub fn round_pow2_keep_aspect(
    need: (u32, u32),
    axis: Axis,
    canvas: (u32, u32),
    constraints: &Constraints,
) -> (u32, u32) {
    let (w_need, h_need) = need;
    match axis {
        Axis::Width => {
            let w = adjust(w_need.max(constraints.width_for_height(h_need)), canvas.0);
            (w, constraints.height_for_width(w))
        }
        Axis::Height => {
            let h = adjust(h_need.max(constraints.height_for_width(w_need)), canvas.1);
            (constraints.width_for_height(h), h)
        }
    }
}
