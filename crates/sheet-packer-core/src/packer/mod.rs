use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::Constraints;
use crate::error::{Result, SheetPackerError};
use crate::model::Rect;

pub mod diagonal_fit;
pub mod highest_fit;
pub mod ledger;
pub mod sheet_packer;

pub use ledger::ZoneLedger;
pub use sheet_packer::SheetPacker;

/// Growth and zone-ordering policy.
///
/// The policies share one placement loop (`SheetPacker`) and differ only in two hooks:
/// the order in which free zones are tried (`sort_zones`) and how the canvas grows when no zone
/// fits (`expand_by`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GrowthPolicy {
    /// Topmost-then-leftmost zone first; grows by the exact amount needed.
    HighestFit,
    /// Highest-fit ordering; growth keeps the configured aspect ratio.
    HighestFitAspect,
    /// Zone closest to the origin first; sheet dimensions stay powers of two.
    DiagonalFitPow2,
    /// Diagonal ordering; power-of-two rounding of the driving side, the other side follows the aspect ratio.
    DiagonalFitAspectPow2,
}

/// Dimension that drives a growth proposal; the other one may be derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

impl GrowthPolicy {
    /// Maps the two constraint flags onto a policy.
    pub fn for_constraints(constraints: &Constraints) -> Self {
        match (
            constraints.maintain_aspect_ratio(),
            constraints.power_of_two(),
        ) {
            (true, true) => GrowthPolicy::DiagonalFitAspectPow2,
            (true, false) => GrowthPolicy::HighestFitAspect,
            (false, true) => GrowthPolicy::DiagonalFitPow2,
            (false, false) => GrowthPolicy::HighestFit,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GrowthPolicy::HighestFit => "highest-fit",
            GrowthPolicy::HighestFitAspect => "highest-fit+aspect",
            GrowthPolicy::DiagonalFitPow2 => "diagonal-fit+pow2",
            GrowthPolicy::DiagonalFitAspectPow2 => "diagonal-fit+aspect+pow2",
        }
    }

    /// Reorders free zones in place (stable).
    pub fn sort_zones(&self, zones: &mut [Rect]) {
        match self {
            GrowthPolicy::HighestFit | GrowthPolicy::HighestFitAspect => {
                highest_fit::sort_zones(zones)
            }
            GrowthPolicy::DiagonalFitPow2 | GrowthPolicy::DiagonalFitAspectPow2 => {
                diagonal_fit::sort_zones(zones)
            }
        }
    }

    /// Turns the totals a sprite needs into the totals this policy grows the canvas to.
    fn resolve(
        &self,
        need: (u32, u32),
        axis: Axis,
        canvas: (u32, u32),
        constraints: &Constraints,
    ) -> (u32, u32) {
        match self {
            GrowthPolicy::HighestFit => need,
            GrowthPolicy::HighestFitAspect => highest_fit::keep_aspect(need, axis, constraints),
            GrowthPolicy::DiagonalFitPow2 => diagonal_fit::round_pow2(need, canvas),
            GrowthPolicy::DiagonalFitAspectPow2 => {
                diagonal_fit::round_pow2_keep_aspect(need, axis, canvas, constraints)
            }
        }
    }

    /// Computes `(dw, dh)` so that `sprite` fits after the canvas grows by that much.
    ///
    /// Zones are scanned in ledger order. A zone on the east border that is tall enough proposes
    /// widening, a zone on the south border that is wide enough proposes heightening, and a zone
    /// on both borders proposes both. The first proposal within the maximum size wins. Without
    /// one, the currently smaller side grows by the sprite (a new east column when the width is
    /// smaller or equal, a new south row otherwise); if that exceeds the maximum the sprite does
    /// not fit.
    pub fn expand_by(
        &self,
        canvas: (u32, u32),
        zones: &[Rect],
        constraints: &Constraints,
        sprite: &Rect,
    ) -> Result<(u32, u32)> {
        let (cw, ch) = canvas;
        let (max_w, max_h) = constraints.max_size();
        let within = |(w, h): (u32, u32)| w <= max_w && h <= max_h;
        let delta = |(w, h): (u32, u32)| (w.saturating_sub(cw), h.saturating_sub(ch));

        for zone in zones {
            let east = zone.right() == cw;
            let south = zone.bottom() == ch;
            let dw = sprite.w.saturating_sub(zone.w);
            let dh = sprite.h.saturating_sub(zone.h);

            if east && zone.h >= sprite.h {
                let grown = self.resolve((cw.saturating_add(dw), ch), Axis::Width, canvas, constraints);
                if within(grown) {
                    trace!(?zone, ?grown, "widen east zone");
                    return Ok(delta(grown));
                }
            }
            if south && zone.w >= sprite.w {
                let grown = self.resolve((cw, ch.saturating_add(dh)), Axis::Height, canvas, constraints);
                if within(grown) {
                    trace!(?zone, ?grown, "heighten south zone");
                    return Ok(delta(grown));
                }
            }
            if east && south {
                let need = (cw.saturating_add(dw), ch.saturating_add(dh));
                let grown = self.resolve(need, Axis::Width, canvas, constraints);
                if within(grown) {
                    trace!(?zone, ?grown, "grow corner zone");
                    return Ok(delta(grown));
                }
            }
        }

        // The smaller side grows; ties grow the width.
        let (need, axis) = if ch < cw {
            ((cw.max(sprite.w), ch.saturating_add(sprite.h)), Axis::Height)
        } else {
            ((cw.saturating_add(sprite.w), ch.max(sprite.h)), Axis::Width)
        };
        let grown = self.resolve(need, axis, canvas, constraints);
        if within(grown) {
            trace!(?grown, ?axis, "grow new column/row");
            return Ok(delta(grown));
        }
        Err(SheetPackerError::SizeTooSmall {
            width: sprite.w,
            height: sprite.h,
            max_width: max_w,
            max_height: max_h,
        })
    }
}

impl fmt::Display for GrowthPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_maps_flags() {
        let c = |pow2, aspect| Constraints::new(64, 32, pow2, aspect).unwrap();
        assert_eq!(
            GrowthPolicy::for_constraints(&c(true, true)),
            GrowthPolicy::DiagonalFitAspectPow2
        );
        assert_eq!(
            GrowthPolicy::for_constraints(&c(false, true)),
            GrowthPolicy::HighestFitAspect
        );
        assert_eq!(
            GrowthPolicy::for_constraints(&c(true, false)),
            GrowthPolicy::DiagonalFitPow2
        );
        assert_eq!(
            GrowthPolicy::for_constraints(&c(false, false)),
            GrowthPolicy::HighestFit
        );
    }

    #[test]
    fn empty_canvas_grows_to_sprite() {
        let c = Constraints::default();
        let d = GrowthPolicy::HighestFit
            .expand_by((0, 0), &[], &c, &Rect::new(0, 0, 5, 7))
            .unwrap();
        assert_eq!(d, (5, 7));
    }

    #[test]
    fn fallback_ties_grow_width() {
        let c = Constraints::default();
        // 5x5 canvas, no zones: a 3x4 sprite gets a new east column.
        let d = GrowthPolicy::HighestFit
            .expand_by((5, 5), &[], &c, &Rect::new(0, 0, 3, 4))
            .unwrap();
        assert_eq!(d, (3, 0));
    }

    #[test]
    fn fallback_grows_smaller_side() {
        let c = Constraints::default();
        let tall = GrowthPolicy::HighestFit
            .expand_by((5, 20), &[], &c, &Rect::new(0, 0, 5, 1))
            .unwrap();
        assert_eq!(tall, (5, 0));
        let wide = GrowthPolicy::HighestFit
            .expand_by((20, 5), &[], &c, &Rect::new(0, 0, 1, 5))
            .unwrap();
        assert_eq!(wide, (0, 5));
        let pow2 = Constraints::builder().pow2(true).build().unwrap();
        let wide = GrowthPolicy::DiagonalFitPow2
            .expand_by((16, 4), &[], &pow2, &Rect::new(0, 0, 1, 4))
            .unwrap();
        assert_eq!(wide, (0, 4));
    }

    #[test]
    fn fallback_fails_when_smaller_side_exceeds_max() {
        let c = Constraints::new(100, 8, false, false).unwrap();
        // Height is the smaller side and 5 + 4 rows exceed 8, although widening would fit.
        let err = GrowthPolicy::HighestFit
            .expand_by((20, 5), &[], &c, &Rect::new(0, 0, 20, 4))
            .unwrap_err();
        assert!(matches!(
            err,
            SheetPackerError::SizeTooSmall {
                width: 20,
                height: 4,
                max_width: 100,
                max_height: 8
            }
        ));
    }

    #[test]
    fn east_zone_is_widened_by_missing_columns() {
        let c = Constraints::default();
        let zones = [Rect::new(4, 6, 2, 2)];
        let d = GrowthPolicy::HighestFit
            .expand_by((6, 8), &zones, &c, &Rect::new(0, 0, 3, 2))
            .unwrap();
        assert_eq!(d, (1, 0));
    }

    #[test]
    fn too_large_sprite_is_rejected() {
        let c = Constraints::new(2, 2, false, false).unwrap();
        let err = GrowthPolicy::HighestFit
            .expand_by((0, 0), &[], &c, &Rect::new(0, 0, 3, 4))
            .unwrap_err();
        assert!(matches!(
            err,
            SheetPackerError::SizeTooSmall {
                width: 3,
                height: 4,
                max_width: 2,
                max_height: 2
            }
        ));
    }
}
