use tracing::{debug, instrument, trace, warn};

use super::{GrowthPolicy, ZoneLedger};
use crate::config::Constraints;
use crate::error::{Result, SheetPackerError};
use crate::model::{Position, Rect};
use crate::sheet::{Sprite, SpriteSheet};

/// Widest-first greedy packer over a growing canvas.
///
/// The packer keeps its canvas size and free-zone ledger between calls, so one instance must not
/// be shared by concurrent `pack` calls; every call starts from an empty `0x0` canvas.
#[derive(Debug, Clone)]
pub struct SheetPacker {
    policy: GrowthPolicy,
    constraints: Constraints,
    size: (u32, u32),
    ledger: ZoneLedger,
}

impl SheetPacker {
    pub fn new(policy: GrowthPolicy) -> Self {
        Self {
            policy,
            constraints: Constraints::default(),
            size: (0, 0),
            ledger: ZoneLedger::new(),
        }
    }

    /// Packer with the policy selected by the constraint flags.
    pub fn for_constraints(constraints: &Constraints) -> Self {
        Self::new(GrowthPolicy::for_constraints(constraints))
    }

    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Canvas size of the last (or current) run.
    pub fn canvas_size(&self) -> (u32, u32) {
        self.size
    }

    /// Free zones left by the last run, in ledger order.
    pub fn zones(&self) -> &[Rect] {
        self.ledger.zones()
    }

    /// Places every sprite of `sheet` and commits the final canvas size.
    ///
    /// Sprites are placed widest first (stable for equal widths). On error, sprites placed so far
    /// keep their new positions and the sheet size is left untouched.
    #[instrument(skip_all, fields(policy = %self.policy))]
    pub fn pack<S: SpriteSheet + ?Sized>(
        &mut self,
        sheet: &mut S,
        constraints: &Constraints,
    ) -> Result<()> {
        let (width, height) = {
            let mut sprites = sheet.sprites_mut();
            if sprites.is_empty() {
                debug!("no sprites to pack");
                return Ok(());
            }

            let mut order: Vec<(usize, Rect)> = Vec::with_capacity(sprites.len());
            for (idx, sprite) in sprites.iter().enumerate() {
                let (w, h) = sprite.size()?;
                order.push((idx, Rect::new(0, 0, w, h)));
            }
            order.sort_by(|a, b| b.1.w.cmp(&a.1.w));

            self.reset(constraints);
            for (idx, rect) in order {
                let corner = self.place(&rect)?;
                sprites[idx].set_position(Position::from_corner(corner));
            }
            self.size
        };

        debug!(width, height, "sheet packed");
        sheet.set_size(width, height);
        Ok(())
    }

    fn reset(&mut self, constraints: &Constraints) {
        self.size = (0, 0);
        self.ledger.clear();
        self.constraints = constraints.clone();
    }

    fn place(&mut self, sprite: &Rect) -> Result<(u32, u32)> {
        if let Some(corner) = self.ledger.find_fit(sprite.w, sprite.h) {
            self.occupy(sprite, corner);
            return Ok(corner);
        }

        let (dw, dh) =
            self.policy
                .expand_by(self.size, self.ledger.zones(), &self.constraints, sprite)?;
        let old = self.size;
        self.size = (old.0 + dw, old.1 + dh);
        self.ledger.expand(old, (dw, dh));
        trace!(?old, new = ?self.size, "canvas grown");

        match self.ledger.find_fit(sprite.w, sprite.h) {
            Some(corner) => {
                self.occupy(sprite, corner);
                Ok(corner)
            }
            None => {
                warn!(
                    policy = %self.policy,
                    w = sprite.w,
                    h = sprite.h,
                    "sprite does not fit after growing the canvas"
                );
                let (max_width, max_height) = self.constraints.max_size();
                Err(SheetPackerError::SizeTooSmall {
                    width: sprite.w,
                    height: sprite.h,
                    max_width,
                    max_height,
                })
            }
        }
    }

    fn occupy(&mut self, sprite: &Rect, (x, y): (u32, u32)) {
        let placed = Rect::new(x, y, sprite.w, sprite.h);
        trace!(?placed, "sprite placed");
        self.ledger.recalculate(&placed, self.policy);
    }
}
