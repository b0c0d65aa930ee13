use super::GrowthPolicy;
use crate::geometry::subtract;
use crate::model::Rect;

/// Free zones of the canvas.
///
/// Zones may overlap each other but, right after `recalculate`, no zone lies inside another.
#[derive(Debug, Clone, Default)]
pub struct ZoneLedger {
    zones: Vec<Rect>,
}

impl ZoneLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zones(&self) -> &[Rect] {
        &self.zones
    }

    pub fn clear(&mut self) {
        self.zones.clear();
    }

    /// Top-left corner of the first zone (in ledger order) that can hold a `w x h` sprite.
    pub fn find_fit(&self, w: u32, h: u32) -> Option<(u32, u32)> {
        self.zones
            .iter()
            .find(|z| z.w >= w && z.h >= h)
            .map(|z| (z.x, z.y))
    }

    /// Removes `occupied` from every zone, drops fragments covered by another fragment and
    /// reorders what is left with the policy's zone order.
    pub fn recalculate(&mut self, occupied: &Rect, policy: GrowthPolicy) {
        let mut fragments: Vec<Rect> = Vec::with_capacity(self.zones.len() * 2);
        for zone in &self.zones {
            fragments.extend(subtract(zone, occupied));
        }
        prune_contained(&mut fragments);
        policy.sort_zones(&mut fragments);
        self.zones = fragments;
    }

    /// Grows the ledger along with the canvas.
    ///
    /// Zones touching the old east border gain `dw` columns, zones touching the old south border
    /// gain `dh` rows, and the freshly exposed east and south strips are appended (in that order).
    /// The list is neither pruned nor re-sorted; the next `recalculate` does that.
    pub fn expand(&mut self, old: (u32, u32), delta: (u32, u32)) {
        let (old_w, old_h) = old;
        let (dw, dh) = delta;
        let new_w = old_w.saturating_add(dw);
        let new_h = old_h.saturating_add(dh);

        let mut grown: Vec<Rect> = Vec::with_capacity(self.zones.len() + 2);
        for zone in &self.zones {
            let mut z = *zone;
            if dw > 0 && z.right() == old_w {
                z.w += dw;
            }
            if dh > 0 && z.bottom() == old_h {
                z.h += dh;
            }
            grown.push(z);
        }
        if dw > 0 {
            grown.push(Rect::new(old_w, 0, dw, new_h));
        }
        if dh > 0 {
            grown.push(Rect::new(0, old_h, new_w, dh));
        }
        self.zones = grown;
    }
}

/// Stable-sorts by area ascending and drops every rect contained in a later (equal or larger) one.
fn prune_contained(v: &mut Vec<Rect>) {
    v.sort_by_key(Rect::area);
    let mut i = 0;
    while i < v.len() {
        let a = v[i];
        if v[i + 1..].iter().any(|b| b.contains(&a)) {
            v.remove(i);
        } else {
            i += 1;
        }
    }
}
