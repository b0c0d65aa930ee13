//! Rectangle algebra used by the free-zone ledger.

use crate::model::Rect;

/// True if `b` lies fully inside `a`.
pub fn contains(a: &Rect, b: &Rect) -> bool {
    b.x >= a.x && b.y >= a.y && b.right() <= a.right() && b.bottom() <= a.bottom()
}

/// True if `a` and `b` share interior area. Rectangles that only touch along an edge do not intersect.
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    !(a.x >= b.right() || b.x >= a.right() || a.y >= b.bottom() || b.y >= a.bottom())
}

pub fn intersection(a: &Rect, b: &Rect) -> Option<Rect> {
    if !intersects(a, b) {
        return None;
    }
    let x1 = a.x.max(b.x);
    let y1 = a.y.max(b.y);
    let x2 = a.right().min(b.right());
    let y2 = a.bottom().min(b.bottom());
    Some(Rect::new(x1, y1, x2 - x1, y2 - y1))
}

/// Removes the area of `subtrahend` from `minuend`.
///
/// The remainder is returned as up to four maximal strips (left, right, above, below the
/// overlap). Left/right strips span the full height of `minuend` and above/below strips its full
/// width, so the strips overlap each other at the corners.
pub fn subtract(minuend: &Rect, subtrahend: &Rect) -> Vec<Rect> {
    let Some(overlap) = intersection(minuend, subtrahend) else {
        return vec![*minuend];
    };
    if contains(subtrahend, minuend) {
        return Vec::new();
    }

    let m_x2 = minuend.right();
    let m_y2 = minuend.bottom();
    let o_x2 = overlap.right();
    let o_y2 = overlap.bottom();

    let mut out = Vec::with_capacity(4);
    // left
    if overlap.x > minuend.x {
        out.push(Rect::new(minuend.x, minuend.y, overlap.x - minuend.x, minuend.h));
    }
    // right
    if o_x2 < m_x2 {
        out.push(Rect::new(o_x2, minuend.y, m_x2 - o_x2, minuend.h));
    }
    // above
    if overlap.y > minuend.y {
        out.push(Rect::new(minuend.x, minuend.y, minuend.w, overlap.y - minuend.y));
    }
    // below
    if o_y2 < m_y2 {
        out.push(Rect::new(minuend.x, o_y2, minuend.w, m_y2 - o_y2));
    }
    out
}
