//! Geometric primitives: points, parabola intersections, circumcircles.

use crate::num::CheapOrderedFloat;

/// A two-dimensional point.
///
/// Points are sorted by `x` and then by `y`, for the convenience of our
/// sweep-line algorithm (which moves in increasing `x`).
#[derive(Clone, Copy, PartialEq, serde::Serialize)]
pub struct Point {
    /// Horizontal coordinate. The sweep line is vertical and visits larger
    /// `x` values later, so this is the algorithm's "time" axis.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (
            CheapOrderedFloat::from(self.x),
            CheapOrderedFloat::from(self.y),
        )
            .cmp(&(
                CheapOrderedFloat::from(other.x),
                CheapOrderedFloat::from(other.y),
            ))
    }
}

impl PartialOrd for Point {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for Point {}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        debug_assert!(x.is_finite());
        debug_assert!(y.is_finite());
        Point { x, y }
    }

    /// The midpoint of `self` and `other`.
    pub fn midpoint(&self, other: &Self) -> Self {
        Point {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<Point> for kurbo::Point {
    fn from(p: Point) -> Self {
        kurbo::Point::new(p.x, p.y)
    }
}

/// Is `l` strictly before `r` in the tolerant lexicographic order?
///
/// `l` comes first when `l.x + eps < r.x`, or when the `x` coordinates are
/// within `eps` of each other and `l.y + eps < r.y`. This is the ordering the
/// input contract requires of sites, and the same comparison orders vertices
/// by their touch coordinate.
pub(crate) fn lex_lt(l: &Point, r: &Point, eps: f64) -> bool {
    if l.x + eps < r.x {
        return true;
    }
    if r.x + eps < l.x {
        return false;
    }
    l.y + eps < r.y
}

/// Are `l` and `r` equal under the tolerant lexicographic order?
pub(crate) fn lex_eq(l: &Point, r: &Point, eps: f64) -> bool {
    !lex_lt(l, r, eps) && !lex_lt(r, l, eps)
}

/// The `y` coordinate at which the parabolas with foci `l` and `r` and
/// directrix `x = directrix` intersect.
///
/// Of the (up to) two intersections, this returns the one where `l`'s arc
/// lies below (smaller `y`) and `r`'s arc above; the breakpoint `(l, r)` on
/// the beach line is exactly that intersection. Callers must not pass two
/// foci that coincide within `eps`.
///
/// A focus that the directrix has not yet strictly passed (`f.x + eps >=
/// directrix`) has a degenerate parabola: the horizontal ray `y = f.y`
/// pointing away from the sweep. Those cases short-circuit before any
/// quadratic is solved.
pub(crate) fn breakpoint_y(l: &Point, r: &Point, directrix: f64, eps: f64) -> f64 {
    {
        let r_degenerate = !(r.x + eps < directrix);
        if !(l.x + eps < directrix) {
            if r_degenerate {
                // Both foci sit on the directrix; the breakpoint is the
                // midline between the two vertical-ray arcs.
                debug_assert!(l.y + eps < r.y);
                return (l.y + r.y) / 2.0;
            } else {
                return l.y;
            }
        } else if r_degenerate {
            return r.y;
        }
    }
    let mut ld = l.x - directrix;
    let mut rd = r.x - directrix;
    let lb = l.y / ld;
    let rb = r.y / rd;
    ld += ld;
    rd += rd;
    let dd = directrix * directrix;
    let lc = (l.x * l.x + l.y * l.y - dd) / ld;
    let rc = (r.x * r.x + r.y * r.y - dd) / rd;
    let b = rb - lb;
    let c = rc - lc;
    if (l.x + eps < r.x) || (r.x + eps < l.x) {
        let mut a = (ld - rd) / (ld * rd);
        a += a;
        let disc = b * b - (a + a) * c;
        debug_assert!(disc >= 0.0);
        (b + disc.sqrt()) / a
    } else {
        // The foci share an x coordinate, so the quadratic term vanishes and
        // the intersection is the solution of a linear equation.
        c / b
    }
}

/// A circumcircle: center and radius.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Circumcircle {
    /// The circumcenter.
    pub center: Point,
    /// The circumradius.
    pub radius: f64,
}

impl Circumcircle {
    /// The x coordinate at which the sweep line first touches this circle.
    pub fn touch(&self) -> f64 {
        self.center.x + self.radius
    }
}

/// The circumcircle of the triple `(a, b, c)`, where the triple is given in
/// beach-line order (increasing `y` of the arcs at the event).
///
/// Returns `None` when the triple is collinear within tolerance, or when it
/// turns the wrong way for the middle arc to ever be squeezed out -- in both
/// cases there is no circle event.
pub(crate) fn circumcircle(a: &Point, b: &Point, c: &Point, eps: f64) -> Option<Circumcircle> {
    let ab_x = b.x - a.x;
    let ab_y = b.y - a.y;
    let bc_x = c.x - b.x;
    let bc_y = c.y - b.y;
    let mut g = ab_y * bc_x - ab_x * bc_y;
    if !(eps * eps < g) {
        // 1.) g is negative: the middle site bulges toward the sweep line, so
        //     its arc grows rather than shrinks.
        // 2.) g is small: collinear sites, the bisectors never meet.
        return None;
    }
    let ac_x = c.x - a.x;
    let ac_y = c.y - a.y;
    let m = ab_x * (a.x + b.x) + ab_y * (a.y + b.y);
    let n = ac_x * (a.x + c.x) + ac_y * (a.y + c.y);
    g += g;
    let center = Point {
        x: (ab_y * n - ac_y * m) / g,
        y: (ac_x * m - ab_x * n) / g,
    };
    let radius = circumradius(
        ab_x.hypot(ab_y),
        bc_x.hypot(bc_y),
        ac_x.hypot(ac_y),
        eps,
    );
    Some(Circumcircle { center, radius })
}

/// The circumradius of a triangle with side lengths `a`, `b`, `c`.
///
/// `a * b * c / sqrt((a + b - c)(a + c - b)(b + c - a)(a + b + c))` is more
/// stable than measuring the distance from the computed center back to a
/// vertex.
fn circumradius(a: f64, b: f64, c: f64, eps: f64) -> f64 {
    let v = (a + b - c) * (a + c - b) * (b + c - a);
    // Triangle inequality; fails only if eps is far too small for the
    // coordinate scale of the input.
    debug_assert!(eps < v);
    (a * b * c) / (v * (a + b + c)).sqrt()
}
