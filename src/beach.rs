//! The beach line: the left-to-right sequence of breakpoints between
//! adjacent parabolic arcs.

use crate::diagram::{EdgeIdx, VertexIdx};
use crate::geom::{breakpoint_y, Circumcircle, Point};
use crate::sites::{SiteIdx, Sites};
use crate::treevec::TreeVec;

/// A breakpoint between two adjacent arcs.
///
/// The arc below belongs to `left`, the arc above to `right`. As the sweep
/// advances the breakpoint traces out `edge`. A breakpoint never has its
/// sites rewritten in place: circle and site events insert replacement
/// breakpoints and remove old ones, which is what keeps the stored order
/// valid without ever re-comparing stored entries.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Breakpoint {
    pub left: SiteIdx,
    pub right: SiteIdx,
    /// The edge this breakpoint is tracing.
    pub edge: EdgeIdx,
    /// The vertex of the pending circle event this breakpoint is part of.
    pub event: Option<VertexIdx>,
}

/// The beach line.
///
/// Breakpoints are kept in increasing order of their current `y` coordinate.
/// The order is maintained positionally: every mutation computes its target
/// position with one of the probe searches below, so no two stored
/// breakpoints are ever compared with each other. (The original formulation
/// as a comparator needs a transient hint to break ties between a freshly
/// split pair; computing the position once and inserting the pair at
/// consecutive indices is that hint, made explicit.)
#[derive(Clone, Debug, Default)]
pub(crate) struct Beach {
    bps: TreeVec<Breakpoint, 64>,
}

impl Beach {
    pub(crate) fn len(&self) -> usize {
        self.bps.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.bps.is_empty()
    }

    pub(crate) fn get(&self, idx: usize) -> &Breakpoint {
        &self.bps[idx]
    }

    pub(crate) fn get_mut(&mut self, idx: usize) -> &mut Breakpoint {
        &mut self.bps[idx]
    }

    /// The bottom-most breakpoint.
    pub(crate) fn first(&self) -> Option<&Breakpoint> {
        self.bps.first()
    }

    pub(crate) fn insert(&mut self, idx: usize, bp: Breakpoint) {
        self.bps.insert(idx, bp);
    }

    pub(crate) fn remove(&mut self, idx: usize) {
        self.bps.remove(idx);
    }

    /// Calls `f` on every breakpoint with position in `range`, bottom to top.
    pub(crate) fn for_each_in(
        &self,
        range: std::ops::Range<usize>,
        f: impl FnMut(&Breakpoint),
    ) {
        self.bps.for_each_in(range, f);
    }

    /// The current `y` coordinate of a breakpoint, for a sweep line at
    /// `directrix`.
    fn intersect(&self, bp: &Breakpoint, sites: &Sites, directrix: f64, eps: f64) -> f64 {
        breakpoint_y(&sites[bp.left], &sites[bp.right], directrix, eps)
    }

    /// The range of breakpoints that probe equal to a new site: which arc
    /// sits above it, and whether it lands exactly on one or two existing
    /// breakpoints.
    ///
    /// An empty range at position `i` means the site falls strictly inside
    /// the arc between breakpoints `i - 1` and `i` (or an outermost arc).
    pub(crate) fn locate_site(&self, p: &Point, sites: &Sites, eps: f64) -> (usize, usize) {
        self.equal_range(p.x, p.y, sites, eps)
    }

    /// The range of breakpoints collapsing onto a circle event's vertex:
    /// every breakpoint whose intersection at the circle's touch coordinate
    /// coincides with the center's `y` -- more than two of them when four or
    /// more sites are co-circular.
    pub(crate) fn range_of_vertex(
        &self,
        circle: &Circumcircle,
        sites: &Sites,
        eps: f64,
    ) -> (usize, usize) {
        self.equal_range(circle.touch(), circle.center.y, sites, eps)
    }

    /// The shared probe behind both typed searches: breakpoints strictly
    /// below the point `(x, y)` (evaluated with the sweep line at `x`) come
    /// before the range, breakpoints strictly above come after.
    fn equal_range(&self, x: f64, y: f64, sites: &Sites, eps: f64) -> (usize, usize) {
        let lo = self
            .bps
            .partition_point(|bp| self.intersect(bp, sites, x, eps) + eps < y);
        let hi = self
            .bps
            .partition_point(|bp| !(y + eps < self.intersect(bp, sites, x, eps)));
        debug_assert!(lo <= hi);
        (lo, hi)
    }
}
