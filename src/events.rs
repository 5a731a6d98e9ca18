//! The circle event queue.
//!
//! Events are keyed by the sweep coordinate at which they fire: the touch
//! coordinate of their circumcircle, then the center's `y`. The map keys use
//! exact float ordering; the tolerance enters only through the explicit
//! predicates ([`EventQueue::firing_order`] and [`EventQueue::fires_before_site`]),
//! never through the container's `Ord`.

use std::collections::BTreeMap;

use crate::beach::Beach;
use crate::diagram::{Builder, VertexIdx};
use crate::geom::{circumcircle, lex_lt, Circumcircle, Point};
use crate::num::CheapOrderedFloat;
use crate::sites::{SiteIdx, Sites};

/// The key a pending event is queued under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct EventKey {
    touch: CheapOrderedFloat,
    y: CheapOrderedFloat,
    vertex: VertexIdx,
}

impl EventKey {
    fn new(vertex: VertexIdx, circle: &Circumcircle) -> Self {
        Self {
            touch: circle.touch().into(),
            y: circle.center.y.into(),
            vertex,
        }
    }
}

/// A pending circle event.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Pending {
    /// The site triple whose collapsing arcs produced this event.
    ///
    /// Only a debugging aid once `duplicated` is set: the event then stands
    /// for several triples that collapse onto the same vertex, and the
    /// firing logic finds the full breakpoint range by searching the beach.
    pub sites: (SiteIdx, SiteIdx, SiteIdx),
    /// Set when a second triple produced the same vertex.
    pub duplicated: bool,
}

/// Lexicographic comparison of two `(major, minor)` coordinate pairs; the
/// callers bake the tolerance into the left operand.
fn before(l: (f64, f64), r: (f64, f64)) -> bool {
    if l.0 < r.0 {
        true
    } else if r.0 < l.0 {
        false
    } else {
        l.1 < r.1
    }
}

/// The queue of pending circle events, cross-linked with the beach line.
///
/// The queue owns the event records; the breakpoints' `event` fields point
/// back at the vertices queued here. At any moment the vertices in the live
/// set of the output builder are exactly the pending vertices here plus the
/// vertices already committed as edge endpoints.
#[derive(Clone, Debug, Default)]
pub(crate) struct EventQueue {
    events: BTreeMap<EventKey, Pending>,
}

impl EventQueue {
    pub(crate) fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The vertex of the earliest pending event.
    pub(crate) fn peek(&self) -> Option<VertexIdx> {
        self.events.first_key_value().map(|(k, _)| k.vertex)
    }

    /// Removes and returns the earliest pending event.
    pub(crate) fn pop(&mut self) -> Option<(VertexIdx, Pending)> {
        self.events.pop_first().map(|(k, p)| (k.vertex, p))
    }

    /// Does an event at `l` fire strictly before one at `r`, under the
    /// tolerance?
    pub(crate) fn firing_order(l: &Circumcircle, r: &Circumcircle, eps: f64) -> bool {
        before(
            (l.touch() + eps, l.center.y + eps),
            (r.touch(), r.center.y),
        )
    }

    /// Does an event at `circle` fire strictly before the site event at `p`?
    ///
    /// This is the tolerant lexicographic order on `(touch, y)` versus
    /// `(x, y)` -- the same comparison that orders sites orders events
    /// against them.
    pub(crate) fn fires_before_site(circle: &Circumcircle, p: &Point, eps: f64) -> bool {
        let touch_point = Point {
            x: circle.touch(),
            y: circle.center.y,
        };
        lex_lt(&touch_point, p, eps)
    }

    /// Considers a circle event for the adjacent breakpoint pair at
    /// `(l_pos, l_pos + 1)`.
    ///
    /// If the pair's site triple admits a circumcircle to the right of the
    /// sweep, a vertex is allocated (or an existing coincident one reused)
    /// and the event queued, unless one of the two breakpoints already has a
    /// pending event that fires no later -- in that case the earlier event
    /// wins and the other is dropped along with its vertex.
    pub(crate) fn check_event(
        &mut self,
        l_pos: usize,
        beach: &mut Beach,
        out: &mut Builder,
        sites: &Sites,
        eps: f64,
    ) -> Option<VertexIdx> {
        let r_pos = l_pos + 1;
        let (a, b, c, l_event, r_event) = {
            let l = beach.get(l_pos);
            let r = beach.get(r_pos);
            debug_assert_eq!(l.right, r.left);
            (l.left, l.right, r.right, l.event, r.event)
        };
        let circle = circumcircle(&sites[a], &sites[b], &sites[c], eps)?;
        let (v, fresh) = out.insert_vertex(circle, eps);

        // A breakpoint belongs to at most one pending event, and this pair
        // was just created, so at most one side can be linked already.
        debug_assert!(l_event.is_none() || r_event.is_none());
        if let Some(old) = l_event.or(r_event) {
            if old != v && Self::firing_order(&circle, out.vertex(old), eps) {
                self.delete_event(old, beach, out, sites, eps);
            } else {
                // The pending event fires first (or is this very vertex,
                // re-discovered from another triple); keep it.
                if fresh {
                    out.discard_vertex(v);
                }
                return None;
            }
        }

        beach.get_mut(l_pos).event = Some(v);
        beach.get_mut(r_pos).event = Some(v);
        match self.events.entry(EventKey::new(v, &circle)) {
            std::collections::btree_map::Entry::Occupied(mut entry) => {
                entry.get_mut().duplicated = true;
            }
            std::collections::btree_map::Entry::Vacant(entry) => {
                entry.insert(Pending {
                    sites: (a, b, c),
                    duplicated: false,
                });
            }
        }
        Some(v)
    }

    /// Invalidates the pending event at vertex `v`: unlinks every breakpoint
    /// in its range, removes the queue entry, and discards the vertex.
    ///
    /// Returns the breakpoint range that was unlinked, so that callers that
    /// are about to restructure the beach can re-examine the surviving
    /// adjacencies.
    pub(crate) fn delete_event(
        &mut self,
        v: VertexIdx,
        beach: &mut Beach,
        out: &mut Builder,
        sites: &Sites,
        eps: f64,
    ) -> (usize, usize) {
        let circle = *out.vertex(v);
        let (first, last) = beach.range_of_vertex(&circle, sites, eps);
        for pos in first..last {
            let bp = beach.get_mut(pos);
            if bp.event == Some(v) {
                bp.event = None;
            }
        }
        let removed = self.events.remove(&EventKey::new(v, &circle));
        debug_assert!(removed.is_some());
        out.discard_vertex(v);
        (first, last)
    }
}
