//! The sweep driver: dispatches site and circle events in order.

use crate::beach::{Beach, Breakpoint};
use crate::diagram::{Builder, Diagram};
use crate::events::EventQueue;
use crate::sites::{SiteIdx, Sites};

/// Encapsulates the state of a sweep over a set of sites.
///
/// Most callers want [`voronoi`](crate::voronoi), which validates its input
/// and then runs one of these to completion.
#[derive(Clone, Debug)]
pub struct Sweeper {
    sites: Sites,
    eps: f64,
    beach: Beach,
    events: EventQueue,
    out: Builder,
}

impl Sweeper {
    /// Creates a sweeper over a site arena.
    ///
    /// The sites must already be sorted (and de-duplicated) under the
    /// tolerant lexicographic order; this is debug-asserted only.
    pub fn new(sites: Sites, eps: f64) -> Self {
        debug_assert!(sites.is_sorted(eps));
        let out = Builder::new(sites.len());
        Sweeper {
            sites,
            eps,
            beach: Beach::default(),
            events: EventQueue::default(),
            out,
        }
    }

    /// Runs the sweep to completion and returns the diagram.
    ///
    /// Sites are consumed in order; before each one, every circle event whose
    /// touch coordinate comes strictly first is fired. When the input is
    /// exhausted the remaining events are drained. Edges that still have an
    /// unbound endpoint at that point are the unbounded edges of the diagram.
    pub fn run(mut self) -> Diagram {
        for i in 0..self.sites.len() {
            let s = SiteIdx(i);
            let p = self.sites[s];
            while let Some(v) = self.events.peek() {
                if !EventQueue::fires_before_site(self.out.vertex(v), &p, self.eps) {
                    break;
                }
                self.finalize_event();
                self.check_invariants();
            }
            self.insert_arc(s);
            self.check_invariants();
        }
        while !self.events.is_empty() {
            self.finalize_event();
            self.check_invariants();
        }
        Diagram::new(self.sites, self.out)
    }

    /// Handles the site event for `s`: splits the arc above the new site and
    /// re-schedules circle events around the split.
    fn insert_arc(&mut self, s: SiteIdx) {
        if s.0 == 0 {
            // The first site's arc is the whole beach; there is no breakpoint
            // to record until a second arc shows up.
            debug_assert!(self.beach.is_empty());
            return;
        }
        let p = self.sites[s];
        let (lo, hi) = self.beach.locate_site(&p, &self.sites, self.eps);
        // A site probing equal to one or two existing breakpoints splits the
        // arc just above them, so the insertion position is the upper end of
        // the range either way.
        debug_assert!(hi - lo <= 2);
        let pos = hi;
        let owner = if pos > 0 {
            self.beach.get(pos - 1).right
        } else if let Some(bottom) = self.beach.first() {
            bottom.left
        } else {
            // Only the first site has been processed.
            SiteIdx(0)
        };

        // Splitting an arc that is the middle of a pending collapse makes
        // that event's triple non-adjacent; drop the event before touching
        // the beach.
        let mut unlinked = None;
        if pos > 0 && pos < self.beach.len() {
            let l_event = self.beach.get(pos - 1).event;
            let r_event = self.beach.get(pos).event;
            if let (Some(v), true) = (l_event, l_event == r_event) {
                unlinked = Some(self.events.delete_event(
                    v,
                    &mut self.beach,
                    &mut self.out,
                    &self.sites,
                    self.eps,
                ));
            }
        }

        let edge = self.out.new_edge(owner, s, None);
        let owner_reached = !(self.sites[owner].x + self.eps < p.x);
        let inserted = if owner_reached {
            // The owner sits on the directrix too (same x within tolerance),
            // so both arcs are degenerate rays and a single breakpoint
            // separates them.
            debug_assert!(self.sites[owner].y + self.eps < p.y);
            self.beach.insert(
                pos,
                Breakpoint {
                    left: owner,
                    right: s,
                    edge,
                    event: None,
                },
            );
            1
        } else {
            // Split the owner's arc into a lower and an upper copy with the
            // new arc pinched between them. Both breakpoints trace the same
            // new edge, one end each.
            self.beach.insert(
                pos,
                Breakpoint {
                    left: owner,
                    right: s,
                    edge,
                    event: None,
                },
            );
            self.beach.insert(
                pos + 1,
                Breakpoint {
                    left: s,
                    right: owner,
                    edge,
                    event: None,
                },
            );
            2
        };

        if pos > 0 {
            self.check_event(pos - 1);
        }
        let upper = pos + inserted - 1;
        if upper + 1 < self.beach.len() {
            self.check_event(upper);
        }

        // Adjacent pairs that lost their event to the split (a range wider
        // than the split pair happens when co-circular triples shared one
        // vertex) get another look.
        if let Some((first, last)) = unlinked {
            for i in first..last.saturating_sub(1) {
                if i + 1 < pos {
                    self.check_event(i);
                } else if i >= pos {
                    self.check_event(i + inserted);
                }
            }
        }
    }

    /// Fires the earliest pending circle event: commits its vertex, closes
    /// the edges of every breakpoint collapsing onto it, and replaces the
    /// collapsed range with the single breakpoint between the surviving
    /// neighbour arcs.
    fn finalize_event(&mut self) {
        let Some((v, pending)) = self.events.pop() else {
            return;
        };
        let circle = *self.out.vertex(v);
        let (first, last) = self.beach.range_of_vertex(&circle, &self.sites, self.eps);
        debug_assert!(last - first >= 2);
        // A range wider than two happens with co-circular sites, whether or
        // not the event was flagged as duplicated; the recorded triple only
        // pins down the range when it is exactly the one pair.
        if !pending.duplicated && last - first == 2 {
            debug_assert_eq!(self.beach.get(first).left, pending.sites.0);
            debug_assert_eq!(self.beach.get(first).right, pending.sites.1);
            debug_assert_eq!(self.beach.get(first + 1).right, pending.sites.2);
        }

        let lc = self.beach.get(first).left;
        let rc = self.beach.get(last - 1).right;
        let mut edges = Vec::with_capacity(last - first);
        self.beach.for_each_in(first..last, |bp| {
            debug_assert!(bp.event.is_none() || bp.event == Some(v));
            edges.push(bp.edge);
        });
        for edge in edges {
            self.out.truncate(edge, v, &self.sites);
        }
        for _ in first..last {
            self.beach.remove(first);
        }

        let edge = self.out.new_edge(lc, rc, Some(v));
        self.beach.insert(
            first,
            Breakpoint {
                left: lc,
                right: rc,
                edge,
                event: None,
            },
        );

        if first > 0 {
            self.check_event(first - 1);
        }
        if first + 1 < self.beach.len() {
            self.check_event(first);
        }
    }

    fn check_event(&mut self, l_pos: usize) {
        self.events.check_event(
            l_pos,
            &mut self.beach,
            &mut self.out,
            &self.sites,
            self.eps,
        );
    }

    /// In debug builds, walk the beach and check that adjacent breakpoints
    /// agree on the arc between them and that event links come in ranges.
    fn check_invariants(&self) {
        #[cfg(debug_assertions)]
        {
            for i in 0..self.beach.len().saturating_sub(1) {
                let l = self.beach.get(i);
                let r = self.beach.get(i + 1);
                debug_assert_eq!(l.right, r.left);
            }
            for i in 0..self.beach.len() {
                let bp = self.beach.get(i);
                if let Some(v) = bp.event {
                    // Another breakpoint shares this pending event.
                    let neighbours = [i.checked_sub(1), Some(i + 1)];
                    let linked = neighbours
                        .iter()
                        .flatten()
                        .filter_map(|&j| (j < self.beach.len()).then(|| self.beach.get(j)))
                        .any(|other| other.event == Some(v));
                    debug_assert!(linked);
                }
            }
        }
    }
}
