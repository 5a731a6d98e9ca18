//! End-to-end scenarios and structural invariants of the diagrams.

use beachline::{sort_sites, voronoi, Diagram, EdgeIdx, Point, SiteIdx, VertexIdx};
use malachite::num::basic::traits::Zero;
use malachite::Rational;
use proptest::prelude::*;
use std::collections::BTreeMap;

const EPS: f64 = 1e-9;

fn dist(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Exact orientation of `c` relative to the directed line `a -> b`:
/// `Greater` means strictly to the left.
fn orient(a: Point, b: Point, c: Point) -> std::cmp::Ordering {
    let r = |x: f64| Rational::try_from(x).unwrap();
    let cross = (r(b.x) - r(a.x)) * (r(c.y) - r(a.y)) - (r(b.y) - r(a.y)) * (r(c.x) - r(a.x));
    cross.cmp(&Rational::ZERO)
}

/// Do the two segments cross in their interiors? Exact; segments that merely
/// share an endpoint or touch without crossing don't count.
fn proper_crossing(p: (Point, Point), q: (Point, Point)) -> bool {
    use std::cmp::Ordering::Equal;
    let o1 = orient(p.0, p.1, q.0);
    let o2 = orient(p.0, p.1, q.1);
    let o3 = orient(q.0, q.1, p.0);
    let o4 = orient(q.0, q.1, p.1);
    o1 != Equal && o2 != Equal && o1 != o2 && o3 != Equal && o4 != Equal && o3 != o4
}

/// Clips the parametric line `origin + t * dir`, `t` in `[t0, t1]`, to a
/// square box of half-width `half` around the origin of the plane.
fn clip_parametric(
    origin: Point,
    dir: (f64, f64),
    mut t0: f64,
    mut t1: f64,
    half: f64,
) -> Option<(Point, Point)> {
    for (o, d) in [(origin.x, dir.0), (origin.y, dir.1)] {
        if d == 0.0 {
            if o < -half || o > half {
                return None;
            }
        } else {
            let (a, b) = ((-half - o) / d, (half - o) / d);
            let (lo, hi) = if a < b { (a, b) } else { (b, a) };
            t0 = t0.max(lo);
            t1 = t1.min(hi);
        }
    }
    if t0 >= t1 {
        return None;
    }
    let at = |t: f64| Point::new(origin.x + t * dir.0, origin.y + t * dir.1);
    Some((at(t0), at(t1)))
}

/// The edge clipped to a box of half-width `half`, in start-to-end
/// orientation.
fn clipped_edge(d: &Diagram, e: EdgeIdx, half: f64) -> Option<(Point, Point)> {
    let edge = d.edge(e);
    match (edge.start, edge.end) {
        // Bounded edges are inside the box already; keeping the exact vertex
        // coordinates means segments that share a vertex share it bitwise,
        // which the exact crossing test then correctly ignores.
        (Some(b), Some(v)) => Some((d.vertex(b).center, d.vertex(v).center)),
        _ => {
            let ray = d.edge_ray(e).unwrap();
            let dir = (ray.direction.x, ray.direction.y);
            let t0 = if edge.start.is_some() { 0.0 } else { f64::NEG_INFINITY };
            let t1 = if edge.end.is_some() { 0.0 } else { f64::INFINITY };
            clip_parametric(ray.origin, dir, t0, t1, half)
        }
    }
}

/// A box that comfortably contains all sites and all finalised vertices.
fn bounding_half_width(d: &Diagram) -> f64 {
    let mut half: f64 = 1.0;
    for p in d.sites().points() {
        half = half.max(p.x.abs()).max(p.y.abs());
    }
    for (_, c) in d.vertices() {
        half = half.max(c.center.x.abs()).max(c.center.y.abs());
    }
    2.0 * half + 1.0
}

/// Checks every testable invariant of a finished diagram.
fn check_diagram(d: &Diagram) {
    let half = bounding_half_width(d);
    let scale = half;
    let tol = 1e-7 * (1.0 + scale);

    // Edge endpoints, bisector property, orientation.
    let mut incident: BTreeMap<VertexIdx, Vec<(SiteIdx, SiteIdx)>> = BTreeMap::new();
    for (e, edge) in d.edges() {
        let l = d.site(edge.left);
        let r = d.site(edge.right);
        for v in [edge.start, edge.end].into_iter().flatten() {
            incident.entry(v).or_default().push((edge.left, edge.right));
        }

        // Every sampled point of the edge is equidistant from its two sites.
        if let Some((a, b)) = clipped_edge(d, e, half) {
            let mid = a.midpoint(&b);
            for p in [a, b, mid] {
                let dl = dist(p, l);
                let dr = dist(p, r);
                assert!(
                    (dl - dr).abs() <= 1e-7 * (1.0 + dl),
                    "bisector violated for edge {e:?}: {dl} vs {dr}"
                );
            }
        }

        // Orientation: start-to-end keeps the left site strictly left.
        if let (Some(b), Some(v)) = (edge.start, edge.end) {
            let b = d.vertex(b).center;
            let v = d.vertex(v).center;
            assert_eq!(orient(b, v, l), std::cmp::Ordering::Greater, "{e:?}");
            assert_eq!(orient(b, v, r), std::cmp::Ordering::Less, "{e:?}");
        }
    }

    // Vertex degree and the empty-circle property.
    for (v, circle) in d.vertices() {
        let pairs = incident.get(&v).expect("vertex with no incident edges");
        assert!(pairs.len() >= 3, "vertex {v:?} has degree {}", pairs.len());
        for &(l, r) in pairs {
            for s in [l, r] {
                let ds = dist(d.site(s), circle.center);
                assert!(
                    (ds - circle.radius).abs() <= tol,
                    "incident site {s:?} not on circle of {v:?}"
                );
            }
        }
        for s in d.sites().indices() {
            let ds = dist(d.site(s), circle.center);
            assert!(
                ds >= circle.radius - tol,
                "site {s:?} strictly inside circle of {v:?}"
            );
        }
    }

    // Planarity: no two clipped edges cross in their interiors.
    let segments: Vec<_> = d
        .edges()
        .map(|(e, _)| clipped_edge(d, e, half))
        .collect();
    for (i, a) in segments.iter().enumerate() {
        for b in &segments[i + 1..] {
            if let (Some(a), Some(b)) = (a, b) {
                assert!(!proper_crossing(*a, *b), "edges cross: {a:?} {b:?}");
            }
        }
    }

    // Cells: ring edges stay in each cell's half-planes, consecutive ring
    // edges share their junction vertex, and each edge shows up in exactly
    // its two cells.
    let mut ring_count = vec![0usize; d.num_edges()];
    for s in d.sites().indices() {
        let site = d.site(s);
        let ring: Vec<_> = d.cell(s).collect();
        for &e in &ring {
            ring_count[e.0] += 1;
            let edge = d.edge(e);
            assert!(edge.left == s || edge.right == s);
            if let Some((a, b)) = clipped_edge(d, e, half) {
                for p in [a, b, a.midpoint(&b)] {
                    let ds = dist(p, site);
                    for other in d.sites().indices() {
                        assert!(
                            ds <= dist(p, d.site(other)) + tol,
                            "cell {s:?} edge {e:?} leaves its half-plane vs {other:?}"
                        );
                    }
                }
            }
        }
        if ring.len() >= 2 {
            // Traversal along the ring: the left cell walks start-to-end,
            // the right cell end-to-start.
            let ends = |e: EdgeIdx| {
                let edge = d.edge(e);
                if edge.left == s {
                    (edge.start, edge.end)
                } else {
                    (edge.end, edge.start)
                }
            };
            for pair in ring.windows(2).chain(std::iter::once(
                &[*ring.last().unwrap(), ring[0]][..],
            )) {
                let (_, head) = ends(pair[0]);
                let (tail, _) = ends(pair[1]);
                if let (Some(h), Some(t)) = (head, tail) {
                    assert_eq!(h, t, "ring of {s:?} breaks between {:?} and {:?}", pair[0], pair[1]);
                }
            }
        }
    }
    for (e, _) in d.edges() {
        assert_eq!(ring_count[e.0], 2, "edge {e:?} not in exactly two rings");
    }
}

fn run(points: &[(f64, f64)]) -> Diagram {
    let sites: Vec<Point> = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
    voronoi(&sites, EPS).unwrap()
}

#[test]
fn two_sites() {
    let d = run(&[(0.0, 0.0), (1.0, 0.0)]);
    assert_eq!(d.num_vertices(), 0);
    assert_eq!(d.num_edges(), 1);
    check_diagram(&d);
}

#[test]
fn three_collinear_sites() {
    let d = run(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
    assert_eq!(d.num_vertices(), 0);
    assert_eq!(d.num_edges(), 2);
    check_diagram(&d);
}

#[test]
fn equilateral_triple() {
    let h = 3.0f64.sqrt() / 2.0;
    let d = run(&[(0.0, 0.0), (0.5, h), (1.0, 0.0)]);
    assert_eq!(d.num_vertices(), 1);
    assert_eq!(d.num_edges(), 3);
    let (_, c) = d.vertices().next().unwrap();
    assert!(dist(c.center, Point::new(0.5, h / 3.0)) < 1e-9);
    assert!((c.radius - 1.0 / 3.0f64.sqrt()).abs() < 1e-9);
    check_diagram(&d);
}

#[test]
fn exact_square() {
    let d = run(&[(0.0, 0.0), (0.0, 1.0), (1.0, 0.0), (1.0, 1.0)]);
    assert_eq!(d.num_vertices(), 1);
    assert_eq!(d.num_edges(), 4);
    let (v, c) = d.vertices().next().unwrap();
    assert!(dist(c.center, Point::new(0.5, 0.5)) < 1e-9);
    let degree = d
        .edges()
        .flat_map(|(_, e)| [e.start, e.end])
        .filter(|&x| x == Some(v))
        .count();
    assert_eq!(degree, 4);
    check_diagram(&d);
}

#[test]
fn jittered_square() {
    // Each site moved by at most 1e-6: the degree-4 vertex splits into two
    // degree-3 vertices joined by a short edge.
    let d = run(&[
        (0.0, 0.0),
        (1e-7, 1.0 + 2e-6),
        (1.0, -1e-6),
        (1.0 + 1e-6, 1.0 - 3e-7),
    ]);
    assert_eq!(d.num_vertices(), 2);
    assert_eq!(d.num_edges(), 5);

    let bounded: Vec<_> = d
        .edges()
        .filter(|(_, e)| e.start.is_some() && e.end.is_some())
        .collect();
    assert_eq!(bounded.len(), 1);
    let e = bounded[0].1;
    let len = dist(
        d.vertex(e.start.unwrap()).center,
        d.vertex(e.end.unwrap()).center,
    );
    assert!(len < 1e-4, "bounded edge has length {len}");

    for (v, _) in d.vertices() {
        let degree = d
            .edges()
            .flat_map(|(_, e)| [e.start, e.end])
            .filter(|&x| x == Some(v))
            .count();
        assert_eq!(degree, 3);
    }
    check_diagram(&d);
}

#[test]
fn five_cocircular_sites() {
    let mut pts: Vec<Point> = (0..5)
        .map(|i| {
            let theta = std::f64::consts::TAU * (0.25 + i as f64 / 5.0);
            Point::new(theta.cos(), theta.sin())
        })
        .collect();
    sort_sites(&mut pts, EPS);
    let d = voronoi(&pts, EPS).unwrap();

    assert_eq!(d.num_vertices(), 1);
    assert_eq!(d.num_edges(), 5);
    let (v, c) = d.vertices().next().unwrap();
    assert!(dist(c.center, Point::new(0.0, 0.0)) < 1e-9);
    assert!((c.radius - 1.0).abs() < 1e-9);
    for (_, edge) in d.edges() {
        let ends = [edge.start, edge.end];
        assert!(ends.contains(&Some(v)));
        assert!(ends.contains(&None));
    }
    check_diagram(&d);
}

#[test]
fn output_is_a_function_of_the_sorted_sites() {
    // Generating the same set in any order and sorting it gives the same
    // sequence, and the sweep is deterministic from there.
    let base = [
        (0.0, 0.0),
        (0.3, 1.1),
        (1.0, -0.4),
        (1.7, 0.9),
        (2.2, 0.1),
        (2.9, 1.4),
    ];
    let d1 = run(&base);

    let mut shuffled: Vec<Point> = [3, 0, 5, 2, 4, 1]
        .iter()
        .map(|&i: &usize| Point::new(base[i].0, base[i].1))
        .collect();
    sort_sites(&mut shuffled, EPS);
    let d2 = voronoi(&shuffled, EPS).unwrap();

    let shape = |d: &Diagram| {
        (
            d.vertices()
                .map(|(v, c)| (v, (c.center.x.to_bits(), c.center.y.to_bits())))
                .collect::<Vec<_>>(),
            d.edges().map(|(_, e)| *e).collect::<Vec<_>>(),
            d.sites()
                .indices()
                .map(|s| d.cell(s).collect::<Vec<_>>())
                .collect::<Vec<_>>(),
        )
    };
    assert_eq!(shape(&d1), shape(&d2));
}

#[test]
fn vertical_and_horizontal_alignments() {
    // Shared x and shared y coordinates exercise the degenerate breakpoint
    // branches.
    let d = run(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]);
    assert_eq!(d.num_vertices(), 0);
    assert_eq!(d.num_edges(), 2);
    check_diagram(&d);

    let d = run(&[
        (0.0, 0.0),
        (0.0, 1.0),
        (1.0, 0.0),
        (1.0, 1.0),
        (2.0, 0.0),
        (2.0, 1.0),
    ]);
    assert_eq!(d.num_vertices(), 2);
    check_diagram(&d);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Coordinates on a 1e-3 grid keep every accepted circumcircle
    // well-conditioned relative to the tolerance.
    #[test]
    fn random_sites_satisfy_invariants(
        raw in prop::collection::vec((-100_000i32..100_000, -100_000i32..100_000), 3..25)
    ) {
        let mut pts: Vec<Point> = raw
            .iter()
            .map(|&(x, y)| Point::new(x as f64 / 1e3, y as f64 / 1e3))
            .collect();
        sort_sites(&mut pts, EPS);
        let d = voronoi(&pts, EPS).unwrap();
        check_diagram(&d);
        if pts.len() >= 2 {
            prop_assert!(d.num_edges() >= 1);
        }
    }
}

#[cfg(feature = "generators")]
mod generated {
    use super::*;
    use beachline::generators;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn disk_sites_satisfy_invariants() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let pts = generators::disk_sites(&mut rng, 120, 10.0, EPS);
        let d = voronoi(&pts, EPS).unwrap();
        assert!(d.num_vertices() > 0);
        check_diagram(&d);
    }

    #[test]
    fn jittered_grid_satisfies_invariants() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let pts = generators::jittered_grid(&mut rng, 7, 1e-3, EPS);
        let d = voronoi(&pts, EPS).unwrap();
        check_diagram(&d);
    }
}
