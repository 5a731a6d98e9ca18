#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod typed_vec;

mod beach;
mod diagram;
mod events;
mod geom;
mod num;
mod sites;
mod sweep;
mod treevec;

#[cfg(feature = "generators")]
pub mod generators;

pub use diagram::{Diagram, Edge, EdgeIdx, EdgeRay, VertexIdx};
pub use geom::{Circumcircle, Point};
pub use sites::{SiteIdx, Sites};
pub use sweep::Sweeper;

/// The input points were faulty.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Error {
    /// At least one of the inputs was not a number.
    NaN,
    /// At least one of the inputs was infinite.
    Infinity,
    /// The tolerance was not a positive finite number.
    Tolerance,
    /// The sites were not sorted (or not de-duplicated) under the tolerant
    /// lexicographic order.
    Unsorted,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NaN => write!(f, "input contains a NaN coordinate"),
            Error::Infinity => write!(f, "input contains an infinite coordinate"),
            Error::Tolerance => write!(f, "tolerance must be positive and finite"),
            Error::Unsorted => write!(f, "sites must be sorted and distinct under the tolerance"),
        }
    }
}

impl std::error::Error for Error {}

/// Computes the Voronoi diagram of a set of sites.
///
/// The sites must be sorted lexicographically by `(x, y)` and pairwise
/// distinct, both under the tolerance `eps`; use [`sort_sites`] if they
/// aren't. The tolerance governs every point-equality and predicate decision
/// the sweep makes, so it should be much smaller than the smallest meaningful
/// site separation but comfortably larger than the rounding noise of the
/// coordinate scale.
///
/// ```
/// use beachline::{voronoi, Point};
///
/// let sites = [Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
/// let diagram = voronoi(&sites, 1e-9).unwrap();
/// assert_eq!(diagram.num_edges(), 1);
/// ```
pub fn voronoi(sites: &[Point], eps: f64) -> Result<Diagram, Error> {
    if !(eps > 0.0) || !eps.is_finite() {
        return Err(Error::Tolerance);
    }
    for p in sites {
        if p.x.is_nan() || p.y.is_nan() {
            return Err(Error::NaN);
        }
        if p.x.is_infinite() || p.y.is_infinite() {
            return Err(Error::Infinity);
        }
    }
    let sites = Sites::new(sites.iter().copied());
    if !sites.is_sorted(eps) {
        return Err(Error::Unsorted);
    }
    Ok(Sweeper::new(sites, eps).run())
}

/// Sorts sites into the order [`voronoi`] requires and drops duplicates
/// under the tolerance.
///
/// The tolerant order is used for the sort itself: two sites whose `x`
/// coordinates agree within `eps` are ordered by `y`, even if their exact
/// `x` values would say otherwise.
pub fn sort_sites(sites: &mut Vec<Point>, eps: f64) {
    sites.sort_by(|a, b| {
        if geom::lex_lt(a, b, eps) {
            std::cmp::Ordering::Less
        } else if geom::lex_lt(b, a, eps) {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Equal
        }
    });
    sites.dedup_by(|b, a| geom::lex_eq(a, b, eps));
}
