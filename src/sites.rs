use crate::geom::{lex_lt, Point};

/// An index into our site arena.
///
/// Throughout this library, sites are identified by their position in the
/// input sequence; all cross-references between the beach line, the event
/// queue and the output go through these indices, which stay valid for the
/// whole run. (Of course, this index-as-identifier breaks down if there are
/// multiple `Sites` in flight. Just be careful not to mix them up.)
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, serde::Serialize)]
pub struct SiteIdx(pub usize);

impl std::fmt::Debug for SiteIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s_{}", self.0)
    }
}

/// An arena of input sites.
///
/// Sites are indexed by [`SiteIdx`] and can be retrieved by indexing (i.e.
/// with square brackets). The arena is immutable for the duration of a sweep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sites {
    points: Vec<Point>,
}

impl Sites {
    /// Collects the input points into an arena.
    pub fn new(points: impl IntoIterator<Item = Point>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    /// The number of sites in this arena.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Iterate over all indices that can be used to index into this arena.
    pub fn indices(&self) -> impl Iterator<Item = SiteIdx> {
        (0..self.points.len()).map(SiteIdx)
    }

    /// Iterate over all sites in this arena.
    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    /// Is the arena sorted in the tolerant lexicographic order the sweep
    /// requires?
    ///
    /// Coincident sites (equal under the tolerance) also fail this check:
    /// the input contract requires de-duplicated sites.
    pub fn is_sorted(&self, eps: f64) -> bool {
        self.points
            .windows(2)
            .all(|pair| lex_lt(&pair[0], &pair[1], eps))
    }
}

impl std::ops::Index<SiteIdx> for Sites {
    type Output = Point;

    fn index(&self, idx: SiteIdx) -> &Point {
        &self.points[idx.0]
    }
}
