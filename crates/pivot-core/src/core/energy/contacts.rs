use crate::core::models::point::Point;
use std::collections::HashMap;
use std::ops::AddAssign;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Pairwise interaction counts of a configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PairCounts {
    /// Unordered pairs of points occupying the same site.
    pub intersections: usize,
    /// Unordered pairs at Manhattan distance exactly 1 that are not bonded
    /// neighbours along the chain.
    pub contacts: usize,
}

impl PairCounts {
    /// Counts intersections and non-bonded contacts in one O(n²) pass.
    pub fn count(path: &[Point]) -> Self {
        #[cfg(not(feature = "parallel"))]
        let counts = (0..path.len())
            .map(|i| Self::count_from(path, i))
            .fold(PairCounts::default(), Self::combine);

        #[cfg(feature = "parallel")]
        let counts = (0..path.len())
            .into_par_iter()
            .map(|i| Self::count_from(path, i))
            .reduce(PairCounts::default, Self::combine);

        counts
    }

    /// Only counts intersections, skipping the contact bookkeeping.
    pub fn count_intersections(path: &[Point]) -> usize {
        path.iter()
            .enumerate()
            .map(|(i, a)| path[i + 1..].iter().filter(|b| a == *b).count())
            .sum()
    }

    fn count_from(path: &[Point], i: usize) -> Self {
        let mut counts = PairCounts::default();
        let a = &path[i];
        for (offset, b) in path[i + 1..].iter().enumerate() {
            match a.manhattan_distance(b) {
                0 => counts.intersections += 1,
                // offset 0 is the bonded neighbour i + 1
                1 if offset > 0 => counts.contacts += 1,
                _ => {}
            }
        }
        counts
    }

    fn combine(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

/// The first pair of indices `(i, j)` with `i < j` occupying the same site,
/// ordered by `j`.
pub fn first_intersection(path: &[Point]) -> Option<(usize, usize)> {
    let mut visited: HashMap<&Point, usize> = HashMap::with_capacity(path.len());
    for (j, point) in path.iter().enumerate() {
        if let Some(&i) = visited.get(point) {
            return Some((i, j));
        }
        visited.insert(point, j);
    }
    None
}

impl AddAssign for PairCounts {
    fn add_assign(&mut self, other: Self) {
        self.intersections += other.intersections;
        self.contacts += other.contacts;
    }
}
