use super::point::Point;
use crate::core::energy::model::{EnergyModel, SpeciesKind};
use crate::core::utils::geometry::Norm;
use std::fmt;

#[cfg(not(feature = "parallel"))]
use itertools::Itertools;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A linear polymer on a hypercubic lattice.
///
/// The path always holds at least one point and every point has the
/// polymer's dimension. Only the pivot engine mutates the path, and it does
/// so by swapping in a fully evaluated candidate, so the cached energy always
/// matches the committed configuration.
#[derive(Debug, Clone)]
pub struct Polymer {
    path: Vec<Point>,
    dimension: usize,
    model: EnergyModel,
    energy: f64,
}

impl Polymer {
    /// Callers must have validated `path` against `dimension` and `model`.
    pub(crate) fn from_parts(path: Vec<Point>, dimension: usize, model: EnergyModel) -> Self {
        let energy = model.energy(&path);
        Self {
            path,
            dimension,
            model,
            energy,
        }
    }

    /// Number of points (`steps`).
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn species(&self) -> SpeciesKind {
        self.model.kind()
    }

    pub fn energy_model(&self) -> &EnergyModel {
        &self.model
    }

    /// Energy of the committed configuration.
    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn path(&self) -> &[Point] {
        &self.path
    }

    pub fn point(&self, index: usize) -> Option<&Point> {
        self.path.get(index)
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.path.contains(point)
    }

    /// Distance between points `i` and `j`, or `None` if either index is out of range.
    pub fn distance(&self, i: usize, j: usize, norm: Norm) -> Option<f64> {
        let a = self.path.get(i)?;
        let b = self.path.get(j)?;
        Some(norm.distance(a, b))
    }

    pub fn end_to_end_distance(&self, norm: Norm) -> f64 {
        match (self.path.first(), self.path.last()) {
            (Some(first), Some(last)) => norm.distance(first, last),
            _ => 0.0,
        }
    }

    /// Squared Euclidean distance between the chain ends.
    pub fn squared_end_to_end_distance(&self) -> i64 {
        match (self.path.first(), self.path.last()) {
            (Some(first), Some(last)) => first.squared_distance(last),
            _ => 0,
        }
    }

    /// Largest pairwise distance over all point pairs.
    ///
    /// Exhaustive O(n²) scan; chains of a few thousand points are the
    /// intended scale.
    pub fn max_distance(&self, norm: Norm) -> f64 {
        let path = &self.path;

        #[cfg(not(feature = "parallel"))]
        let max = path
            .iter()
            .tuple_combinations()
            .map(|(a, b)| norm.distance(a, b))
            .fold(0.0, f64::max);

        #[cfg(feature = "parallel")]
        let max = (0..path.len())
            .into_par_iter()
            .map(|i| {
                path[i + 1..]
                    .iter()
                    .map(|b| norm.distance(&path[i], b))
                    .fold(0.0, f64::max)
            })
            .reduce(|| 0.0, f64::max);

        max
    }

    /// Replaces the configuration with an accepted candidate.
    pub(crate) fn commit(&mut self, path: Vec<Point>, energy: f64) -> Vec<Point> {
        self.energy = energy;
        std::mem::replace(&mut self.path, path)
    }
}

impl fmt::Display for Polymer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for point in &self.path {
            writeln!(f, "{}", point)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn straight(steps: i64) -> Polymer {
        let path = (0..steps).map(|i| Point::from([i, 0])).collect();
        Polymer::from_parts(path, 2, EnergyModel::Strict)
    }

    #[test]
    fn queries_expose_the_path() {
        let polymer = straight(5);
        assert_eq!(polymer.len(), 5);
        assert!(!polymer.is_empty());
        assert_eq!(polymer.dimension(), 2);
        assert_eq!(polymer.point(3), Some(&Point::from([3, 0])));
        assert_eq!(polymer.point(5), None);
        assert!(polymer.contains(&Point::from([4, 0])));
        assert!(!polymer.contains(&Point::from([4, 1])));
        assert_eq!(polymer.species(), SpeciesKind::Strict);
        assert_eq!(polymer.energy(), 0.0);
    }

    #[test]
    fn distance_between_points_uses_requested_norm() {
        let polymer = straight(5);
        assert_eq!(polymer.distance(1, 4, Norm::EUCLIDEAN), Some(3.0));
        assert_eq!(polymer.distance(4, 1, Norm::MAX), Some(3.0));
        assert_eq!(polymer.distance(0, 9, Norm::EUCLIDEAN), None);
    }

    #[test]
    fn max_distance_of_straight_chain_is_its_length() {
        let polymer = straight(5);
        assert!(f64_approx_equal(polymer.max_distance(Norm::EUCLIDEAN), 4.0));
        assert!(f64_approx_equal(polymer.max_distance(Norm::MAX), 4.0));
        assert!(f64_approx_equal(polymer.end_to_end_distance(Norm::MANHATTAN), 4.0));
        assert_eq!(polymer.squared_end_to_end_distance(), 16);
    }

    #[test]
    fn max_distance_finds_interior_pairs() {
        let path = vec![
            Point::from([0, 0]),
            Point::from([0, 1]),
            Point::from([1, 1]),
            Point::from([1, 0]),
        ];
        let polymer = Polymer::from_parts(path, 2, EnergyModel::Simple);
        assert!(f64_approx_equal(polymer.end_to_end_distance(Norm::EUCLIDEAN), 1.0));
        assert_eq!(polymer.squared_end_to_end_distance(), 1);
        assert!(f64_approx_equal(
            polymer.max_distance(Norm::EUCLIDEAN),
            2f64.sqrt()
        ));
        assert!(f64_approx_equal(polymer.max_distance(Norm::MAX), 1.0));
    }

    #[test]
    fn single_point_polymer_has_zero_extent() {
        let polymer = straight(1);
        assert_eq!(polymer.max_distance(Norm::EUCLIDEAN), 0.0);
        assert_eq!(polymer.end_to_end_distance(Norm::EUCLIDEAN), 0.0);
    }

    #[test]
    fn commit_swaps_path_and_energy() {
        let mut polymer = straight(3);
        let replacement = vec![
            Point::from([0, 0]),
            Point::from([1, 0]),
            Point::from([1, 1]),
        ];
        let previous = polymer.commit(replacement.clone(), 0.0);
        assert_eq!(previous[2], Point::from([2, 0]));
        assert_eq!(polymer.path(), replacement.as_slice());
    }

    #[test]
    fn display_prints_one_point_per_line() {
        assert_eq!(straight(2).to_string(), "(0, 0)\n(1, 0)\n");
    }
}
