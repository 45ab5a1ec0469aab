use super::error::EngineError;
use super::utils::sampling::metropolis_accept;
use crate::core::models::point::Point;
use crate::core::models::polymer::Polymer;
use crate::core::symmetry::SymmetryOperator;
use rand::Rng;
use std::collections::HashMap;
use tracing::{instrument, trace};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RejectionReason {
    /// A transformed suffix point landed on an untouched prefix point.
    Collision {
        suffix_index: usize,
        prefix_index: usize,
    },
    /// The Metropolis draw rejected an uphill move.
    Metropolis { delta_energy: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PivotOutcome {
    Accepted { delta_energy: f64 },
    /// The operator fixed every suffix point; nothing was committed.
    Unchanged,
    Rejected(RejectionReason),
}

impl PivotOutcome {
    /// Whether the path now differs from the one before the attempt.
    pub fn changed(&self) -> bool {
        matches!(self, PivotOutcome::Accepted { .. })
    }

    pub fn delta_energy(&self) -> Option<f64> {
        match self {
            PivotOutcome::Accepted { delta_energy }
            | PivotOutcome::Rejected(RejectionReason::Metropolis { delta_energy }) => {
                Some(*delta_energy)
            }
            PivotOutcome::Unchanged => Some(0.0),
            PivotOutcome::Rejected(RejectionReason::Collision { .. }) => None,
        }
    }
}

/// Attempts one pivot move about `polymer.path()[index]`.
///
/// Every point after the pivot is mapped to `pivot + R · (p − pivot)`. The
/// candidate is built in its own buffer and swapped in only on acceptance,
/// so `path[..=index]` is never touched and a rejection leaves the polymer
/// exactly as it was.
///
/// `strict` polymers are decided deterministically: the first transformed
/// point that lands on the prefix rejects the move. The suffix cannot collide
/// with itself because the transform is rigid. Every other species goes
/// through the Metropolis test on `E_new − E_old`.
///
/// An operator that fixes every suffix point yields
/// [`PivotOutcome::Unchanged`] without evaluating energies or drawing
/// randomness.
#[instrument(level = "trace", skip_all, fields(index = index, steps = polymer.len()))]
pub fn attempt_pivot<R: Rng + ?Sized>(
    polymer: &mut Polymer,
    index: usize,
    operator: &SymmetryOperator,
    rng: &mut R,
) -> Result<PivotOutcome, EngineError> {
    let steps = polymer.len();
    if index >= steps.saturating_sub(1) {
        return Err(EngineError::InvalidPivotIndex { index, steps });
    }
    if operator.dimension() != polymer.dimension() {
        return Err(EngineError::OperatorDimensionMismatch {
            expected: polymer.dimension(),
            found: operator.dimension(),
        });
    }

    let outcome = if polymer.energy_model().is_strict() {
        strict_pivot(polymer, index, operator)
    } else {
        energy_pivot(polymer, index, operator, rng)
    };
    trace!(?outcome, "Pivot attempt finished.");
    Ok(outcome)
}

fn strict_pivot(polymer: &mut Polymer, index: usize, operator: &SymmetryOperator) -> PivotOutcome {
    match self_avoiding_candidate(polymer.path(), index, operator) {
        Err(reason) => PivotOutcome::Rejected(reason),
        Ok(None) => PivotOutcome::Unchanged,
        Ok(Some(candidate)) => {
            let energy = polymer.energy();
            polymer.commit(candidate, energy);
            PivotOutcome::Accepted { delta_energy: 0.0 }
        }
    }
}

fn self_avoiding_candidate(
    path: &[Point],
    index: usize,
    operator: &SymmetryOperator,
) -> Result<Option<Vec<Point>>, RejectionReason> {
    let (prefix, suffix) = path.split_at(index + 1);
    let pivot = &prefix[index];
    let occupied: HashMap<&Point, usize> = prefix.iter().enumerate().map(|(i, p)| (p, i)).collect();

    let mut candidate = Vec::with_capacity(path.len());
    candidate.extend_from_slice(prefix);
    let mut any_moved = false;
    for (offset, point) in suffix.iter().enumerate() {
        let moved = operator.pivot_about(pivot, point);
        any_moved |= moved != *point;
        if let Some(&prefix_index) = occupied.get(&moved) {
            return Err(RejectionReason::Collision {
                suffix_index: index + 1 + offset,
                prefix_index,
            });
        }
        candidate.push(moved);
    }
    Ok(any_moved.then_some(candidate))
}

fn energy_pivot<R: Rng + ?Sized>(
    polymer: &mut Polymer,
    index: usize,
    operator: &SymmetryOperator,
    rng: &mut R,
) -> PivotOutcome {
    let candidate = pivoted_path(polymer.path(), index, operator);
    if candidate[index + 1..] == polymer.path()[index + 1..] {
        return PivotOutcome::Unchanged;
    }

    let old_energy = polymer.energy();
    let new_energy = polymer.energy_model().energy(&candidate);
    let delta_energy = new_energy - old_energy;

    if metropolis_accept(delta_energy, rng) {
        polymer.commit(candidate, new_energy);
        PivotOutcome::Accepted { delta_energy }
    } else {
        PivotOutcome::Rejected(RejectionReason::Metropolis { delta_energy })
    }
}

/// The full candidate path without any collision check.
pub fn pivoted_path(path: &[Point], index: usize, operator: &SymmetryOperator) -> Vec<Point> {
    let (prefix, suffix) = path.split_at(index.saturating_add(1).min(path.len()));
    let Some(pivot) = prefix.last() else {
        return Vec::new();
    };
    prefix
        .iter()
        .cloned()
        .chain(suffix.iter().map(|p| operator.pivot_about(pivot, p)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::energy::model::SpeciesKind;
    use crate::core::models::builder::PolymerBuilder;
    use crate::core::symmetry::SymmetryGroup;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn points(coords: &[[i64; 2]]) -> Vec<Point> {
        coords.iter().map(|&c| Point::from(c)).collect()
    }

    fn straight_strict(steps: usize) -> Polymer {
        PolymerBuilder::new().steps(steps).build().unwrap()
    }

    #[test]
    fn quarter_turn_about_middle_of_straight_chain_is_accepted() {
        let mut polymer = straight_strict(5);
        let mut rng = StdRng::seed_from_u64(0);
        let outcome =
            attempt_pivot(&mut polymer, 2, &SymmetryOperator::rotation_2d(1), &mut rng).unwrap();

        assert!(outcome.changed());
        assert_eq!(
            polymer.path(),
            points(&[[0, 0], [1, 0], [2, 0], [2, -1], [2, -2]]).as_slice()
        );
    }

    #[test]
    fn colliding_strict_pivot_is_rejected_and_leaves_chain_untouched() {
        // U-shaped chain: turning the tail by 180° about (1,1) lands (2,1) on (0,1).
        let mut polymer = PolymerBuilder::new()
            .path(points(&[[0, 1], [0, 0], [1, 0], [1, 1], [2, 1]]))
            .build()
            .unwrap();
        let before = polymer.path().to_vec();
        let mut rng = StdRng::seed_from_u64(0);

        let outcome =
            attempt_pivot(&mut polymer, 3, &SymmetryOperator::rotation_2d(2), &mut rng).unwrap();

        assert_eq!(
            outcome,
            PivotOutcome::Rejected(RejectionReason::Collision {
                suffix_index: 4,
                prefix_index: 0
            })
        );
        assert!(!outcome.changed());
        assert_eq!(polymer.path(), before.as_slice());
    }

    #[test]
    fn pivot_index_outside_range_is_an_error() {
        let mut polymer = straight_strict(5);
        let mut rng = StdRng::seed_from_u64(0);
        let op = SymmetryOperator::rotation_2d(1);
        for index in [4, 5, 100] {
            assert!(matches!(
                attempt_pivot(&mut polymer, index, &op, &mut rng),
                Err(EngineError::InvalidPivotIndex { steps: 5, .. })
            ));
        }
        let mut single = straight_strict(1);
        assert!(attempt_pivot(&mut single, 0, &op, &mut rng).is_err());
    }

    #[test]
    fn operator_of_wrong_dimension_is_an_error() {
        let mut polymer = straight_strict(5);
        let mut rng = StdRng::seed_from_u64(0);
        let op = SymmetryOperator::identity(3);
        assert!(matches!(
            attempt_pivot(&mut polymer, 1, &op, &mut rng),
            Err(EngineError::OperatorDimensionMismatch {
                expected: 2,
                found: 3
            })
        ));
    }

    #[test]
    fn pivot_at_origin_moves_everything_but_the_first_point() {
        let mut polymer = straight_strict(4);
        let mut rng = StdRng::seed_from_u64(0);
        attempt_pivot(&mut polymer, 0, &SymmetryOperator::rotation_2d(2), &mut rng).unwrap();
        assert_eq!(
            polymer.path(),
            points(&[[0, 0], [-1, 0], [-2, 0], [-3, 0]]).as_slice()
        );
    }

    #[test]
    fn operator_then_inverse_restores_the_suffix() {
        let mut polymer = PolymerBuilder::new()
            .path(points(&[[0, 0], [1, 0], [1, 1], [2, 1], [2, 2], [3, 2]]))
            .species(SpeciesKind::Simple)
            .build()
            .unwrap();
        let original = polymer.path().to_vec();
        let mut rng = StdRng::seed_from_u64(9);

        for op in SymmetryOperator::elements(2, SymmetryGroup::Full) {
            for index in 0..polymer.len() - 1 {
                attempt_pivot(&mut polymer, index, &op, &mut rng).unwrap();
                attempt_pivot(&mut polymer, index, &op.inverse(), &mut rng).unwrap();
                assert_eq!(polymer.path(), original.as_slice());
            }
        }
    }

    #[test]
    fn simple_species_accepts_every_pivot() {
        let mut polymer = PolymerBuilder::new()
            .steps(20)
            .species(SpeciesKind::Simple)
            .build()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..500 {
            let index = rng.gen_range(0..polymer.len() - 1);
            let op = SymmetryOperator::random(2, SymmetryGroup::Full, &mut rng).unwrap();
            let outcome = attempt_pivot(&mut polymer, index, &op, &mut rng).unwrap();
            assert!(matches!(
                outcome,
                PivotOutcome::Accepted { delta_energy: 0.0 } | PivotOutcome::Unchanged
            ));
            assert_eq!(polymer.energy(), 0.0);
        }
    }

    #[test]
    fn prefix_is_invariant_under_any_attempt() {
        let mut rng = StdRng::seed_from_u64(1234);
        for species in [SpeciesKind::Strict, SpeciesKind::Mixed, SpeciesKind::Simple] {
            let mut polymer = PolymerBuilder::new()
                .steps(30)
                .species(species)
                .repulsion(1.0)
                .attraction(0.5)
                .build()
                .unwrap();
            for _ in 0..300 {
                let index = rng.gen_range(0..polymer.len() - 1);
                let op = SymmetryOperator::random(2, SymmetryGroup::Full, &mut rng).unwrap();
                let prefix_before = polymer.path()[..=index].to_vec();
                attempt_pivot(&mut polymer, index, &op, &mut rng).unwrap();
                assert_eq!(&polymer.path()[..=index], prefix_before.as_slice());
            }
        }
    }

    #[test]
    fn strict_chain_stays_self_avoiding_over_many_pivots() {
        let mut polymer = straight_strict(40);
        let mut rng = StdRng::seed_from_u64(77);
        let mut accepted = 0;
        for _ in 0..2_000 {
            let index = rng.gen_range(0..polymer.len() - 1);
            let op = SymmetryOperator::random(2, SymmetryGroup::Full, &mut rng).unwrap();
            if attempt_pivot(&mut polymer, index, &op, &mut rng).unwrap().changed() {
                accepted += 1;
            }
            let distinct: HashSet<&Point> = polymer.path().iter().collect();
            assert_eq!(distinct.len(), polymer.len());
        }
        assert!(accepted > 0);
    }

    #[test]
    fn uphill_pivot_is_accepted_with_boltzmann_frequency() {
        // Energy 1 whenever the last point leaves the first axis.
        let template = PolymerBuilder::new()
            .steps(5)
            .energy_fn(|path| match path.last().and_then(|p| p.get(1)) {
                Some(0) | None => 0.0,
                Some(_) => 1.0,
            })
            .build()
            .unwrap();
        let op = SymmetryOperator::rotation_2d(1);
        let mut rng = StdRng::seed_from_u64(2024);

        let trials = 10_000;
        let mut accepted = 0;
        for _ in 0..trials {
            let mut polymer = template.clone();
            let outcome = attempt_pivot(&mut polymer, 2, &op, &mut rng).unwrap();
            assert_eq!(outcome.delta_energy(), Some(1.0));
            if outcome.changed() {
                accepted += 1;
                assert_eq!(polymer.energy(), 1.0);
            } else {
                assert_eq!(polymer.path(), template.path());
                assert_eq!(polymer.energy(), 0.0);
            }
        }

        let frequency = accepted as f64 / trials as f64;
        let expected = (-1.0f64).exp();
        assert!((frequency - expected).abs() < 0.05 * expected);
    }

    #[test]
    fn downhill_pivot_is_always_accepted() {
        let template = PolymerBuilder::new()
            .path(points(&[[0, 0], [1, 0], [2, 0], [2, 1]]))
            .energy_fn(|path| match path.last().and_then(|p| p.get(1)) {
                Some(0) | None => 0.0,
                Some(_) => 1.0,
            })
            .build()
            .unwrap();
        // A clockwise quarter turn about (2,0) brings the tail (2,1) down to (3,0).
        let op = SymmetryOperator::rotation_2d(1);
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..1_000 {
            let mut polymer = template.clone();
            let outcome = attempt_pivot(&mut polymer, 2, &op, &mut rng).unwrap();
            assert_eq!(outcome, PivotOutcome::Accepted { delta_energy: -1.0 });
        }
    }

    #[test]
    fn weak_species_penalises_new_intersections() {
        // Folding the tail of a U back onto itself creates one intersection.
        let mut polymer = PolymerBuilder::new()
            .path(points(&[[0, 1], [0, 0], [1, 0], [1, 1], [2, 1]]))
            .species(SpeciesKind::Weak)
            .repulsion(1.0e4)
            .build()
            .unwrap();
        let before = polymer.path().to_vec();
        let mut rng = StdRng::seed_from_u64(0);
        let outcome =
            attempt_pivot(&mut polymer, 3, &SymmetryOperator::rotation_2d(2), &mut rng).unwrap();
        assert_eq!(
            outcome,
            PivotOutcome::Rejected(RejectionReason::Metropolis {
                delta_energy: 1.0e4
            })
        );
        assert_eq!(polymer.path(), before.as_slice());
    }

    #[test]
    fn reflection_fixing_a_straight_chain_is_reported_unchanged() {
        let mut polymer = straight_strict(5);
        let before = polymer.path().to_vec();
        let mirror = SymmetryOperator::reflection(1, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let outcome = attempt_pivot(&mut polymer, 0, &mirror, &mut rng).unwrap();

        assert_eq!(outcome, PivotOutcome::Unchanged);
        assert!(!outcome.changed());
        assert_eq!(outcome.delta_energy(), Some(0.0));
        assert_eq!(polymer.path(), before.as_slice());
    }

    #[test]
    fn no_op_pivot_on_soft_species_consumes_no_randomness() {
        let mut polymer = PolymerBuilder::new()
            .steps(6)
            .species(SpeciesKind::Weak)
            .repulsion(2.0)
            .build()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let mut untouched = StdRng::seed_from_u64(5);

        for op in [
            SymmetryOperator::identity(2),
            SymmetryOperator::reflection(1, 2).unwrap(),
        ] {
            let outcome = attempt_pivot(&mut polymer, 2, &op, &mut rng).unwrap();
            assert_eq!(outcome, PivotOutcome::Unchanged);
        }
        assert_eq!(rng.r#gen::<u64>(), untouched.r#gen::<u64>());
    }

    #[test]
    fn pivoted_path_handles_last_index_as_no_op() {
        let path = points(&[[0, 0], [1, 0], [2, 0]]);
        let op = SymmetryOperator::rotation_2d(1);
        assert_eq!(pivoted_path(&path, 2, &op), path);
        assert!(pivoted_path(&[], 0, &op).is_empty());
    }
}
