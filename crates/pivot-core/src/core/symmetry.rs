use super::error::ConfigError;
use super::models::point::Point;
use itertools::Itertools;
use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Which subgroup of the hypercubic lattice symmetries the generator draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymmetryGroup {
    /// All signed permutations of the axes (rotations and reflections).
    #[default]
    Full,
    /// Proper rotations only, i.e. signed permutations with determinant +1.
    Rotations,
}

impl SymmetryGroup {
    /// Number of elements in the group for the given dimension, identity included.
    pub fn order(&self, dimension: usize) -> usize {
        let full = (1..=dimension).product::<usize>() << dimension;
        match self {
            SymmetryGroup::Full => full,
            SymmetryGroup::Rotations => full / 2,
        }
    }
}

/// A lattice symmetry acting on displacement vectors.
///
/// Every operator is a signed permutation matrix, so it maps integer
/// lattice vectors onto integer lattice vectors and preserves all
/// pairwise distances. Its inverse is its transpose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymmetryOperator {
    matrix: DMatrix<i64>,
}

impl SymmetryOperator {
    pub fn identity(dimension: usize) -> Self {
        Self {
            matrix: DMatrix::identity(dimension, dimension),
        }
    }

    /// Clockwise rotation of the plane by `quarter_turns × 90°`.
    ///
    /// One quarter turn maps `(1, 0)` to `(0, -1)`.
    pub fn rotation_2d(quarter_turns: i32) -> Self {
        let matrix = match quarter_turns.rem_euclid(4) {
            0 => DMatrix::from_row_slice(2, 2, &[1, 0, 0, 1]),
            1 => DMatrix::from_row_slice(2, 2, &[0, 1, -1, 0]),
            2 => DMatrix::from_row_slice(2, 2, &[-1, 0, 0, -1]),
            _ => DMatrix::from_row_slice(2, 2, &[0, -1, 1, 0]),
        };
        Self { matrix }
    }

    /// Mirror image through the hyperplane orthogonal to `axis`.
    pub fn reflection(axis: usize, dimension: usize) -> Result<Self, ConfigError> {
        if axis >= dimension {
            return Err(ConfigError::InvalidParameter {
                name: "axis",
                reason: format!("axis {} does not exist in dimension {}", axis, dimension),
            });
        }
        let mut matrix = DMatrix::identity(dimension, dimension);
        matrix[(axis, axis)] = -1;
        Ok(Self { matrix })
    }

    /// Builds the matrix with `signs[i]` at row `i`, column `permutation[i]`.
    pub fn from_signed_permutation(
        permutation: &[usize],
        signs: &[i64],
    ) -> Result<Self, ConfigError> {
        let dimension = permutation.len();
        if dimension == 0 {
            return Err(ConfigError::InvalidDimension(0));
        }
        if signs.len() != dimension {
            return Err(ConfigError::InvalidParameter {
                name: "signs",
                reason: format!("expected {} signs, got {}", dimension, signs.len()),
            });
        }
        if let Some(bad) = signs.iter().find(|s| s.abs() != 1) {
            return Err(ConfigError::InvalidParameter {
                name: "signs",
                reason: format!("sign {} is neither 1 nor -1", bad),
            });
        }
        let mut seen = vec![false; dimension];
        for &column in permutation {
            if column >= dimension || seen[column] {
                return Err(ConfigError::InvalidParameter {
                    name: "permutation",
                    reason: format!("{:?} is not a permutation of 0..{}", permutation, dimension),
                });
            }
            seen[column] = true;
        }

        let mut matrix = DMatrix::zeros(dimension, dimension);
        for (row, (&column, &sign)) in permutation.iter().zip(signs).enumerate() {
            matrix[(row, column)] = sign;
        }
        Ok(Self { matrix })
    }

    /// Draws a uniformly random non-identity element of `group`.
    ///
    /// Identity draws are re-sampled, so every call returns a usable move.
    pub fn random<R: Rng + ?Sized>(
        dimension: usize,
        group: SymmetryGroup,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        validate_group(dimension, group)?;

        let mut permutation: Vec<usize> = (0..dimension).collect();
        let mut signs = vec![1i64; dimension];
        loop {
            permutation.shuffle(rng);
            for sign in signs.iter_mut() {
                *sign = if rng.gen_bool(0.5) { 1 } else { -1 };
            }
            // Flipping one row is a bijection from the improper coset onto the proper one.
            if group == SymmetryGroup::Rotations
                && permutation_parity(&permutation) * signs.iter().product::<i64>() < 0
            {
                signs[0] = -signs[0];
            }

            let operator = Self::from_signed_permutation(&permutation, &signs)?;
            if !operator.is_identity() {
                return Ok(operator);
            }
        }
    }

    /// Every element of `group` in the given dimension, identity included.
    pub fn elements(dimension: usize, group: SymmetryGroup) -> Vec<Self> {
        if dimension == 0 {
            return Vec::new();
        }
        let sign_choices: Vec<Vec<i64>> = std::iter::repeat_n([1i64, -1i64], dimension)
            .multi_cartesian_product()
            .collect();
        (0..dimension)
            .permutations(dimension)
            .cartesian_product(sign_choices.iter())
            .filter_map(|(permutation, signs)| {
                Self::from_signed_permutation(&permutation, signs).ok()
            })
            .filter(|op| group == SymmetryGroup::Full || op.determinant() == 1)
            .collect()
    }

    pub fn dimension(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn matrix(&self) -> &DMatrix<i64> {
        &self.matrix
    }

    pub fn is_identity(&self) -> bool {
        let dimension = self.dimension();
        self.matrix == DMatrix::identity(dimension, dimension)
    }

    /// Either `1` (rotation) or `-1` (improper transform).
    pub fn determinant(&self) -> i64 {
        let mut permutation = Vec::with_capacity(self.dimension());
        let mut sign_product = 1;
        for row in self.matrix.row_iter() {
            if let Some((column, &value)) = row.iter().enumerate().find(|(_, v)| **v != 0) {
                permutation.push(column);
                sign_product *= value.signum();
            }
        }
        permutation_parity(&permutation) * sign_product
    }

    pub fn inverse(&self) -> Self {
        Self {
            matrix: self.matrix.transpose(),
        }
    }

    /// The operator applying `other` first, then `self`.
    pub fn compose(&self, other: &SymmetryOperator) -> Self {
        Self {
            matrix: &self.matrix * &other.matrix,
        }
    }

    #[inline]
    pub fn apply(&self, vector: &DVector<i64>) -> DVector<i64> {
        &self.matrix * vector
    }

    /// `pivot + R · (point − pivot)`.
    #[inline]
    pub fn pivot_about(&self, pivot: &Point, point: &Point) -> Point {
        pivot + self.apply(&(point - pivot))
    }
}

impl Hash for SymmetryOperator {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dimension().hash(state);
        self.matrix.as_slice().hash(state);
    }
}

impl fmt::Display for SymmetryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self
            .matrix
            .row_iter()
            .map(|row| row.iter().map(|v| v.to_string()).join(", "))
            .join("; ");
        write!(f, "[{}]", rows)
    }
}

pub(crate) fn validate_group(dimension: usize, group: SymmetryGroup) -> Result<(), ConfigError> {
    if dimension == 0 {
        return Err(ConfigError::InvalidDimension(dimension));
    }
    if group == SymmetryGroup::Rotations && dimension == 1 {
        return Err(ConfigError::TrivialSymmetryGroup { dimension });
    }
    Ok(())
}

fn permutation_parity(permutation: &[usize]) -> i64 {
    let mut visited = vec![false; permutation.len()];
    let mut parity = 1;
    for start in 0..permutation.len() {
        if visited[start] {
            continue;
        }
        let mut cycle_len = 0;
        let mut current = start;
        while !visited[current] {
            visited[current] = true;
            current = permutation[current];
            cycle_len += 1;
        }
        if cycle_len % 2 == 0 {
            parity = -parity;
        }
    }
    parity
}
