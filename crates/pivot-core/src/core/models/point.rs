use nalgebra::DVector;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};

/// A lattice site with integer coordinates.
///
/// The dimension is carried by the coordinate vector itself, so points of
/// different dimensions never compare equal. Points are immutable values;
/// every geometric operation produces a new point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point {
    coords: DVector<i64>,
}

impl Point {
    pub fn new(coords: Vec<i64>) -> Self {
        Self {
            coords: DVector::from_vec(coords),
        }
    }

    pub fn from_vector(coords: DVector<i64>) -> Self {
        Self { coords }
    }

    pub fn origin(dimension: usize) -> Self {
        Self {
            coords: DVector::zeros(dimension),
        }
    }

    /// The point `scale * e_axis`.
    pub fn on_axis(dimension: usize, axis: usize, scale: i64) -> Self {
        let mut coords = DVector::zeros(dimension);
        if axis < dimension {
            coords[axis] = scale;
        }
        Self { coords }
    }

    pub fn dimension(&self) -> usize {
        self.coords.len()
    }

    pub fn coords(&self) -> &[i64] {
        self.coords.as_slice()
    }

    pub fn as_vector(&self) -> &DVector<i64> {
        &self.coords
    }

    pub fn get(&self, axis: usize) -> Option<i64> {
        self.coords.get(axis).copied()
    }

    /// Sum of absolute coordinate differences.
    #[inline]
    pub fn manhattan_distance(&self, other: &Point) -> i64 {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .map(|(a, b)| (a - b).abs())
            .sum()
    }

    /// Sum of squared coordinate differences, exact on the lattice.
    #[inline]
    pub fn squared_distance(&self, other: &Point) -> i64 {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }
}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coords.as_slice().hash(state);
    }
}

impl From<Vec<i64>> for Point {
    fn from(coords: Vec<i64>) -> Self {
        Self::new(coords)
    }
}

impl<const D: usize> From<[i64; D]> for Point {
    fn from(coords: [i64; D]) -> Self {
        Self::new(coords.to_vec())
    }
}

impl<'a> Sub<&'a Point> for &'a Point {
    type Output = DVector<i64>;

    fn sub(self, rhs: &'a Point) -> DVector<i64> {
        &self.coords - &rhs.coords
    }
}

impl Add<DVector<i64>> for &Point {
    type Output = Point;

    fn add(self, rhs: DVector<i64>) -> Point {
        Point {
            coords: &self.coords + rhs,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.coords.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, ")")
    }
}
