use crate::core::error::ConfigError;
use crate::core::models::point::Point;
use serde::Deserialize;

/// An `L^p` norm with order `p ∈ [1, ∞]`.
///
/// `p = ∞` is the maximum absolute coordinate difference, which is what
/// bounding-box sizing uses.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "f64")]
pub struct Norm {
    order: f64,
}

impl Norm {
    pub const MANHATTAN: Norm = Norm { order: 1.0 };
    pub const EUCLIDEAN: Norm = Norm { order: 2.0 };
    pub const MAX: Norm = Norm {
        order: f64::INFINITY,
    };

    pub fn new(order: f64) -> Result<Self, ConfigError> {
        if order.is_nan() || order < 1.0 {
            return Err(ConfigError::InvalidNormOrder(order));
        }
        Ok(Self { order })
    }

    pub fn order(&self) -> f64 {
        self.order
    }

    pub fn of<I>(&self, components: I) -> f64
    where
        I: IntoIterator<Item = i64>,
    {
        let abs = components.into_iter().map(|c| c.unsigned_abs() as f64);
        if self.order.is_infinite() {
            abs.fold(0.0, f64::max)
        } else if self.order == 1.0 {
            abs.sum()
        } else if self.order == 2.0 {
            abs.map(|c| c * c).sum::<f64>().sqrt()
        } else {
            // Components are scaled into [0, 1] before raising to `p`.
            let abs: Vec<f64> = abs.collect();
            let largest = abs.iter().copied().fold(0.0, f64::max);
            if largest == 0.0 {
                return 0.0;
            }
            largest
                * abs
                    .iter()
                    .map(|c| (c / largest).powf(self.order))
                    .sum::<f64>()
                    .powf(self.order.recip())
        }
    }

    pub fn distance(&self, a: &Point, b: &Point) -> f64 {
        self.of(
            a.coords()
                .iter()
                .zip(b.coords().iter())
                .map(|(x, y)| x - y),
        )
    }
}

impl Default for Norm {
    fn default() -> Self {
        Self::EUCLIDEAN
    }
}

impl TryFrom<f64> for Norm {
    type Error = ConfigError;

    fn try_from(order: f64) -> Result<Self, Self::Error> {
        Norm::new(order)
    }
}
