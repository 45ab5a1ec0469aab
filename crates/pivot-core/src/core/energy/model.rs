use super::contacts::{PairCounts, first_intersection};
use crate::core::error::ConfigError;
use crate::core::models::point::Point;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Energy assigned to a `strict` configuration with at least one collision.
///
/// `exp(-STRICT_COLLISION_ENERGY)` underflows to exactly `0.0`, so a
/// Metropolis test can never accept a colliding configuration.
pub const STRICT_COLLISION_ENERGY: f64 = 1.0e4;

/// Caller-supplied energy function for the `custom` species.
pub type EnergyFn = Arc<dyn Fn(&[Point]) -> f64 + Send + Sync>;

/// The names under which polymer species are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeciesKind {
    Simple,
    Strict,
    Weak,
    Attract,
    Mixed,
    Custom,
}

impl SpeciesKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeciesKind::Simple => "simple",
            SpeciesKind::Strict => "strict",
            SpeciesKind::Weak => "weak",
            SpeciesKind::Attract => "attract",
            SpeciesKind::Mixed => "mixed",
            SpeciesKind::Custom => "custom",
        }
    }

    pub fn needs_repulsion(&self) -> bool {
        matches!(self, SpeciesKind::Weak | SpeciesKind::Mixed)
    }

    pub fn needs_attraction(&self) -> bool {
        matches!(self, SpeciesKind::Attract | SpeciesKind::Mixed)
    }
}

impl FromStr for SpeciesKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(SpeciesKind::Simple),
            "strict" => Ok(SpeciesKind::Strict),
            "weak" => Ok(SpeciesKind::Weak),
            "attract" => Ok(SpeciesKind::Attract),
            "mixed" => Ok(SpeciesKind::Mixed),
            "custom" => Ok(SpeciesKind::Custom),
            _ => Err(ConfigError::UnknownSpecies(s.to_string())),
        }
    }
}

impl fmt::Display for SpeciesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The energy function of a polymer, one variant per species.
#[derive(Clone)]
pub enum EnergyModel {
    /// Ideal random walk: every configuration has zero energy.
    Simple,
    /// Hard self-avoidance.
    Strict,
    /// Soft self-avoidance, `repulsion × intersections`.
    Weak { repulsion: f64 },
    /// Nearest-neighbour attraction, `−attraction × contacts`.
    Attract { attraction: f64 },
    /// `repulsion × intersections − attraction × contacts`.
    Mixed { repulsion: f64, attraction: f64 },
    Custom(EnergyFn),
}

impl EnergyModel {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[Point]) -> f64 + Send + Sync + 'static,
    {
        EnergyModel::Custom(Arc::new(f))
    }

    /// Resolves a species name and its coefficients into a model.
    ///
    /// Coefficients a species does not use are ignored; coefficients it
    /// needs must be present and finite.
    pub fn from_kind(
        kind: SpeciesKind,
        repulsion: Option<f64>,
        attraction: Option<f64>,
        energy_fn: Option<EnergyFn>,
    ) -> Result<Self, ConfigError> {
        let repulsion = if kind.needs_repulsion() {
            Some(require_finite("repulsion", repulsion)?)
        } else {
            None
        };
        let attraction = if kind.needs_attraction() {
            Some(require_finite("attraction", attraction)?)
        } else {
            None
        };

        Ok(match kind {
            SpeciesKind::Simple => EnergyModel::Simple,
            SpeciesKind::Strict => EnergyModel::Strict,
            SpeciesKind::Weak => EnergyModel::Weak {
                repulsion: repulsion.unwrap_or_default(),
            },
            SpeciesKind::Attract => EnergyModel::Attract {
                attraction: attraction.unwrap_or_default(),
            },
            SpeciesKind::Mixed => EnergyModel::Mixed {
                repulsion: repulsion.unwrap_or_default(),
                attraction: attraction.unwrap_or_default(),
            },
            SpeciesKind::Custom => {
                EnergyModel::Custom(energy_fn.ok_or(ConfigError::MissingParameter("energy_fn"))?)
            }
        })
    }

    pub fn kind(&self) -> SpeciesKind {
        match self {
            EnergyModel::Simple => SpeciesKind::Simple,
            EnergyModel::Strict => SpeciesKind::Strict,
            EnergyModel::Weak { .. } => SpeciesKind::Weak,
            EnergyModel::Attract { .. } => SpeciesKind::Attract,
            EnergyModel::Mixed { .. } => SpeciesKind::Mixed,
            EnergyModel::Custom(_) => SpeciesKind::Custom,
        }
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, EnergyModel::Strict)
    }

    pub fn repulsion(&self) -> Option<f64> {
        match self {
            EnergyModel::Weak { repulsion } | EnergyModel::Mixed { repulsion, .. } => {
                Some(*repulsion)
            }
            _ => None,
        }
    }

    pub fn attraction(&self) -> Option<f64> {
        match self {
            EnergyModel::Attract { attraction } | EnergyModel::Mixed { attraction, .. } => {
                Some(*attraction)
            }
            _ => None,
        }
    }

    pub fn energy(&self, path: &[Point]) -> f64 {
        match self {
            EnergyModel::Simple => 0.0,
            EnergyModel::Strict => {
                if first_intersection(path).is_some() {
                    STRICT_COLLISION_ENERGY
                } else {
                    0.0
                }
            }
            EnergyModel::Weak { repulsion } => {
                repulsion * PairCounts::count_intersections(path) as f64
            }
            EnergyModel::Attract { attraction } => {
                -attraction * PairCounts::count(path).contacts as f64
            }
            EnergyModel::Mixed {
                repulsion,
                attraction,
            } => {
                let counts = PairCounts::count(path);
                repulsion * counts.intersections as f64 - attraction * counts.contacts as f64
            }
            EnergyModel::Custom(f) => f(path),
        }
    }
}

impl fmt::Debug for EnergyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnergyModel::Simple => write!(f, "Simple"),
            EnergyModel::Strict => write!(f, "Strict"),
            EnergyModel::Weak { repulsion } => {
                f.debug_struct("Weak").field("repulsion", repulsion).finish()
            }
            EnergyModel::Attract { attraction } => f
                .debug_struct("Attract")
                .field("attraction", attraction)
                .finish(),
            EnergyModel::Mixed {
                repulsion,
                attraction,
            } => f
                .debug_struct("Mixed")
                .field("repulsion", repulsion)
                .field("attraction", attraction)
                .finish(),
            EnergyModel::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}

fn require_finite(name: &'static str, value: Option<f64>) -> Result<f64, ConfigError> {
    let value = value.ok_or(ConfigError::MissingParameter(name))?;
    if !value.is_finite() {
        return Err(ConfigError::InvalidParameter {
            name,
            reason: format!("{} is not a finite number", value),
        });
    }
    Ok(value)
}
