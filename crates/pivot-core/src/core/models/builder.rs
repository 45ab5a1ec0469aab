use super::point::Point;
use super::polymer::Polymer;
use crate::core::energy::contacts::first_intersection;
use crate::core::energy::model::{EnergyFn, EnergyModel, SpeciesKind};
use crate::core::error::ConfigError;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_DIMENSION: usize = 2;

/// Plain, deserializable description of a polymer.
///
/// A `custom` species cannot be described this way because its energy
/// function is code; attach it with [`PolymerBuilder::energy_fn`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainParameters {
    pub steps: Option<usize>,
    pub path: Option<Vec<Vec<i64>>>,
    pub dimension: Option<usize>,
    #[serde(default = "default_species")]
    pub species: SpeciesKind,
    pub repulsion: Option<f64>,
    pub attraction: Option<f64>,
}

fn default_species() -> SpeciesKind {
    SpeciesKind::Strict
}

#[derive(Default)]
pub struct PolymerBuilder {
    steps: Option<usize>,
    path: Option<Vec<Point>>,
    dimension: Option<usize>,
    species: Option<SpeciesKind>,
    species_name: Option<String>,
    repulsion: Option<f64>,
    attraction: Option<f64>,
    energy_fn: Option<EnergyFn>,
}

impl PolymerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parameters(params: &ChainParameters) -> Self {
        Self {
            steps: params.steps,
            path: params
                .path
                .as_ref()
                .map(|points| points.iter().cloned().map(Point::new).collect()),
            dimension: params.dimension,
            species: Some(params.species),
            species_name: None,
            repulsion: params.repulsion,
            attraction: params.attraction,
            energy_fn: None,
        }
    }

    /// Straight walk `path[i] = i · e1` with `steps` points.
    pub fn steps(mut self, steps: usize) -> Self {
        self.steps = Some(steps);
        self
    }
    pub fn path(mut self, path: Vec<Point>) -> Self {
        self.path = Some(path);
        self
    }
    pub fn dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }
    pub fn species(mut self, species: SpeciesKind) -> Self {
        self.species = Some(species);
        self
    }
    /// Species given by name; unknown names fail in [`build`](Self::build).
    pub fn species_name(mut self, name: impl Into<String>) -> Self {
        self.species_name = Some(name.into());
        self
    }
    pub fn repulsion(mut self, repulsion: f64) -> Self {
        self.repulsion = Some(repulsion);
        self
    }
    pub fn attraction(mut self, attraction: f64) -> Self {
        self.attraction = Some(attraction);
        self
    }
    pub fn energy_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&[Point]) -> f64 + Send + Sync + 'static,
    {
        self.energy_fn = Some(Arc::new(f));
        self
    }

    pub fn build(self) -> Result<Polymer, ConfigError> {
        let named = self
            .species_name
            .as_deref()
            .map(str::parse::<SpeciesKind>)
            .transpose()?;
        let kind = match (self.species, named) {
            (Some(kind), Some(named)) if kind != named => {
                return Err(ConfigError::InvalidParameter {
                    name: "species",
                    reason: format!("species {} conflicts with species name {}", kind, named),
                });
            }
            (Some(kind), _) | (None, Some(kind)) => kind,
            (None, None) if self.energy_fn.is_some() => SpeciesKind::Custom,
            (None, None) => SpeciesKind::Strict,
        };
        if self.energy_fn.is_some() && kind != SpeciesKind::Custom {
            return Err(ConfigError::InvalidParameter {
                name: "energy_fn",
                reason: format!("an energy function requires the custom species, not {}", kind),
            });
        }

        let (path, dimension) = match self.path {
            Some(path) => {
                if path.is_empty() {
                    return Err(ConfigError::EmptyPath);
                }
                if let Some(steps) = self.steps {
                    if steps != path.len() {
                        return Err(ConfigError::StepsMismatch {
                            steps,
                            path_len: path.len(),
                        });
                    }
                }
                let dimension = self.dimension.unwrap_or_else(|| path[0].dimension());
                validate_dimension(dimension)?;
                if let Some((index, point)) = path
                    .iter()
                    .enumerate()
                    .find(|(_, p)| p.dimension() != dimension)
                {
                    return Err(ConfigError::PointDimensionMismatch {
                        index,
                        expected: dimension,
                        found: point.dimension(),
                    });
                }
                (path, dimension)
            }
            None => {
                let steps = self.steps.ok_or(ConfigError::MissingParameter("steps"))?;
                if steps == 0 {
                    return Err(ConfigError::EmptyPath);
                }
                let dimension = self.dimension.unwrap_or(DEFAULT_DIMENSION);
                validate_dimension(dimension)?;
                let path = (0..steps)
                    .map(|i| Point::on_axis(dimension, 0, i as i64))
                    .collect();
                (path, dimension)
            }
        };

        let model = EnergyModel::from_kind(kind, self.repulsion, self.attraction, self.energy_fn)?;

        if model.is_strict() {
            if let Some((first, second)) = first_intersection(&path) {
                return Err(ConfigError::SelfIntersectingPath { first, second });
            }
        }

        debug!(
            steps = path.len(),
            dimension,
            species = %kind,
            "Building polymer."
        );
        Ok(Polymer::from_parts(path, dimension, model))
    }
}

fn validate_dimension(dimension: usize) -> Result<(), ConfigError> {
    if dimension == 0 {
        return Err(ConfigError::InvalidDimension(dimension));
    }
    Ok(())
}
