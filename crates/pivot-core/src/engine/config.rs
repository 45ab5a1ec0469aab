use crate::core::error::ConfigError;
use crate::core::symmetry::SymmetryGroup;
use serde::Deserialize;

pub const DEFAULT_REPORT_INTERVAL: u64 = 100;

/// Settings of a mixing sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MixConfig {
    /// Group the pivot operators are drawn from.
    pub symmetry: SymmetryGroup,
    /// Iterations between progress events; `0` disables intermediate events.
    pub report_interval: u64,
}

impl Default for MixConfig {
    fn default() -> Self {
        Self {
            symmetry: SymmetryGroup::Full,
            report_interval: DEFAULT_REPORT_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SamplingConfig {
    pub burn_in_iterations: u64,
    pub samples: usize,
    pub iterations_per_sample: u64,
    /// `None` seeds the generator from system entropy.
    pub seed: Option<u64>,
    pub mixing: MixConfig,
}

#[derive(Default)]
pub struct SamplingConfigBuilder {
    burn_in_iterations: Option<u64>,
    samples: Option<usize>,
    iterations_per_sample: Option<u64>,
    seed: Option<u64>,
    symmetry: Option<SymmetryGroup>,
    report_interval: Option<u64>,
}

impl SamplingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn burn_in_iterations(mut self, iterations: u64) -> Self {
        self.burn_in_iterations = Some(iterations);
        self
    }
    pub fn samples(mut self, samples: usize) -> Self {
        self.samples = Some(samples);
        self
    }
    pub fn iterations_per_sample(mut self, iterations: u64) -> Self {
        self.iterations_per_sample = Some(iterations);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn symmetry(mut self, group: SymmetryGroup) -> Self {
        self.symmetry = Some(group);
        self
    }
    pub fn report_interval(mut self, interval: u64) -> Self {
        self.report_interval = Some(interval);
        self
    }

    pub fn build(self) -> Result<SamplingConfig, ConfigError> {
        let samples = self
            .samples
            .ok_or(ConfigError::MissingParameter("samples"))?;
        if samples == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "samples",
                reason: "at least one sample is required".to_string(),
            });
        }
        let iterations_per_sample = self
            .iterations_per_sample
            .ok_or(ConfigError::MissingParameter("iterations_per_sample"))?;
        if iterations_per_sample == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "iterations_per_sample",
                reason: "samples must be separated by at least one iteration".to_string(),
            });
        }

        let defaults = MixConfig::default();
        Ok(SamplingConfig {
            burn_in_iterations: self
                .burn_in_iterations
                .ok_or(ConfigError::MissingParameter("burn_in_iterations"))?,
            samples,
            iterations_per_sample,
            seed: self.seed,
            mixing: MixConfig {
                symmetry: self.symmetry.unwrap_or(defaults.symmetry),
                report_interval: self.report_interval.unwrap_or(defaults.report_interval),
            },
        })
    }
}
