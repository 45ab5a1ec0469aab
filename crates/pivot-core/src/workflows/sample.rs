use crate::core::energy::contacts::PairCounts;
use crate::core::models::polymer::Polymer;
use crate::core::utils::geometry::Norm;
use crate::engine::config::SamplingConfig;
use crate::engine::error::EngineError;
use crate::engine::mixing::{CancellationToken, MixReport, Mixer};
use crate::engine::progress::{Progress, ProgressReporter};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{info, instrument};

/// Measurements taken on one decorrelated configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    /// Total iterations completed when the configuration was measured,
    /// burn-in included.
    pub iteration: u64,
    pub energy: f64,
    pub end_to_end_distance: f64,
    pub squared_end_to_end_distance: i64,
    pub contacts: usize,
    pub intersections: usize,
}

impl Observation {
    fn measure(polymer: &Polymer, iteration: u64) -> Self {
        let counts = PairCounts::count(polymer.path());
        Self {
            iteration,
            energy: polymer.energy(),
            end_to_end_distance: polymer.end_to_end_distance(Norm::EUCLIDEAN),
            squared_end_to_end_distance: polymer.squared_end_to_end_distance(),
            contacts: counts.contacts,
            intersections: counts.intersections,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SamplingResult {
    pub observations: Vec<Observation>,
    pub burn_in: MixReport,
    /// Burn-in and measurement sweeps combined.
    pub mixing: MixReport,
}

impl SamplingResult {
    pub fn mean_energy(&self) -> Option<f64> {
        self.mean_of(|o| o.energy)
    }

    pub fn mean_squared_end_to_end_distance(&self) -> Option<f64> {
        self.mean_of(|o| o.squared_end_to_end_distance as f64)
    }

    pub fn mean_end_to_end_distance(&self) -> Option<f64> {
        self.mean_of(|o| o.end_to_end_distance)
    }

    pub fn mean_contacts(&self) -> Option<f64> {
        self.mean_of(|o| o.contacts as f64)
    }

    fn mean_of(&self, f: impl Fn(&Observation) -> f64) -> Option<f64> {
        if self.observations.is_empty() {
            return None;
        }
        let sum: f64 = self.observations.iter().map(f).sum();
        Some(sum / self.observations.len() as f64)
    }
}

/// Equilibrates `polymer` and then records `config.samples` observations,
/// each after `config.iterations_per_sample` further pivot attempts.
///
/// A cancelled run returns the observations gathered so far with the
/// report's `cancelled` flag set.
#[instrument(skip_all, name = "sampling_workflow", fields(steps = polymer.len()))]
pub fn run(
    polymer: &mut Polymer,
    config: &SamplingConfig,
    reporter: &ProgressReporter,
    cancellation: Option<&CancellationToken>,
) -> Result<SamplingResult, EngineError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut mixer = Mixer::new(config.mixing, reporter);
    if let Some(token) = cancellation {
        mixer = mixer.with_cancellation(token.clone());
    }

    // === Phase 1: Burn-in ===
    reporter.report(Progress::PhaseStart { name: "Burn-in" });
    info!(
        iterations = config.burn_in_iterations,
        species = %polymer.species(),
        "Equilibrating polymer."
    );
    let burn_in = mixer.mix(polymer, config.burn_in_iterations, &mut rng)?;
    reporter.report(Progress::PhaseFinish);

    let mut mixing = burn_in;
    let mut observations = Vec::with_capacity(config.samples);

    // === Phase 2: Measurement ===
    if !burn_in.cancelled {
        reporter.report(Progress::PhaseStart { name: "Sampling" });
        info!(
            samples = config.samples,
            iterations_per_sample = config.iterations_per_sample,
            "Recording observations."
        );

        for sample in 0..config.samples {
            let sweep = mixer.mix(polymer, config.iterations_per_sample, &mut rng)?;
            mixing += sweep;
            if sweep.cancelled {
                break;
            }
            observations.push(Observation::measure(polymer, mixing.attempted));
            reporter.report(Progress::SampleRecorded {
                index: sample + 1,
                total: config.samples,
            });
        }

        reporter.report(Progress::PhaseFinish);
    }

    if mixing.cancelled && reporter.is_listening() {
        reporter.report(Progress::Message(format!(
            "Sampling cancelled after {} observation(s).",
            observations.len()
        )));
    }

    let result = SamplingResult {
        observations,
        burn_in,
        mixing,
    };
    info!(
        observations = result.observations.len(),
        acceptance_ratio = result.mixing.acceptance_ratio(),
        mean_energy = result.mean_energy(),
        "Sampling complete."
    );
    Ok(result)
}
