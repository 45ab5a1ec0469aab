use super::config::MixConfig;
use super::error::EngineError;
use super::pivot::{PivotOutcome, RejectionReason, attempt_pivot};
use super::progress::{Progress, ProgressReporter};
use super::utils::sampling::sample_pivot_index;
use crate::core::models::polymer::Polymer;
use crate::core::symmetry::{SymmetryOperator, validate_group};
use rand::Rng;
use serde::Serialize;
use std::ops::AddAssign;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, instrument, warn};

/// Cooperative stop signal for long sweeps, checked once per iteration.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MixReport {
    pub requested: u64,
    pub attempted: u64,
    pub accepted: u64,
    /// Pivots whose operator fixed every suffix point.
    pub unchanged: u64,
    /// Strict rejections caused by a suffix landing on the prefix.
    pub collisions: u64,
    pub cancelled: bool,
}

impl MixReport {
    pub fn acceptance_ratio(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.accepted as f64 / self.attempted as f64
        }
    }

    fn record(&mut self, outcome: &PivotOutcome) {
        self.attempted += 1;
        match outcome {
            PivotOutcome::Accepted { .. } => self.accepted += 1,
            PivotOutcome::Unchanged => self.unchanged += 1,
            PivotOutcome::Rejected(RejectionReason::Collision { .. }) => self.collisions += 1,
            PivotOutcome::Rejected(RejectionReason::Metropolis { .. }) => {}
        }
    }
}

impl AddAssign for MixReport {
    fn add_assign(&mut self, other: Self) {
        self.requested += other.requested;
        self.attempted += other.attempted;
        self.accepted += other.accepted;
        self.unchanged += other.unchanged;
        self.collisions += other.collisions;
        self.cancelled |= other.cancelled;
    }
}

/// The Monte Carlo sweep loop.
pub struct Mixer<'a> {
    config: MixConfig,
    reporter: &'a ProgressReporter<'a>,
    cancellation: Option<CancellationToken>,
}

impl<'a> Mixer<'a> {
    pub fn new(config: MixConfig, reporter: &'a ProgressReporter<'a>) -> Self {
        Self {
            config,
            reporter,
            cancellation: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn config(&self) -> &MixConfig {
        &self.config
    }

    /// Runs `iterations` pivot attempts on `polymer`.
    ///
    /// Each iteration draws a pivot site uniformly from `[0, len - 1)` and a
    /// non-identity operator from the configured group, then keeps whatever
    /// configuration the pivot engine leaves behind.
    #[instrument(skip_all, name = "mixing_sweep", fields(iterations = iterations, steps = polymer.len()))]
    pub fn mix<R: Rng + ?Sized>(
        &self,
        polymer: &mut Polymer,
        iterations: u64,
        rng: &mut R,
    ) -> Result<MixReport, EngineError> {
        let mut report = MixReport {
            requested: iterations,
            ..MixReport::default()
        };
        let steps = polymer.len();
        let dimension = polymer.dimension();
        validate_group(dimension, self.config.symmetry)?;

        if steps < 2 {
            warn!(steps, "Polymer has no pivot site; skipping sweep.");
            return Ok(report);
        }

        self.reporter.report(Progress::SweepStart { iterations });

        let interval = self.config.report_interval;
        let mut last_reported = 0;
        for n in 0..iterations {
            if self.is_cancelled() {
                info!(completed = n, "Mixing sweep cancelled.");
                report.cancelled = true;
                break;
            }

            let index = sample_pivot_index(steps, rng).ok_or_else(|| {
                EngineError::Internal(format!("no pivot site in a chain of {} points", steps))
            })?;
            let operator = SymmetryOperator::random(dimension, self.config.symmetry, rng)?;
            if operator.is_identity() {
                return Err(EngineError::Internal(
                    "symmetry generator produced the identity operator".to_string(),
                ));
            }

            let outcome = attempt_pivot(polymer, index, &operator, rng)?;
            report.record(&outcome);

            let done = n + 1;
            if interval > 0 && done % interval == 0 {
                self.reporter.report(Progress::SweepAdvance {
                    iterations: done - last_reported,
                    accepted: report.accepted,
                });
                last_reported = done;
                debug!(
                    iteration = done,
                    accepted = report.accepted,
                    energy = polymer.energy(),
                    "Mixing progress."
                );
            }
        }

        if report.attempted > last_reported {
            self.reporter.report(Progress::SweepAdvance {
                iterations: report.attempted - last_reported,
                accepted: report.accepted,
            });
        }
        self.reporter.report(Progress::SweepFinish {
            attempted: report.attempted,
            accepted: report.accepted,
        });

        info!(
            attempted = report.attempted,
            accepted = report.accepted,
            acceptance_ratio = report.acceptance_ratio(),
            "Mixing sweep complete."
        );
        Ok(report)
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

/// Runs a sweep with the default configuration and no progress listener.
pub fn mix<R: Rng + ?Sized>(
    polymer: &mut Polymer,
    iterations: u64,
    rng: &mut R,
) -> Result<MixReport, EngineError> {
    let reporter = ProgressReporter::new();
    Mixer::new(MixConfig::default(), &reporter).mix(polymer, iterations, rng)
}
