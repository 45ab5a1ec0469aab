use rand::Rng;
use tracing::instrument;

/// Probability that the Metropolis rule accepts a move with energy change `delta_energy`.
///
/// NaN energy changes are never accepted.
pub fn acceptance_probability(delta_energy: f64) -> f64 {
    if delta_energy.is_nan() {
        0.0
    } else if delta_energy <= 0.0 {
        1.0
    } else {
        (-delta_energy).exp()
    }
}

/// Metropolis-Hastings test at unit temperature.
///
/// Downhill and level moves are accepted without consuming randomness;
/// uphill moves draw `r ∈ [0, 1)` and are accepted iff `r < exp(-ΔE)`.
#[instrument(level = "trace", skip_all, fields(delta_energy = delta_energy))]
pub fn metropolis_accept<R: Rng + ?Sized>(delta_energy: f64, rng: &mut R) -> bool {
    if delta_energy.is_nan() {
        return false;
    }
    if delta_energy <= 0.0 {
        return true;
    }
    rng.r#gen::<f64>() < acceptance_probability(delta_energy)
}

/// Uniform pivot site in `[0, steps - 1)`, or `None` when the chain has no pivot site.
pub fn sample_pivot_index<R: Rng + ?Sized>(steps: usize, rng: &mut R) -> Option<usize> {
    if steps < 2 {
        return None;
    }
    Some(rng.gen_range(0..steps - 1))
}
