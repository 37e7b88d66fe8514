//! Bounded constrained minimizer behind the optimization engine.
//!
//! The consumption objective E(h) = Σ w_i·h_i is linear over the box
//! [0, upper_i], so its literal minimum is the all-zero vector and a
//! general nonlinear solver is overkill. The problem the engine actually
//! wants solved is reaching the savings-target boundary: starting from
//! the current-hours seed, walk down the consumption gradient and land
//! exactly on target consumption. Linearity makes the final landing an
//! exact interpolation, not an approximation.
//!
//! The trait seam lets a different numerical backend be substituted
//! without touching the engine.

use nalgebra::DVector;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("dimension mismatch: {weights} weights vs {bounds} bounds")]
    DimensionMismatch { weights: usize, bounds: usize },

    #[error("failed to reach the consumption target within {0} iterations")]
    NonConvergence(usize),
}

/// Solution vector plus whether the target boundary was actually reached.
#[derive(Debug, Clone)]
pub struct Solution {
    pub hours: DVector<f64>,
    pub converged: bool,
}

/// Minimizes a nonnegative linear consumption objective over a box with a
/// single consumption-target constraint, seeded from the current point.
pub trait BoundedConstrainedMinimizer {
    /// `weights`: kWh contributed per usage hour of each variable over the
    /// billing period. `upper_bounds`: per-variable usage ceiling (the
    /// lower bound is 0). `target`: the consumption value to land on.
    /// `seed`: starting point, assumed within the box.
    fn minimize(
        &self,
        weights: &DVector<f64>,
        upper_bounds: &DVector<f64>,
        target: f64,
        seed: &DVector<f64>,
    ) -> Result<Solution, SolverError>;
}

/// Projected gradient descent with exact interpolation onto the target
/// boundary. Each step moves along the (constant) gradient, clamps to the
/// box, and once the step crosses the target the solution is pulled back
/// onto the boundary along the last segment.
#[derive(Debug, Clone)]
pub struct ProjectedDescentSolver {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for ProjectedDescentSolver {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-9,
        }
    }
}

impl ProjectedDescentSolver {
    pub fn new(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..Self::default()
        }
    }

    fn consumption(weights: &DVector<f64>, hours: &DVector<f64>) -> f64 {
        weights.dot(hours)
    }

    fn clamp_to_box(hours: &mut DVector<f64>, upper_bounds: &DVector<f64>) {
        for (h, ub) in hours.iter_mut().zip(upper_bounds.iter()) {
            *h = h.clamp(0.0, *ub);
        }
    }
}

impl BoundedConstrainedMinimizer for ProjectedDescentSolver {
    fn minimize(
        &self,
        weights: &DVector<f64>,
        upper_bounds: &DVector<f64>,
        target: f64,
        seed: &DVector<f64>,
    ) -> Result<Solution, SolverError> {
        if weights.len() != upper_bounds.len() || weights.len() != seed.len() {
            return Err(SolverError::DimensionMismatch {
                weights: weights.len(),
                bounds: upper_bounds.len(),
            });
        }

        let mut hours = seed.clone();
        Self::clamp_to_box(&mut hours, upper_bounds);

        let mut current = Self::consumption(weights, &hours);
        if current <= target + self.tolerance {
            // Seed already satisfies the target.
            return Ok(Solution { hours, converged: true });
        }

        for iteration in 0..self.max_iterations {
            // Step over the variables still free to move. Restricting the
            // gradient norm to the active set makes the step land exactly
            // on the target unless another variable hits zero first, so
            // the loop needs at most one iteration per variable.
            let active_norm_sq: f64 = weights
                .iter()
                .zip(hours.iter())
                .filter(|(_, h)| **h > 0.0)
                .map(|(w, _)| w * w)
                .sum();
            if active_norm_sq <= 0.0 {
                // Zero objective over the remaining variables; consumption
                // cannot move any further.
                return Err(SolverError::NonConvergence(iteration));
            }

            let step = (current - target) / active_norm_sq;
            let mut next = &hours - weights * step;
            Self::clamp_to_box(&mut next, upper_bounds);

            let next_consumption = Self::consumption(weights, &next);
            if next_consumption <= target + self.tolerance {
                // Crossed (or reached) the boundary: E is linear on the
                // segment between the two clamped points, so interpolate
                // back onto the target exactly.
                let span = current - next_consumption;
                if span > self.tolerance {
                    let t = (current - target) / span;
                    hours = &hours + (&next - &hours) * t;
                } else {
                    hours = next;
                }
                Self::clamp_to_box(&mut hours, upper_bounds);
                return Ok(Solution { hours, converged: true });
            }

            if next_consumption >= current - self.tolerance {
                // Clamping absorbed the whole step; no further progress.
                return Err(SolverError::NonConvergence(self.max_iterations));
            }

            hours = next;
            current = next_consumption;
        }

        Err(SolverError::NonConvergence(self.max_iterations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dvector;

    fn solve(weights: DVector<f64>, upper: DVector<f64>, target: f64) -> Solution {
        let solver = ProjectedDescentSolver::default();
        let seed = upper.clone();
        solver.minimize(&weights, &upper, target, &seed).unwrap()
    }

    #[test]
    fn test_single_variable_lands_on_target() {
        // 100 W over 60 days: 6 kWh per usage hour. Current 60 kWh, 20%
        // reduction target 48 kWh -> 8 h.
        let solution = solve(dvector![6.0], dvector![10.0], 48.0);
        assert!(solution.converged);
        assert!((solution.hours[0] - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_multi_variable_lands_on_boundary() {
        let weights = dvector![6.0, 12.0, 3.0];
        let upper = dvector![10.0, 5.0, 8.0];
        let current = weights.dot(&upper);
        let target = current * 0.75;

        let solution = solve(weights.clone(), upper.clone(), target);
        assert!(solution.converged);
        assert!((weights.dot(&solution.hours) - target).abs() < 1e-6);
        for (h, ub) in solution.hours.iter().zip(upper.iter()) {
            assert!(*h >= 0.0 && *h <= *ub + 1e-9);
        }
    }

    #[test]
    fn test_seed_below_target_is_returned_unchanged() {
        let weights = dvector![6.0];
        let upper = dvector![10.0];
        let seed = dvector![4.0]; // 24 kWh, already below a 30 kWh target
        let solver = ProjectedDescentSolver::default();
        let solution = solver.minimize(&weights, &upper, 30.0, &seed).unwrap();
        assert!(solution.converged);
        assert_eq!(solution.hours[0], 4.0);
    }

    #[test]
    fn test_deep_target_requires_clamped_steps() {
        // Very uneven weights force the first exact-landing step to clamp
        // the heavy variable at zero and iterate.
        let weights = dvector![100.0, 1.0];
        let upper = dvector![1.0, 50.0];
        let current = weights.dot(&upper); // 150
        let target = 10.0; // only reachable with the heavy variable at 0

        let solution = solve(weights.clone(), upper, target);
        assert!(solution.converged);
        assert!((weights.dot(&solution.hours) - target).abs() < 1e-6);
        assert!(current > target);
    }

    #[test]
    fn test_dimension_mismatch() {
        let solver = ProjectedDescentSolver::default();
        let err = solver
            .minimize(&dvector![1.0, 2.0], &dvector![1.0], 0.5, &dvector![1.0])
            .unwrap_err();
        assert!(matches!(err, SolverError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_zero_weights_do_not_converge() {
        let solver = ProjectedDescentSolver::default();
        let err = solver
            .minimize(&dvector![0.0, 0.0], &dvector![5.0, 5.0], -1.0, &dvector![5.0, 5.0])
            .unwrap_err();
        assert!(matches!(err, SolverError::NonConvergence(_)));
    }
}
