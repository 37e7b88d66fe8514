//! Optimization engine facade.
//!
//! An engine instance is built per request from an owned snapshot of the
//! appliance list and a price per kWh, and stays read-only for its
//! lifetime. Every operation is a pure derivation from that snapshot
//! (the consumption projection additionally draws from an RNG).

use std::collections::BTreeMap;

use nalgebra::DVector;
use tracing::{debug, warn};

use crate::domain::{
    round2, AggregateSavings, ApplianceBreakdown, ApplianceRecord, BillingRange, DailyProjection,
    Interval, IntervalUsage, OptimizationResult, BILLING_PERIOD_DAYS,
};
use crate::optimizer::solver::{BoundedConstrainedMinimizer, ProjectedDescentSolver};
use crate::{projection, tariff};

/// Default fractional savings target: reduce consumption by 20%.
pub const DEFAULT_SAVINGS_TARGET: f64 = 0.20;

/// Default consumption-projection horizon, in days.
pub const DEFAULT_PROJECTION_DAYS: u32 = 30;

pub struct OptimizationEngine {
    appliances: Vec<ApplianceRecord>,
    price_per_kwh: f64,
    solver: Box<dyn BoundedConstrainedMinimizer>,
}

impl OptimizationEngine {
    pub fn new(appliances: Vec<ApplianceRecord>, price_per_kwh: f64) -> Self {
        Self::with_solver(appliances, price_per_kwh, Box::<ProjectedDescentSolver>::default())
    }

    pub fn with_solver(
        appliances: Vec<ApplianceRecord>,
        price_per_kwh: f64,
        solver: Box<dyn BoundedConstrainedMinimizer>,
    ) -> Self {
        Self {
            appliances,
            price_per_kwh,
            solver,
        }
    }

    pub fn appliances(&self) -> &[ApplianceRecord] {
        &self.appliances
    }

    pub fn price_per_kwh(&self) -> f64 {
        self.price_per_kwh
    }

    /// Total current consumption over the billing period, in kWh.
    pub fn total_current_energy(&self) -> f64 {
        self.appliances.iter().map(|a| a.bimonthly_energy_kwh()).sum()
    }

    /// Total current cost over the billing period.
    pub fn total_current_cost(&self) -> f64 {
        self.total_current_energy() * self.price_per_kwh
    }

    fn total_daily_energy(&self) -> f64 {
        self.appliances.iter().map(|a| a.daily_energy_kwh()).sum()
    }

    /// Current consumption picture per appliance, including its share of
    /// the household total.
    pub fn per_appliance_breakdown(&self) -> BTreeMap<String, ApplianceBreakdown> {
        let total = self.total_current_energy();

        self.appliances
            .iter()
            .map(|a| {
                let bimonthly = a.bimonthly_energy_kwh();
                let percent_of_total = if total > 0.0 { bimonthly / total * 100.0 } else { 0.0 };
                (
                    a.name.clone(),
                    ApplianceBreakdown {
                        power_watts: a.power_watts,
                        hours_per_day: a.hours_per_day,
                        daily_energy_kwh: a.daily_energy_kwh(),
                        monthly_energy_kwh: a.monthly_energy_kwh(),
                        bimonthly_energy_kwh: bimonthly,
                        bimonthly_cost: bimonthly * self.price_per_kwh,
                        percent_of_total,
                    },
                )
            })
            .collect()
    }

    /// Compute the reduced usage-hours configuration for the given
    /// fractional savings target.
    ///
    /// The solver walks from the current-hours seed onto the
    /// `(1 - target) * current` consumption boundary. If it reports
    /// non-convergence or fails, every appliance's hours are scaled
    /// uniformly by `1 - target` instead; the engine always answers.
    pub fn find_optimal_configuration(
        &self,
        savings_target: f64,
    ) -> BTreeMap<String, OptimizationResult> {
        if self.appliances.is_empty() {
            return BTreeMap::new();
        }

        // kWh contributed per usage hour of each appliance over the
        // billing period.
        let weights = DVector::from_iterator(
            self.appliances.len(),
            self.appliances.iter().map(|a| a.power_watts * BILLING_PERIOD_DAYS / 1000.0),
        );
        let upper_bounds =
            DVector::from_iterator(self.appliances.len(), self.appliances.iter().map(|a| a.hours_per_day));
        let seed = upper_bounds.clone();
        let target_consumption = (1.0 - savings_target) * self.total_current_energy();

        let optimal_hours = match self.solver.minimize(&weights, &upper_bounds, target_consumption, &seed) {
            Ok(solution) if solution.converged => {
                debug!(consumption_target = target_consumption, "solver reached the savings-target boundary");
                solution.hours
            }
            Ok(_) => {
                warn!("solver did not converge, falling back to uniform hours scaling");
                &seed * (1.0 - savings_target)
            }
            Err(error) => {
                warn!(%error, "solver failed, falling back to uniform hours scaling");
                &seed * (1.0 - savings_target)
            }
        };

        self.appliances
            .iter()
            .zip(optimal_hours.iter())
            .map(|(appliance, &hours)| {
                let optimal = hours.clamp(0.0, appliance.hours_per_day);
                let current_energy = appliance.bimonthly_energy_kwh();
                let optimal_energy = appliance.power_watts * optimal * BILLING_PERIOD_DAYS / 1000.0;
                let saved = current_energy - optimal_energy;

                (
                    appliance.name.clone(),
                    OptimizationResult {
                        current_hours: round2(appliance.hours_per_day),
                        optimal_hours: round2(optimal),
                        hours_reduction: round2(appliance.hours_per_day - optimal),
                        current_energy_kwh: round2(current_energy),
                        optimal_energy_kwh: round2(optimal_energy),
                        energy_saved_kwh: round2(saved),
                        money_saved: round2(saved * self.price_per_kwh),
                    },
                )
            })
            .collect()
    }

    /// Combine per-appliance results into household totals. The energy
    /// total sums the already-rounded per-appliance savings so it matches
    /// what those records show.
    pub fn aggregate_savings(
        &self,
        optimal_config: &BTreeMap<String, OptimizationResult>,
    ) -> AggregateSavings {
        let total_saved_kwh: f64 = optimal_config.values().map(|r| r.energy_saved_kwh).sum();
        let current_total = self.total_current_energy();
        let percent_saved = if current_total > 0.0 {
            total_saved_kwh / current_total * 100.0
        } else {
            0.0
        };

        AggregateSavings {
            current_total_kwh: round2(current_total),
            optimized_total_kwh: round2(current_total - total_saved_kwh),
            total_energy_saved_kwh: round2(total_saved_kwh),
            total_money_saved: round2(total_saved_kwh * self.price_per_kwh),
            percent_saved: round2(percent_saved),
        }
    }

    /// Daily consumption forecast over `days` days, drawn from the
    /// process-wide randomness source.
    pub fn project_consumption(&self, days: u32) -> Vec<DailyProjection> {
        projection::project_consumption(self.total_daily_energy(), self.price_per_kwh, days)
    }

    /// Same as [`project_consumption`](Self::project_consumption) but
    /// with a caller-supplied RNG, for reproducible runs.
    pub fn project_consumption_with<R: rand::Rng + ?Sized>(
        &self,
        days: u32,
        rng: &mut R,
    ) -> Vec<DailyProjection> {
        projection::project_consumption_with(self.total_daily_energy(), self.price_per_kwh, days, rng)
    }

    /// Estimated bill for a billing-period consumption under the tiered
    /// tariff schedule.
    pub fn estimate_billing_range(&self, total_energy_kwh: f64) -> BillingRange {
        tariff::estimate_billing_range(total_energy_kwh)
    }

    /// Accumulated energy and cost per appliance over the interval.
    pub fn accumulated_energy_by_interval(&self, interval: Interval) -> BTreeMap<String, IntervalUsage> {
        self.appliances
            .iter()
            .map(|a| {
                let energy = a.daily_energy_kwh() * interval.multiplier();
                (
                    a.name.clone(),
                    IntervalUsage {
                        energy_kwh: round2(energy),
                        cost: round2(energy * self.price_per_kwh),
                        interval,
                    },
                )
            })
            .collect()
    }
}
