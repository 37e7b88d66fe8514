//! Stochastic daily consumption projection.
//!
//! Each projected day multiplies the baseline daily consumption by an
//! independent factor drawn from Uniform[0.9, 1.1]. The default entry
//! point draws from the process-wide randomness source; callers who need
//! reproducible runs pass their own RNG.

use chrono::{Duration, Local};
use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::domain::{round2, DailyProjection};

const VARIATION_MIN: f64 = 0.9;
const VARIATION_MAX: f64 = 1.1;

/// Project `days` daily consumption entries starting today, using the
/// process-wide RNG.
pub fn project_consumption(baseline_daily_kwh: f64, price_per_kwh: f64, days: u32) -> Vec<DailyProjection> {
    project_consumption_with(baseline_daily_kwh, price_per_kwh, days, &mut rand::thread_rng())
}

/// Same projection with a caller-supplied RNG.
pub fn project_consumption_with<R: Rng + ?Sized>(
    baseline_daily_kwh: f64,
    price_per_kwh: f64,
    days: u32,
    rng: &mut R,
) -> Vec<DailyProjection> {
    let variation = Uniform::new_inclusive(VARIATION_MIN, VARIATION_MAX);
    let start = Local::now().date_naive();

    (0..days)
        .map(|day| {
            let energy = baseline_daily_kwh * variation.sample(rng);
            DailyProjection {
                date: start + Duration::days(i64::from(day)),
                energy_kwh: round2(energy),
                cost: round2(energy * price_per_kwh),
            }
        })
        .collect()
}
