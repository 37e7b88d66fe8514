//! Typed result records produced by the engine. One record per entity,
//! keyed by appliance name in `BTreeMap`s so iteration order is stable.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Per-appliance share of the current consumption picture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplianceBreakdown {
    pub power_watts: f64,
    pub hours_per_day: f64,
    pub daily_energy_kwh: f64,
    pub monthly_energy_kwh: f64,
    pub bimonthly_energy_kwh: f64,
    pub bimonthly_cost: f64,
    /// Share of the household total, 0 when the total is 0.
    pub percent_of_total: f64,
}

/// Outcome of the usage-hours optimization for one appliance.
/// All fields are rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub current_hours: f64,
    /// Always within [0, current_hours]: usage only shrinks, never grows.
    pub optimal_hours: f64,
    pub hours_reduction: f64,
    pub current_energy_kwh: f64,
    pub optimal_energy_kwh: f64,
    pub energy_saved_kwh: f64,
    pub money_saved: f64,
}

/// Household-level savings totals. `total_energy_saved_kwh` sums the
/// already-rounded per-appliance figures so the books line up with what
/// the per-appliance records show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSavings {
    pub current_total_kwh: f64,
    pub optimized_total_kwh: f64,
    pub total_energy_saved_kwh: f64,
    pub total_money_saved: f64,
    pub percent_saved: f64,
}

/// One day of the stochastic consumption forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyProjection {
    pub date: NaiveDate,
    pub energy_kwh: f64,
    pub cost: f64,
}

/// Estimated bill for a billing-period consumption, with a ±5% band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingRange {
    pub energy_kwh: f64,
    pub applied_price: f64,
    pub estimated_cost: f64,
    pub range_min: f64,
    pub range_max: f64,
}

/// Accumulation interval for per-appliance energy totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Interval {
    Day,
    Week,
    Month,
}

impl Interval {
    pub fn multiplier(&self) -> f64 {
        match self {
            Interval::Day => 1.0,
            Interval::Week => 7.0,
            Interval::Month => 30.0,
        }
    }

    /// Parse an interval label, falling back to `Day` (multiplier 1) for
    /// anything unrecognised.
    pub fn parse_lossy(label: &str) -> Self {
        label.trim().parse().unwrap_or(Interval::Day)
    }
}

/// Accumulated energy and cost for one appliance over an interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalUsage {
    pub energy_kwh: f64,
    pub cost: f64,
    pub interval: Interval,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_multipliers() {
        assert_eq!(Interval::Day.multiplier(), 1.0);
        assert_eq!(Interval::Week.multiplier(), 7.0);
        assert_eq!(Interval::Month.multiplier(), 30.0);
    }

    #[test]
    fn test_interval_parse_lossy_defaults_to_day() {
        assert_eq!(Interval::parse_lossy("week"), Interval::Week);
        assert_eq!(Interval::parse_lossy("Month"), Interval::Month);
        assert_eq!(Interval::parse_lossy("fortnight"), Interval::Day);
        assert_eq!(Interval::parse_lossy(""), Interval::Day);
    }
}
