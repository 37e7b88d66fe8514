//! Tiered tariff schedule.
//!
//! The schedule is a flat-tier model: the whole billing-period consumption
//! is billed at the single rate of the bracket it falls in, not marginally
//! per bracket. Breakpoints and rates are fixed.

use once_cell::sync::Lazy;

use crate::domain::{round2, BillingRange};

/// One tariff bracket: consumption up to `upper_bound_kwh` is billed at
/// `price_per_kwh`. Prices are non-decreasing across brackets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TariffBand {
    pub upper_bound_kwh: f64,
    pub price_per_kwh: f64,
}

/// Fixed bimonthly tariff table. The last band is open-ended.
pub static TARIFF_BANDS: Lazy<Vec<TariffBand>> = Lazy::new(|| {
    vec![
        TariffBand { upper_bound_kwh: 150.0, price_per_kwh: 0.82 },
        TariffBand { upper_bound_kwh: 280.0, price_per_kwh: 1.05 },
        TariffBand { upper_bound_kwh: 400.0, price_per_kwh: 1.35 },
        TariffBand { upper_bound_kwh: 600.0, price_per_kwh: 1.85 },
        TariffBand { upper_bound_kwh: f64::INFINITY, price_per_kwh: 2.85 },
    ]
});

/// Rate applied to the given billing-period consumption.
pub fn applied_price(energy_kwh: f64) -> f64 {
    TARIFF_BANDS
        .iter()
        .find(|band| energy_kwh <= band.upper_bound_kwh)
        .map(|band| band.price_per_kwh)
        .unwrap_or_else(|| {
            // Unreachable with the open-ended last band, but never panic
            // over a price lookup.
            TARIFF_BANDS.last().map(|b| b.price_per_kwh).unwrap_or(0.0)
        })
}

/// Estimated bill for the consumption, with a symmetric ±5% band.
pub fn estimate_billing_range(energy_kwh: f64) -> BillingRange {
    let price = applied_price(energy_kwh);
    let estimated_cost = energy_kwh * price;

    BillingRange {
        energy_kwh: round2(energy_kwh),
        applied_price: price,
        estimated_cost: round2(estimated_cost),
        range_min: round2(estimated_cost * 0.95),
        range_max: round2(estimated_cost * 1.05),
    }
}
