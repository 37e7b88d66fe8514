use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::Validate;

/// Fixed 60-day billing period used as the consumption accounting unit.
pub const BILLING_PERIOD_DAYS: f64 = 60.0;

/// Appliance category, used to pick category-specific saving tips.
/// Free-form tags from upstream forms are normalised with
/// [`ApplianceKind::parse_lossy`]; anything unknown maps to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum ApplianceKind {
    Refrigerator,
    WashingMachine,
    Tv,
    Computer,
    AirConditioner,
    Microwave,
    Iron,
    WaterHeater,
    Blender,
    Other,
}

impl ApplianceKind {
    pub fn parse_lossy(tag: &str) -> Self {
        tag.trim().replace(' ', "_").parse().unwrap_or(Self::Other)
    }
}

/// A single household appliance with its rated power and average daily
/// usage. The validation bounds are for the upstream data-entry layer to
/// enforce; the engine itself assumes records are already well-formed.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApplianceRecord {
    pub name: String,
    pub kind: ApplianceKind,
    /// Rated power in watts, strictly positive.
    #[validate(range(exclusive_min = 0.0))]
    pub power_watts: f64,
    /// Average daily usage in hours, in (0, 24].
    #[validate(range(exclusive_min = 0.0, max = 24.0))]
    pub hours_per_day: f64,
}

impl ApplianceRecord {
    pub fn new(name: impl Into<String>, kind: ApplianceKind, power_watts: f64, hours_per_day: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            power_watts,
            hours_per_day,
        }
    }

    /// Daily consumption in kWh: (W * h) / 1000.
    pub fn daily_energy_kwh(&self) -> f64 {
        self.power_watts * self.hours_per_day / 1000.0
    }

    /// Monthly consumption in kWh (30-day month).
    pub fn monthly_energy_kwh(&self) -> f64 {
        self.daily_energy_kwh() * 30.0
    }

    /// Consumption over the 60-day billing period in kWh.
    pub fn bimonthly_energy_kwh(&self) -> f64 {
        self.daily_energy_kwh() * BILLING_PERIOD_DAYS
    }
}
