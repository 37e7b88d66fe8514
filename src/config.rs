use anyhow::Result;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub pricing: PricingConfig,
    pub optimizer: OptimizerConfig,
    pub projection: ProjectionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Fallback price per kWh when no billing history supplies one.
    pub default_price_per_kwh: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptimizerConfig {
    /// Fractional savings target, must lie in (0, 1).
    pub savings_target: f64,
    pub solver_max_iterations: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectionConfig {
    pub default_days: u32,
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("WATTWISE__").split("__"));
        Ok(figment.extract()?)
    }
}
