use anyhow::{Context, Result};
use figment::{providers::{Format, Toml}, Figment};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use wattwise::config::Config;
use wattwise::domain::ApplianceRecord;
use wattwise::report::SavingsReport;
use wattwise::optimizer::ProjectedDescentSolver;
use wattwise::telemetry::init_tracing;
use wattwise::OptimizationEngine;

#[derive(Debug, Deserialize)]
struct ApplianceFile {
    appliances: Vec<ApplianceRecord>,
}

fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load()?;

    if !(0.0..1.0).contains(&cfg.optimizer.savings_target) || cfg.optimizer.savings_target == 0.0 {
        anyhow::bail!(
            "optimizer.savings_target must lie in (0, 1), got {}",
            cfg.optimizer.savings_target
        );
    }

    let household: ApplianceFile = Figment::new()
        .merge(Toml::file("config/appliances.toml"))
        .extract()
        .context("reading config/appliances.toml")?;

    for appliance in &household.appliances {
        appliance
            .validate()
            .with_context(|| format!("invalid appliance record '{}'", appliance.name))?;
    }

    info!(
        appliances = household.appliances.len(),
        price_per_kwh = cfg.pricing.default_price_per_kwh,
        "running optimization"
    );

    let engine = OptimizationEngine::with_solver(
        household.appliances,
        cfg.pricing.default_price_per_kwh,
        Box::new(ProjectedDescentSolver::new(cfg.optimizer.solver_max_iterations)),
    );
    let report = SavingsReport::generate(
        &engine,
        cfg.optimizer.savings_target,
        cfg.projection.default_days,
    );

    info!(
        current_kwh = report.savings.current_total_kwh,
        saved_kwh = report.savings.total_energy_saved_kwh,
        percent_saved = report.savings.percent_saved,
        "optimization complete"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
