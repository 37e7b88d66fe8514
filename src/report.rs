//! One-run savings report: a serialisable envelope around everything the
//! engine derives for a household snapshot. The caller decides whether
//! and where to persist it.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    AggregateSavings, ApplianceBreakdown, BillingRange, DailyProjection, OptimizationResult,
};
use crate::optimizer::OptimizationEngine;
use crate::recommendations::{
    environmental_impact, time_of_use_tips, ActionPlan, EnvironmentalImpact,
    RecommendationBuilder, RecommendationSet, TimeOfUseTips,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsReport {
    pub id: Uuid,
    pub generated_at: DateTime<FixedOffset>,
    pub price_per_kwh: f64,
    pub savings_target: f64,
    pub breakdown: BTreeMap<String, ApplianceBreakdown>,
    pub optimal_config: BTreeMap<String, OptimizationResult>,
    pub savings: AggregateSavings,
    pub billing: BillingRange,
    pub projection: Vec<DailyProjection>,
    pub recommendations: RecommendationSet,
    pub action_plan: ActionPlan,
    pub time_of_use: TimeOfUseTips,
    pub environmental_impact: EnvironmentalImpact,
}

impl SavingsReport {
    pub fn generate(engine: &OptimizationEngine, savings_target: f64, projection_days: u32) -> Self {
        let breakdown = engine.per_appliance_breakdown();
        let optimal_config = engine.find_optimal_configuration(savings_target);
        let savings = engine.aggregate_savings(&optimal_config);
        let billing = engine.estimate_billing_range(engine.total_current_energy());
        let projection = engine.project_consumption(projection_days);
        let recommendations =
            RecommendationBuilder::new(engine.appliances(), &optimal_config).personalized();
        let action_plan = recommendations.action_plan();
        let environmental_impact = environmental_impact(savings.total_energy_saved_kwh);

        Self {
            id: Uuid::new_v4(),
            generated_at: Local::now().fixed_offset(),
            price_per_kwh: engine.price_per_kwh(),
            savings_target,
            breakdown,
            optimal_config,
            savings,
            billing,
            projection,
            recommendations,
            action_plan,
            time_of_use: time_of_use_tips(),
            environmental_impact,
        }
    }
}
