//! Prioritised savings advice derived from a computed optimal
//! configuration, plus the environmental impact of the projected savings.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::domain::{round1, round2, ApplianceKind, ApplianceRecord, OptimizationResult};

/// Savings above this many kWh per billing period make an appliance a
/// critical target; above `IMPORTANT_KWH` an important one.
const CRITICAL_KWH: f64 = 50.0;
const IMPORTANT_KWH: f64 = 20.0;

/// kg CO₂ emitted per kWh of grid electricity.
const CO2_KG_PER_KWH: f64 = 0.527;
/// Trees needed to absorb one kg of CO₂ per year.
const TREES_PER_KG_CO2: f64 = 0.06;
/// Car kilometres per kg of CO₂.
const CAR_KM_PER_KG_CO2: f64 = 0.24;

const GENERAL_TIPS: &[&str] = &[
    "Replace incandescent bulbs with LEDs (up to 80% less energy)",
    "Unplug appliances on standby (up to 10% of the bill)",
    "Use natural light during the day",
    "Seal gaps around doors and windows to keep conditioned air in",
    "Use switched power strips to turn off several devices at once",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub appliance: String,
    pub kind: ApplianceKind,
    pub headline_action: String,
    pub potential_kwh: f64,
    pub potential_money: f64,
    pub current_hours: f64,
    pub recommended_hours: f64,
    pub tips: Vec<String>,
}

/// Advice grouped by priority, highest-saving appliances first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub critical: Vec<Recommendation>,
    pub important: Vec<Recommendation>,
    pub optional: Vec<Recommendation>,
    pub general: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalImpact {
    pub energy_saved_kwh: f64,
    pub co2_kg_saved: f64,
    pub tree_equivalent: f64,
    pub car_km_equivalent: f64,
    pub summary: String,
}

/// One step of the staged rollout plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appliance: Option<String>,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_money_saving: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPlanStage {
    pub title: String,
    pub actions: Vec<ActionItem>,
}

/// Four-week staged rollout of the recommendations: high-impact changes
/// first, monitoring last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub week_1: ActionPlanStage,
    pub week_2: ActionPlanStage,
    pub week_3: ActionPlanStage,
    pub week_4: ActionPlanStage,
}

/// Advice for one time-of-use tariff window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeOfUsePeriod {
    pub description: String,
    pub schedule: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub recommended_appliances: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub appliances_to_avoid: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_saving: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeOfUseTips {
    pub off_peak: TimeOfUsePeriod,
    pub mid_peak: TimeOfUsePeriod,
    pub peak: TimeOfUsePeriod,
}

/// Builds the recommendation set for one engine run.
pub struct RecommendationBuilder<'a> {
    appliances: &'a [ApplianceRecord],
    optimal_config: &'a BTreeMap<String, OptimizationResult>,
}

impl<'a> RecommendationBuilder<'a> {
    pub fn new(
        appliances: &'a [ApplianceRecord],
        optimal_config: &'a BTreeMap<String, OptimizationResult>,
    ) -> Self {
        Self {
            appliances,
            optimal_config,
        }
    }

    pub fn personalized(&self) -> RecommendationSet {
        let mut ranked: Vec<(&String, &OptimizationResult)> = self.optimal_config.iter().collect();
        ranked.sort_by_key(|(_, result)| Reverse(OrderedFloat(result.energy_saved_kwh)));

        let mut set = RecommendationSet {
            critical: Vec::new(),
            important: Vec::new(),
            optional: Vec::new(),
            general: GENERAL_TIPS.iter().map(|t| t.to_string()).collect(),
        };

        for (name, result) in ranked {
            let Some(appliance) = self.appliances.iter().find(|a| &a.name == name) else {
                continue;
            };

            let recommendation = Recommendation {
                appliance: name.clone(),
                kind: appliance.kind,
                headline_action: format!(
                    "Reduce daily use by {:.1} hours",
                    result.hours_reduction
                ),
                potential_kwh: result.energy_saved_kwh,
                potential_money: result.money_saved,
                current_hours: result.current_hours,
                recommended_hours: result.optimal_hours,
                tips: tips_for(appliance.kind)
                    .iter()
                    .take(3)
                    .map(|t| t.to_string())
                    .collect(),
            };

            if result.energy_saved_kwh > CRITICAL_KWH {
                set.critical.push(recommendation);
            } else if result.energy_saved_kwh > IMPORTANT_KWH {
                set.important.push(recommendation);
            } else {
                set.optional.push(recommendation);
            }
        }

        set
    }
}

impl RecommendationSet {
    /// Stage the recommendations into a four-week rollout: the top three
    /// critical items first, the top three important ones (with their two
    /// leading tips) next, then a light week of optional items and
    /// general habits, and a fixed monitoring week to close.
    pub fn action_plan(&self) -> ActionPlan {
        let week_1 = ActionPlanStage {
            title: "Immediate high-impact changes".to_string(),
            actions: self
                .critical
                .iter()
                .take(3)
                .map(|r| ActionItem {
                    appliance: Some(r.appliance.clone()),
                    action: r.headline_action.clone(),
                    expected_money_saving: Some(r.potential_money),
                    tips: Vec::new(),
                })
                .collect(),
        };

        let week_2 = ActionPlanStage {
            title: "Main appliance optimization".to_string(),
            actions: self
                .important
                .iter()
                .take(3)
                .map(|r| ActionItem {
                    appliance: Some(r.appliance.clone()),
                    action: r.headline_action.clone(),
                    expected_money_saving: None,
                    tips: r.tips.iter().take(2).cloned().collect(),
                })
                .collect(),
        };

        let mut week_3_actions: Vec<ActionItem> = self
            .optional
            .iter()
            .take(2)
            .map(|r| ActionItem {
                appliance: Some(r.appliance.clone()),
                action: r.headline_action.clone(),
                expected_money_saving: None,
                tips: Vec::new(),
            })
            .collect();
        week_3_actions.extend(self.general.iter().take(3).map(|tip| ActionItem {
            appliance: None,
            action: tip.clone(),
            expected_money_saving: None,
            tips: Vec::new(),
        }));
        let week_3 = ActionPlanStage {
            title: "Additional improvements and habits".to_string(),
            actions: week_3_actions,
        };

        let week_4 = ActionPlanStage {
            title: "Monitoring and final adjustments".to_string(),
            actions: [
                "Review weekly consumption and compare it against the target",
                "Adjust usage schedules based on observed results",
                "Identify new appliances to optimize",
                "Write down the habits that worked so they stick",
            ]
            .iter()
            .map(|action| ActionItem {
                appliance: None,
                action: action.to_string(),
                expected_money_saving: None,
                tips: Vec::new(),
            })
            .collect(),
        };

        ActionPlan {
            week_1,
            week_2,
            week_3,
            week_4,
        }
    }
}

/// Fixed advice on the best times of day to run appliances under a
/// time-of-use tariff.
pub fn time_of_use_tips() -> TimeOfUseTips {
    TimeOfUseTips {
        off_peak: TimeOfUsePeriod {
            description: "Cheapest rate".to_string(),
            schedule: "Weekdays 00:00-06:00, weekends all day".to_string(),
            recommended_appliances: vec![
                "Washing machine".to_string(),
                "Dishwasher".to_string(),
                "Water heater".to_string(),
            ],
            appliances_to_avoid: Vec::new(),
            estimated_saving: Some("20-30%".to_string()),
            advice: None,
        },
        mid_peak: TimeOfUsePeriod {
            description: "Moderate rate".to_string(),
            schedule: "Weekdays 06:00-18:00 and 22:00-24:00".to_string(),
            recommended_appliances: vec![
                "Iron".to_string(),
                "Vacuum cleaner".to_string(),
                "Microwave".to_string(),
            ],
            appliances_to_avoid: Vec::new(),
            estimated_saving: Some("10-15%".to_string()),
            advice: None,
        },
        peak: TimeOfUsePeriod {
            description: "Highest rate - avoid".to_string(),
            schedule: "Weekdays 18:00-22:00".to_string(),
            recommended_appliances: Vec::new(),
            appliances_to_avoid: vec![
                "Air conditioner".to_string(),
                "Water heater".to_string(),
                "Iron".to_string(),
                "Washing machine".to_string(),
            ],
            estimated_saving: None,
            advice: Some("Minimise use of high-consumption appliances".to_string()),
        },
    }
}

/// Environmental equivalences for a saved amount of energy. The tree and
/// car-kilometre figures are coarse, so they carry one decimal.
pub fn environmental_impact(energy_saved_kwh: f64) -> EnvironmentalImpact {
    let co2_kg = energy_saved_kwh * CO2_KG_PER_KWH;
    let tree_equivalent = round1(co2_kg * TREES_PER_KG_CO2);
    let car_km_equivalent = round1(co2_kg / CAR_KM_PER_KG_CO2);
    EnvironmentalImpact {
        energy_saved_kwh: round2(energy_saved_kwh),
        co2_kg_saved: round2(co2_kg),
        tree_equivalent,
        car_km_equivalent,
        summary: format!(
            "Your savings are equivalent to planting {tree_equivalent} trees \
             or not driving {car_km_equivalent} km"
        ),
    }
}

fn tips_for(kind: ApplianceKind) -> &'static [&'static str] {
    match kind {
        ApplianceKind::Refrigerator => &[
            "Keep the fridge between 3°C and 5°C, the freezer at -18°C",
            "Let hot food cool before putting it in",
            "Check that the door seals close properly",
            "Keep it away from heat sources with room to ventilate",
        ],
        ApplianceKind::WashingMachine => &[
            "Use cold-water cycles whenever possible",
            "Run full loads only",
            "Clean the filter regularly",
        ],
        ApplianceKind::Tv => &[
            "Enable the power-saving picture mode",
            "Turn the set fully off instead of leaving it on standby",
            "Use a timer for automatic switch-off",
        ],
        ApplianceKind::Computer => &[
            "Enable sleep after 10-15 minutes of inactivity",
            "Lower the screen brightness",
            "Shut down fully at the end of the day",
        ],
        ApplianceKind::AirConditioner => &[
            "Set the thermostat to 24-25°C",
            "Clean or replace the filters monthly",
            "Keep doors and windows closed while it runs",
            "Use ceiling fans to circulate the air",
        ],
        ApplianceKind::Microwave => &[
            "Defrost food in the fridge instead of the microwave",
            "Keep the cavity clean for even heating",
            "Unplug it when not in use",
        ],
        ApplianceKind::Iron => &[
            "Iron several garments in one session",
            "Start with fabrics that need low heat",
            "Unplug before finishing and use the residual heat",
        ],
        ApplianceKind::WaterHeater => &[
            "Set the temperature to 50-60°C at most",
            "Insulate the tank and hot-water pipes",
            "Fix hot-water leaks immediately",
        ],
        ApplianceKind::Blender => &[
            "Run it only as long as needed",
            "Cut food into small pieces first",
            "Unplug after each use",
        ],
        ApplianceKind::Other => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::OptimizationEngine;

    fn household() -> Vec<ApplianceRecord> {
        vec![
            // 400 W * 24 h * 60 d = 576 kWh; 20% saves 115.2 kWh -> critical
            ApplianceRecord::new("ac", ApplianceKind::AirConditioner, 400.0, 24.0),
            // 250 W * 8 h * 60 d = 120 kWh; saves 24 kWh -> important
            ApplianceRecord::new("heater", ApplianceKind::WaterHeater, 250.0, 8.0),
            // 100 W * 3 h * 60 d = 18 kWh; saves 3.6 kWh -> optional
            ApplianceRecord::new("tv", ApplianceKind::Tv, 100.0, 3.0),
        ]
    }

    #[test]
    fn test_priority_buckets() {
        let appliances = household();
        let engine = OptimizationEngine::new(appliances.clone(), 1.5);
        let config = engine.find_optimal_configuration(0.20);

        let set = RecommendationBuilder::new(&appliances, &config).personalized();
        assert_eq!(set.critical.len(), 1);
        assert_eq!(set.critical[0].appliance, "ac");
        assert_eq!(set.important.len(), 1);
        assert_eq!(set.important[0].appliance, "heater");
        assert_eq!(set.optional.len(), 1);
        assert_eq!(set.optional[0].appliance, "tv");
        assert!(!set.general.is_empty());
    }

    #[test]
    fn test_entries_carry_kind_tips() {
        let appliances = household();
        let engine = OptimizationEngine::new(appliances.clone(), 1.5);
        let config = engine.find_optimal_configuration(0.20);
        let set = RecommendationBuilder::new(&appliances, &config).personalized();

        let ac = &set.critical[0];
        assert_eq!(ac.kind, ApplianceKind::AirConditioner);
        assert_eq!(ac.tips.len(), 3);
        assert!(ac.headline_action.starts_with("Reduce daily use by"));
        assert!(ac.recommended_hours <= ac.current_hours);
    }

    #[test]
    fn test_environmental_impact_figures() {
        let impact = environmental_impact(100.0);
        assert_eq!(impact.energy_saved_kwh, 100.0);
        assert_eq!(impact.co2_kg_saved, 52.7);
        assert_eq!(impact.tree_equivalent, 3.2);
        assert_eq!(impact.car_km_equivalent, 219.6);
        assert_eq!(
            impact.summary,
            "Your savings are equivalent to planting 3.2 trees or not driving 219.6 km"
        );
    }

    fn result_with_saving(hours: f64, saved_kwh: f64) -> crate::domain::OptimizationResult {
        crate::domain::OptimizationResult {
            current_hours: hours,
            optimal_hours: hours * 0.8,
            hours_reduction: hours * 0.2,
            current_energy_kwh: saved_kwh * 5.0,
            optimal_energy_kwh: saved_kwh * 4.0,
            energy_saved_kwh: saved_kwh,
            money_saved: saved_kwh * 1.5,
        }
    }

    /// More appliances than the plan has room for, to exercise the
    /// per-week truncation.
    fn crowded_household() -> (Vec<ApplianceRecord>, BTreeMap<String, crate::domain::OptimizationResult>) {
        let specs: &[(&str, ApplianceKind, f64)] = &[
            ("ac 1", ApplianceKind::AirConditioner, 90.0),
            ("ac 2", ApplianceKind::AirConditioner, 80.0),
            ("heater 1", ApplianceKind::WaterHeater, 70.0),
            ("heater 2", ApplianceKind::WaterHeater, 60.0),
            ("washer 1", ApplianceKind::WashingMachine, 40.0),
            ("washer 2", ApplianceKind::WashingMachine, 35.0),
            ("computer", ApplianceKind::Computer, 30.0),
            ("fridge", ApplianceKind::Refrigerator, 25.0),
            ("tv 1", ApplianceKind::Tv, 9.0),
            ("tv 2", ApplianceKind::Tv, 6.0),
            ("blender", ApplianceKind::Blender, 1.0),
        ];

        let appliances: Vec<ApplianceRecord> = specs
            .iter()
            .map(|(name, kind, _)| ApplianceRecord::new(*name, *kind, 500.0, 10.0))
            .collect();
        let config: BTreeMap<String, crate::domain::OptimizationResult> = specs
            .iter()
            .map(|(name, _, saved)| (name.to_string(), result_with_saving(10.0, *saved)))
            .collect();
        (appliances, config)
    }

    #[test]
    fn test_action_plan_slices_priority_buckets() {
        let (appliances, config) = crowded_household();
        let set = RecommendationBuilder::new(&appliances, &config).personalized();
        assert_eq!(set.critical.len(), 4);
        assert_eq!(set.important.len(), 4);
        assert_eq!(set.optional.len(), 3);

        let plan = set.action_plan();

        // Week 1: top three critical items, highest saving first, each
        // with its expected money saving.
        assert_eq!(plan.week_1.actions.len(), 3);
        assert_eq!(plan.week_1.actions[0].appliance.as_deref(), Some("ac 1"));
        assert_eq!(plan.week_1.actions[1].appliance.as_deref(), Some("ac 2"));
        assert_eq!(plan.week_1.actions[2].appliance.as_deref(), Some("heater 1"));
        assert_eq!(plan.week_1.actions[0].expected_money_saving, Some(135.0));

        // Week 2: top three important items with two tips each.
        assert_eq!(plan.week_2.actions.len(), 3);
        for action in &plan.week_2.actions {
            assert_eq!(action.tips.len(), 2);
            assert!(action.expected_money_saving.is_none());
        }

        // Week 3: two optional items plus three general habits.
        assert_eq!(plan.week_3.actions.len(), 5);
        assert!(plan.week_3.actions[0].appliance.is_some());
        assert!(plan.week_3.actions[1].appliance.is_some());
        assert!(plan.week_3.actions[2..].iter().all(|a| a.appliance.is_none()));

        // Week 4: the fixed monitoring list.
        assert_eq!(plan.week_4.actions.len(), 4);
        assert!(plan.week_4.actions.iter().all(|a| a.appliance.is_none()));
    }

    #[test]
    fn test_action_plan_with_sparse_buckets() {
        let appliances = household();
        let engine = OptimizationEngine::new(appliances.clone(), 1.5);
        let config = engine.find_optimal_configuration(0.20);
        let plan = RecommendationBuilder::new(&appliances, &config)
            .personalized()
            .action_plan();

        // One appliance per bucket: no week overflows, week 4 is fixed.
        assert_eq!(plan.week_1.actions.len(), 1);
        assert_eq!(plan.week_2.actions.len(), 1);
        assert_eq!(plan.week_3.actions.len(), 4); // 1 optional + 3 general
        assert_eq!(plan.week_4.actions.len(), 4);
    }

    #[test]
    fn test_time_of_use_tips_shape() {
        let tips = time_of_use_tips();
        assert!(tips.off_peak.estimated_saving.is_some());
        assert!(!tips.off_peak.recommended_appliances.is_empty());
        assert!(tips.off_peak.appliances_to_avoid.is_empty());
        assert!(!tips.peak.appliances_to_avoid.is_empty());
        assert!(tips.peak.advice.is_some());
        assert_eq!(tips.peak.schedule, "Weekdays 18:00-22:00");
        assert!(!tips.mid_peak.recommended_appliances.is_empty());
    }
}
