//! Scenarios: named alternative projections layered over a base plan

mod overrides;
mod resolve;

pub use overrides::{
    AssetOverride, AssumptionOverrides, CashFlowOverride, LiabilityOverride, PersonOverride,
    RetirementIncomeOverride,
};
pub use resolve::{resolve, EffectiveAssumptions, EffectivePerson, EffectivePlan};

use serde::{Deserialize, Serialize};

use crate::plan::RatePeriod;

/// A named alternative projection
///
/// A scenario owns only its delta records; the base entities they reference
/// stay owned by the plan. Dropping the scenario drops every delta with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub scenario_id: u32,
    pub name: String,
    #[serde(default)]
    pub assumptions: AssumptionOverrides,
    /// Time-bound overrides of the nest-egg default rate (tier 1 for the default)
    #[serde(default)]
    pub growth_adjustments: Vec<RatePeriod>,
    #[serde(default)]
    pub people: Vec<PersonOverride>,
    #[serde(default)]
    pub assets: Vec<AssetOverride>,
    #[serde(default)]
    pub liabilities: Vec<LiabilityOverride>,
    #[serde(default)]
    pub cash_flows: Vec<CashFlowOverride>,
    #[serde(default)]
    pub retirement_incomes: Vec<RetirementIncomeOverride>,
}

impl Scenario {
    /// An empty scenario: projects identically to the base plan apart from
    /// retirement spending, which only applies in scenario runs
    pub fn empty(scenario_id: u32, name: impl Into<String>) -> Self {
        Self {
            scenario_id,
            name: name.into(),
            assumptions: AssumptionOverrides::default(),
            growth_adjustments: Vec::new(),
            people: Vec::new(),
            assets: Vec::new(),
            liabilities: Vec::new(),
            cash_flows: Vec::new(),
            retirement_incomes: Vec::new(),
        }
    }
}
