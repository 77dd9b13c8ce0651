//! Scenario delta records
//!
//! Every overridable field is an `Option`: `None` inherits the base value,
//! `Some` replaces it. A delta whose base reference is `None` introduces a
//! scenario-only entity and must carry every required field itself. Each
//! delta also carries an `exclude_from_projection` flag that removes the
//! entity from the scenario entirely.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::plan::{FlowKind, GrowthControl};

/// Overrides of the plan-wide assumptions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssumptionOverrides {
    /// Replaces the plan default growth rate (tier 3 of rate resolution)
    pub nest_egg_growth_rate: Option<Decimal>,
    pub inflation_rate: Option<Decimal>,
    pub annual_retirement_spending: Option<Decimal>,
}

/// Retirement/final age overrides for one household member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonOverride {
    pub person_id: u32,
    pub retirement_age: Option<u8>,
    pub final_age: Option<u8>,
}

/// Delta against one base asset, or a scenario-only asset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetOverride {
    /// Base asset this delta targets; `None` introduces a scenario-only asset
    pub original_asset_id: Option<u32>,
    pub name: Option<String>,
    pub value: Option<Decimal>,
    pub growth: Option<GrowthControl>,
    pub include_in_nest_egg: Option<bool>,
    pub owner_ids: Option<Vec<u32>>,
    #[serde(default)]
    pub exclude_from_projection: bool,
}

/// Delta against one base liability, or a scenario-only liability
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiabilityOverride {
    pub original_liability_id: Option<u32>,
    pub name: Option<String>,
    pub value: Option<Decimal>,
    pub interest_rate: Option<Decimal>,
    pub include_in_nest_egg: Option<bool>,
    #[serde(default)]
    pub exclude_from_projection: bool,
}

/// Delta against one base cash flow, or a scenario-only cash flow
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CashFlowOverride {
    pub original_flow_id: Option<u32>,
    pub name: Option<String>,
    pub kind: Option<FlowKind>,
    pub annual_amount: Option<Decimal>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub apply_inflation: Option<bool>,
    #[serde(default)]
    pub exclude_from_projection: bool,
}

/// Delta against one base retirement income plan, or a scenario-only one
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetirementIncomeOverride {
    pub original_income_id: Option<u32>,
    pub name: Option<String>,
    pub owner_id: Option<u32>,
    pub annual_income: Option<Decimal>,
    pub start_age: Option<u8>,
    pub end_age: Option<u8>,
    pub apply_inflation: Option<bool>,
    #[serde(default)]
    pub exclude_from_projection: bool,
}
