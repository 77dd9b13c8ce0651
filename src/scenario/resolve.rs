//! Override resolution: merging a base plan with one scenario's deltas
//!
//! `resolve` produces an `EffectivePlan` snapshot: one fully-merged copy of
//! every entity the projection will see. The snapshot is taken once per run,
//! so a concurrent edit to base data cannot produce a torn read across years
//! of the same run. Resolution assumes the (plan, scenario) pair already
//! passed validation; deltas with unknown base references are skipped here
//! because validation has reported them and refused the run.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::plan::{
    Asset, CashFlow, GrowthControl, Liability, Person, Plan, RetirementIncome,
};
use crate::scenario::{
    AssetOverride, CashFlowOverride, LiabilityOverride, RetirementIncomeOverride, Scenario,
};

/// Plan-wide assumptions after scenario overrides
#[derive(Debug, Clone)]
pub struct EffectiveAssumptions {
    /// Scenario-level control layered over the plan default (tiers 1 and 3
    /// for the nest-egg rate); `Default` for base-plan runs
    pub nest_egg_growth: GrowthControl,
    pub default_growth_rate: Decimal,
    pub inflation_rate: Decimal,
    /// Retirement spending applies only in scenario runs; `None` for the base plan
    pub retirement_spending: Option<Decimal>,
}

/// Timeline facts for one household member after scenario overrides
#[derive(Debug, Clone)]
pub struct EffectivePerson {
    pub person_id: u32,
    pub birth_year: i32,
    pub retirement_age: u8,
    pub final_age: u8,
}

/// The fully-merged snapshot one projection run operates on
#[derive(Debug, Clone)]
pub struct EffectivePlan {
    pub plan_id: u32,
    pub scenario_id: Option<u32>,
    pub creation_date: NaiveDate,
    pub assumptions: EffectiveAssumptions,
    pub reference: EffectivePerson,
    pub people: Vec<EffectivePerson>,
    pub assets: Vec<Asset>,
    pub liabilities: Vec<Liability>,
    pub cash_flows: Vec<CashFlow>,
    pub retirement_incomes: Vec<RetirementIncome>,
}

/// Merge a base plan with zero-or-one scenario into an effective snapshot
pub fn resolve(plan: &Plan, scenario: Option<&Scenario>) -> EffectivePlan {
    let assumptions = effective_assumptions(plan, scenario);
    let people: Vec<EffectivePerson> = plan
        .household
        .people
        .iter()
        .map(|p| effective_person(p, scenario))
        .collect();
    // Validation refuses plans whose reference person is not a household
    // member, so this lookup cannot miss for a plan the engine projects
    let reference = match people.iter().find(|p| p.person_id == plan.reference_person_id) {
        Some(person) => person.clone(),
        None => {
            debug_assert!(
                false,
                "unvalidated plan: reference person {} is not a household member",
                plan.reference_person_id
            );
            EffectivePerson {
                person_id: plan.reference_person_id,
                birth_year: plan.creation_year(),
                retirement_age: 0,
                final_age: 0,
            }
        }
    };

    EffectivePlan {
        plan_id: plan.plan_id,
        scenario_id: scenario.map(|s| s.scenario_id),
        creation_date: plan.creation_date,
        assumptions,
        reference,
        people,
        assets: effective_assets(plan, scenario),
        liabilities: effective_liabilities(plan, scenario),
        cash_flows: effective_cash_flows(plan, scenario),
        retirement_incomes: effective_incomes(plan, scenario),
    }
}

fn effective_assumptions(plan: &Plan, scenario: Option<&Scenario>) -> EffectiveAssumptions {
    let base = &plan.assumptions;
    let Some(scenario) = scenario else {
        return EffectiveAssumptions {
            nest_egg_growth: GrowthControl::Default,
            default_growth_rate: base.default_growth_rate,
            inflation_rate: base.inflation_rate,
            retirement_spending: None,
        };
    };

    let growth_rate = scenario.assumptions.nest_egg_growth_rate;
    let nest_egg_growth = if !scenario.growth_adjustments.is_empty() {
        GrowthControl::Stepwise {
            periods: scenario.growth_adjustments.clone(),
            base: growth_rate,
        }
    } else if let Some(rate) = growth_rate {
        GrowthControl::Override(rate)
    } else {
        GrowthControl::Default
    };

    EffectiveAssumptions {
        nest_egg_growth,
        default_growth_rate: base.default_growth_rate,
        inflation_rate: scenario
            .assumptions
            .inflation_rate
            .unwrap_or(base.inflation_rate),
        retirement_spending: Some(
            scenario
                .assumptions
                .annual_retirement_spending
                .unwrap_or(base.annual_retirement_spending),
        ),
    }
}

fn effective_person(person: &Person, scenario: Option<&Scenario>) -> EffectivePerson {
    let delta = scenario.and_then(|s| s.people.iter().find(|o| o.person_id == person.person_id));
    EffectivePerson {
        person_id: person.person_id,
        birth_year: person.birth_year(),
        retirement_age: delta
            .and_then(|d| d.retirement_age)
            .unwrap_or(person.retirement_age),
        final_age: delta.and_then(|d| d.final_age).unwrap_or(person.final_age),
    }
}

fn effective_assets(plan: &Plan, scenario: Option<&Scenario>) -> Vec<Asset> {
    let deltas: &[AssetOverride] = scenario.map_or(&[], |s| &s.assets);
    let mut assets: Vec<Asset> = plan
        .assets
        .iter()
        .filter_map(|base| {
            let delta = deltas
                .iter()
                .find(|d| d.original_asset_id == Some(base.asset_id));
            merge_asset(base, delta)
        })
        .collect();

    let mut next_id = plan.assets.iter().map(|a| a.asset_id).max().unwrap_or(0);
    for delta in deltas.iter().filter(|d| d.original_asset_id.is_none()) {
        if delta.exclude_from_projection {
            continue;
        }
        // Validation guarantees a value for scenario-only assets
        let Some(value) = delta.value else { continue };
        next_id += 1;
        assets.push(Asset {
            asset_id: next_id,
            name: delta
                .name
                .clone()
                .unwrap_or_else(|| format!("scenario asset {next_id}")),
            value,
            include_in_nest_egg: delta.include_in_nest_egg.unwrap_or(true),
            owner_ids: delta.owner_ids.clone().unwrap_or_default(),
            growth: delta.growth.clone().unwrap_or_default(),
        });
    }
    assets
}

fn merge_asset(base: &Asset, delta: Option<&AssetOverride>) -> Option<Asset> {
    let Some(delta) = delta else {
        return Some(base.clone());
    };
    if delta.exclude_from_projection {
        return None;
    }
    Some(Asset {
        asset_id: base.asset_id,
        name: delta.name.clone().unwrap_or_else(|| base.name.clone()),
        value: delta.value.unwrap_or(base.value),
        include_in_nest_egg: delta.include_in_nest_egg.unwrap_or(base.include_in_nest_egg),
        owner_ids: delta
            .owner_ids
            .clone()
            .unwrap_or_else(|| base.owner_ids.clone()),
        growth: delta.growth.clone().unwrap_or_else(|| base.growth.clone()),
    })
}

fn effective_liabilities(plan: &Plan, scenario: Option<&Scenario>) -> Vec<Liability> {
    let deltas: &[LiabilityOverride] = scenario.map_or(&[], |s| &s.liabilities);
    let mut liabilities: Vec<Liability> = plan
        .liabilities
        .iter()
        .filter_map(|base| {
            let delta = deltas
                .iter()
                .find(|d| d.original_liability_id == Some(base.liability_id));
            merge_liability(base, delta)
        })
        .collect();

    let mut next_id = plan
        .liabilities
        .iter()
        .map(|l| l.liability_id)
        .max()
        .unwrap_or(0);
    for delta in deltas.iter().filter(|d| d.original_liability_id.is_none()) {
        if delta.exclude_from_projection {
            continue;
        }
        let (Some(value), Some(interest_rate)) = (delta.value, delta.interest_rate) else {
            continue;
        };
        next_id += 1;
        liabilities.push(Liability {
            liability_id: next_id,
            name: delta
                .name
                .clone()
                .unwrap_or_else(|| format!("scenario liability {next_id}")),
            value,
            interest_rate,
            include_in_nest_egg: delta.include_in_nest_egg.unwrap_or(true),
        });
    }
    liabilities
}

fn merge_liability(base: &Liability, delta: Option<&LiabilityOverride>) -> Option<Liability> {
    let Some(delta) = delta else {
        return Some(base.clone());
    };
    if delta.exclude_from_projection {
        return None;
    }
    Some(Liability {
        liability_id: base.liability_id,
        name: delta.name.clone().unwrap_or_else(|| base.name.clone()),
        value: delta.value.unwrap_or(base.value),
        interest_rate: delta.interest_rate.unwrap_or(base.interest_rate),
        include_in_nest_egg: delta.include_in_nest_egg.unwrap_or(base.include_in_nest_egg),
    })
}

fn effective_cash_flows(plan: &Plan, scenario: Option<&Scenario>) -> Vec<CashFlow> {
    let deltas: &[CashFlowOverride] = scenario.map_or(&[], |s| &s.cash_flows);
    let mut flows: Vec<CashFlow> = plan
        .cash_flows
        .iter()
        .filter_map(|base| {
            let delta = deltas
                .iter()
                .find(|d| d.original_flow_id == Some(base.flow_id));
            merge_cash_flow(base, delta)
        })
        .collect();

    let mut next_id = plan.cash_flows.iter().map(|f| f.flow_id).max().unwrap_or(0);
    for delta in deltas.iter().filter(|d| d.original_flow_id.is_none()) {
        if delta.exclude_from_projection {
            continue;
        }
        let (Some(kind), Some(annual_amount), Some(start_year), Some(end_year)) = (
            delta.kind,
            delta.annual_amount,
            delta.start_year,
            delta.end_year,
        ) else {
            continue;
        };
        next_id += 1;
        flows.push(CashFlow {
            flow_id: next_id,
            name: delta
                .name
                .clone()
                .unwrap_or_else(|| format!("scenario cash flow {next_id}")),
            kind,
            annual_amount,
            start_year,
            end_year,
            apply_inflation: delta.apply_inflation.unwrap_or(false),
        });
    }
    flows
}

fn merge_cash_flow(base: &CashFlow, delta: Option<&CashFlowOverride>) -> Option<CashFlow> {
    let Some(delta) = delta else {
        return Some(base.clone());
    };
    if delta.exclude_from_projection {
        return None;
    }
    Some(CashFlow {
        flow_id: base.flow_id,
        name: delta.name.clone().unwrap_or_else(|| base.name.clone()),
        kind: delta.kind.unwrap_or(base.kind),
        annual_amount: delta.annual_amount.unwrap_or(base.annual_amount),
        start_year: delta.start_year.unwrap_or(base.start_year),
        end_year: delta.end_year.unwrap_or(base.end_year),
        apply_inflation: delta.apply_inflation.unwrap_or(base.apply_inflation),
    })
}

fn effective_incomes(plan: &Plan, scenario: Option<&Scenario>) -> Vec<RetirementIncome> {
    let deltas: &[RetirementIncomeOverride] = scenario.map_or(&[], |s| &s.retirement_incomes);
    let mut incomes: Vec<RetirementIncome> = plan
        .retirement_incomes
        .iter()
        .filter_map(|base| {
            let delta = deltas
                .iter()
                .find(|d| d.original_income_id == Some(base.income_id));
            merge_income(base, delta)
        })
        .collect();

    let mut next_id = plan
        .retirement_incomes
        .iter()
        .map(|r| r.income_id)
        .max()
        .unwrap_or(0);
    for delta in deltas.iter().filter(|d| d.original_income_id.is_none()) {
        if delta.exclude_from_projection {
            continue;
        }
        let (Some(owner_id), Some(annual_income), Some(start_age)) =
            (delta.owner_id, delta.annual_income, delta.start_age)
        else {
            continue;
        };
        next_id += 1;
        incomes.push(RetirementIncome {
            income_id: next_id,
            name: delta
                .name
                .clone()
                .unwrap_or_else(|| format!("scenario income {next_id}")),
            owner_id,
            annual_income,
            start_age,
            end_age: delta.end_age,
            apply_inflation: delta.apply_inflation.unwrap_or(false),
        });
    }
    incomes
}

fn merge_income(
    base: &RetirementIncome,
    delta: Option<&RetirementIncomeOverride>,
) -> Option<RetirementIncome> {
    let Some(delta) = delta else {
        return Some(base.clone());
    };
    if delta.exclude_from_projection {
        return None;
    }
    Some(RetirementIncome {
        income_id: base.income_id,
        name: delta.name.clone().unwrap_or_else(|| base.name.clone()),
        owner_id: delta.owner_id.unwrap_or(base.owner_id),
        annual_income: delta.annual_income.unwrap_or(base.annual_income),
        start_age: delta.start_age.unwrap_or(base.start_age),
        end_age: delta.end_age.or(base.end_age),
        apply_inflation: delta.apply_inflation.unwrap_or(base.apply_inflation),
    })
}
