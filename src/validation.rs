//! Eager configuration validation
//!
//! Every check runs and every failure is collected before anything is
//! reported, so one pass over the report fixes the whole plan instead of one
//! error per attempt. Scenario checks validate the *effective* values (base
//! merged with the delta), since those are what the projection would see.

use rust_decimal::Decimal;

use crate::error::{ConfigError, ValidationReport};
use crate::plan::{rate_in_range, GrowthControl, Plan, RatePeriod};
use crate::scenario::Scenario;

/// Validate one run: the base plan, plus the named scenario when given
pub fn validate(plan: &Plan, scenario_id: Option<u32>) -> Result<(), ValidationReport> {
    let mut errors = Vec::new();
    check_plan(plan, &mut errors);
    if let Some(id) = scenario_id {
        match plan.scenario(id) {
            Some(scenario) => check_scenario(plan, scenario, &mut errors),
            None => errors.push(ConfigError::UnknownScenario {
                plan_id: plan.plan_id,
                scenario_id: id,
            }),
        }
    }
    report(errors)
}

/// Validate the base plan and every scenario it owns
pub fn validate_all(plan: &Plan) -> Result<(), ValidationReport> {
    let mut errors = Vec::new();
    check_plan(plan, &mut errors);
    for scenario in &plan.scenarios {
        check_scenario(plan, scenario, &mut errors);
    }
    report(errors)
}

fn report(errors: Vec<ConfigError>) -> Result<(), ValidationReport> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationReport::new(errors))
    }
}

fn check_plan(plan: &Plan, errors: &mut Vec<ConfigError>) {
    match plan.reference_person() {
        Some(reference) => {
            let final_year = reference.birth_year() + reference.final_age as i32;
            if final_year < plan.creation_year() {
                errors.push(ConfigError::EmptyHorizon {
                    creation_year: plan.creation_year(),
                    final_year,
                });
            }
        }
        None => errors.push(ConfigError::UnknownReferencePerson {
            person_id: plan.reference_person_id,
        }),
    }

    for person in &plan.household.people {
        check_ages(
            person.person_id,
            person.retirement_age,
            person.final_age,
            errors,
        );
    }

    check_rate("plan default growth rate", plan.assumptions.default_growth_rate, errors);
    check_rate("plan inflation rate", plan.assumptions.inflation_rate, errors);
    check_non_negative(
        "plan annual retirement spending",
        plan.assumptions.annual_retirement_spending,
        errors,
    );

    for asset in &plan.assets {
        let what = format!("asset `{}`", asset.name);
        check_non_negative(&what, asset.value, errors);
        check_growth_control(&what, &asset.growth, errors);
        for &owner in &asset.owner_ids {
            if plan.household.person(owner).is_none() {
                errors.push(ConfigError::UnknownPerson {
                    what: what.clone(),
                    person_id: owner,
                });
            }
        }
    }

    for liability in &plan.liabilities {
        let what = format!("liability `{}`", liability.name);
        check_non_negative(&what, liability.value, errors);
        check_rate(&what, liability.interest_rate, errors);
    }

    for flow in &plan.cash_flows {
        let what = format!("cash flow `{}`", flow.name);
        check_non_negative(&what, flow.annual_amount, errors);
        check_year_range(&what, flow.start_year, flow.end_year, errors);
    }

    for income in &plan.retirement_incomes {
        let what = format!("retirement income `{}`", income.name);
        check_non_negative(&what, income.annual_income, errors);
        if let Some(end_age) = income.end_age {
            if income.start_age > end_age {
                errors.push(ConfigError::InvalidAgeRange {
                    what: what.clone(),
                    start_age: income.start_age,
                    end_age,
                });
            }
        }
        if plan.household.person(income.owner_id).is_none() {
            errors.push(ConfigError::UnknownPerson {
                what,
                person_id: income.owner_id,
            });
        }
    }
}

fn check_scenario(plan: &Plan, scenario: &Scenario, errors: &mut Vec<ConfigError>) {
    let sid = scenario.scenario_id;

    if let Some(rate) = scenario.assumptions.nest_egg_growth_rate {
        check_rate(&format!("scenario {sid} nest-egg growth rate"), rate, errors);
    }
    if let Some(rate) = scenario.assumptions.inflation_rate {
        check_rate(&format!("scenario {sid} inflation rate"), rate, errors);
    }
    if let Some(spending) = scenario.assumptions.annual_retirement_spending {
        check_non_negative(
            &format!("scenario {sid} annual retirement spending"),
            spending,
            errors,
        );
    }

    check_periods(
        &format!("scenario {sid} growth adjustments"),
        &scenario.growth_adjustments,
        errors,
    );

    // An override of the reference person's final age moves the horizon, so
    // the empty-horizon check must run against the effective value too
    if let Some(reference) = plan.reference_person() {
        let overridden_final_age = scenario
            .people
            .iter()
            .find(|d| d.person_id == plan.reference_person_id)
            .and_then(|d| d.final_age);
        // Unoverridden final ages were already checked against the base plan
        if let Some(final_age) = overridden_final_age {
            let final_year = reference.birth_year() + final_age as i32;
            if final_year < plan.creation_year() {
                errors.push(ConfigError::EmptyHorizon {
                    creation_year: plan.creation_year(),
                    final_year,
                });
            }
        }
    }

    // Person overrides: the effective age pair must still leave a horizon
    for (i, delta) in scenario.people.iter().enumerate() {
        let Some(person) = plan.household.person(delta.person_id) else {
            errors.push(ConfigError::UnknownPerson {
                what: format!("scenario {sid} person override"),
                person_id: delta.person_id,
            });
            continue;
        };
        if scenario.people[..i].iter().any(|d| d.person_id == delta.person_id) {
            errors.push(ConfigError::DuplicateOverride {
                scenario_id: sid,
                entity: "person",
                entity_id: delta.person_id,
            });
        }
        check_ages(
            delta.person_id,
            delta.retirement_age.unwrap_or(person.retirement_age),
            delta.final_age.unwrap_or(person.final_age),
            errors,
        );
    }

    for (i, delta) in scenario.assets.iter().enumerate() {
        let what = format!("scenario {sid} asset override");
        match delta.original_asset_id {
            Some(id) => {
                if plan.asset(id).is_none() {
                    errors.push(ConfigError::UnknownBaseEntity {
                        scenario_id: sid,
                        entity: "asset",
                        entity_id: id,
                    });
                }
                if scenario.assets[..i]
                    .iter()
                    .any(|d| d.original_asset_id == Some(id))
                {
                    errors.push(ConfigError::DuplicateOverride {
                        scenario_id: sid,
                        entity: "asset",
                        entity_id: id,
                    });
                }
            }
            None if !delta.exclude_from_projection => {
                if delta.value.is_none() {
                    errors.push(ConfigError::MissingField {
                        what: what.clone(),
                        field: "value",
                    });
                }
            }
            None => {}
        }
        if let Some(value) = delta.value {
            check_non_negative(&what, value, errors);
        }
        if let Some(growth) = &delta.growth {
            check_growth_control(&what, growth, errors);
        }
        for owner in delta.owner_ids.iter().flatten() {
            if plan.household.person(*owner).is_none() {
                errors.push(ConfigError::UnknownPerson {
                    what: what.clone(),
                    person_id: *owner,
                });
            }
        }
    }

    for (i, delta) in scenario.liabilities.iter().enumerate() {
        let what = format!("scenario {sid} liability override");
        match delta.original_liability_id {
            Some(id) => {
                if plan.liability(id).is_none() {
                    errors.push(ConfigError::UnknownBaseEntity {
                        scenario_id: sid,
                        entity: "liability",
                        entity_id: id,
                    });
                }
                if scenario.liabilities[..i]
                    .iter()
                    .any(|d| d.original_liability_id == Some(id))
                {
                    errors.push(ConfigError::DuplicateOverride {
                        scenario_id: sid,
                        entity: "liability",
                        entity_id: id,
                    });
                }
            }
            None if !delta.exclude_from_projection => {
                if delta.value.is_none() {
                    errors.push(ConfigError::MissingField {
                        what: what.clone(),
                        field: "value",
                    });
                }
                if delta.interest_rate.is_none() {
                    errors.push(ConfigError::MissingField {
                        what: what.clone(),
                        field: "interest_rate",
                    });
                }
            }
            None => {}
        }
        if let Some(value) = delta.value {
            check_non_negative(&what, value, errors);
        }
        if let Some(rate) = delta.interest_rate {
            check_rate(&what, rate, errors);
        }
    }

    for (i, delta) in scenario.cash_flows.iter().enumerate() {
        let what = format!("scenario {sid} cash flow override");
        let base = delta.original_flow_id.and_then(|id| plan.cash_flow(id));
        match delta.original_flow_id {
            Some(id) => {
                if base.is_none() {
                    errors.push(ConfigError::UnknownBaseEntity {
                        scenario_id: sid,
                        entity: "cash flow",
                        entity_id: id,
                    });
                }
                if scenario.cash_flows[..i]
                    .iter()
                    .any(|d| d.original_flow_id == Some(id))
                {
                    errors.push(ConfigError::DuplicateOverride {
                        scenario_id: sid,
                        entity: "cash flow",
                        entity_id: id,
                    });
                }
            }
            None if !delta.exclude_from_projection => {
                for (field, missing) in [
                    ("kind", delta.kind.is_none()),
                    ("annual_amount", delta.annual_amount.is_none()),
                    ("start_year", delta.start_year.is_none()),
                    ("end_year", delta.end_year.is_none()),
                ] {
                    if missing {
                        errors.push(ConfigError::MissingField {
                            what: what.clone(),
                            field,
                        });
                    }
                }
            }
            None => {}
        }
        if let Some(amount) = delta.annual_amount {
            check_non_negative(&what, amount, errors);
        }
        let start = delta.start_year.or(base.map(|f| f.start_year));
        let end = delta.end_year.or(base.map(|f| f.end_year));
        if let (Some(start), Some(end)) = (start, end) {
            check_year_range(&what, start, end, errors);
        }
    }

    for (i, delta) in scenario.retirement_incomes.iter().enumerate() {
        let what = format!("scenario {sid} retirement income override");
        let base = delta.original_income_id.and_then(|id| plan.retirement_income(id));
        match delta.original_income_id {
            Some(id) => {
                if base.is_none() {
                    errors.push(ConfigError::UnknownBaseEntity {
                        scenario_id: sid,
                        entity: "retirement income",
                        entity_id: id,
                    });
                }
                if scenario.retirement_incomes[..i]
                    .iter()
                    .any(|d| d.original_income_id == Some(id))
                {
                    errors.push(ConfigError::DuplicateOverride {
                        scenario_id: sid,
                        entity: "retirement income",
                        entity_id: id,
                    });
                }
            }
            None if !delta.exclude_from_projection => {
                for (field, missing) in [
                    ("owner_id", delta.owner_id.is_none()),
                    ("annual_income", delta.annual_income.is_none()),
                    ("start_age", delta.start_age.is_none()),
                ] {
                    if missing {
                        errors.push(ConfigError::MissingField {
                            what: what.clone(),
                            field,
                        });
                    }
                }
            }
            None => {}
        }
        if let Some(income) = delta.annual_income {
            check_non_negative(&what, income, errors);
        }
        if let Some(owner) = delta.owner_id {
            if plan.household.person(owner).is_none() {
                errors.push(ConfigError::UnknownPerson {
                    what: what.clone(),
                    person_id: owner,
                });
            }
        }
        let start = delta.start_age.or(base.map(|r| r.start_age));
        let end = delta.end_age.or(base.and_then(|r| r.end_age));
        if let (Some(start_age), Some(end_age)) = (start, end) {
            if start_age > end_age {
                errors.push(ConfigError::InvalidAgeRange {
                    what,
                    start_age,
                    end_age,
                });
            }
        }
    }
}

fn check_ages(person_id: u32, retirement_age: u8, final_age: u8, errors: &mut Vec<ConfigError>) {
    if final_age <= retirement_age {
        errors.push(ConfigError::FinalAgeNotAfterRetirement {
            person_id,
            retirement_age,
            final_age,
        });
    }
}

fn check_rate(what: &str, rate: Decimal, errors: &mut Vec<ConfigError>) {
    if !rate_in_range(rate) {
        errors.push(ConfigError::RateOutOfRange {
            what: what.to_owned(),
            rate,
        });
    }
}

fn check_non_negative(what: &str, value: Decimal, errors: &mut Vec<ConfigError>) {
    if value < Decimal::ZERO {
        errors.push(ConfigError::NegativeValue {
            what: what.to_owned(),
            value,
        });
    }
}

fn check_year_range(what: &str, start_year: i32, end_year: i32, errors: &mut Vec<ConfigError>) {
    if start_year > end_year {
        errors.push(ConfigError::InvalidYearRange {
            what: what.to_owned(),
            start_year,
            end_year,
        });
    }
}

fn check_growth_control(holder: &str, growth: &GrowthControl, errors: &mut Vec<ConfigError>) {
    match growth {
        GrowthControl::Default => {}
        GrowthControl::Override(rate) => check_rate(holder, *rate, errors),
        GrowthControl::Stepwise { periods, base } => {
            if let Some(rate) = base {
                check_rate(holder, *rate, errors);
            }
            check_periods(holder, periods, errors);
        }
    }
}

fn check_periods(holder: &str, periods: &[RatePeriod], errors: &mut Vec<ConfigError>) {
    for period in periods {
        check_rate(holder, period.rate, errors);
        check_year_range(holder, period.start_year, period.end_year, errors);
    }
    for (i, first) in periods.iter().enumerate() {
        for second in &periods[i + 1..] {
            if first.overlaps(second) {
                errors.push(ConfigError::OverlappingGrowthPeriods {
                    holder: holder.to_owned(),
                    first_start: first.start_year,
                    first_end: first.end_year,
                    second_start: second.start_year,
                    second_end: second.end_year,
                });
            }
        }
    }
}
