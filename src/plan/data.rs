//! Base plan entities: the household, its people, and the records a plan owns

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::scenario::Scenario;

/// Lower bound for every rate in the system, in percent
pub const MIN_RATE: Decimal = Decimal::from_parts(200, 0, 0, true, 0);
/// Upper bound for every rate in the system, in percent
pub const MAX_RATE: Decimal = Decimal::from_parts(200, 0, 0, false, 0);

/// Check a percent rate against the allowed [-200, 200] range
pub fn rate_in_range(rate: Decimal) -> bool {
    rate >= MIN_RATE && rate <= MAX_RATE
}

/// A household member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub person_id: u32,
    pub name: String,
    pub dob: NaiveDate,
    /// Age at which retirement spending and age-triggered income begin
    pub retirement_age: u8,
    /// Age through which this person is projected
    pub final_age: u8,
}

impl Person {
    /// Ages tick on January 1, so only the birth year matters for the timeline
    pub fn birth_year(&self) -> i32 {
        self.dob.year()
    }
}

/// Demographic anchor owning the people a plan projects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Household {
    pub household_id: u32,
    pub name: String,
    pub people: Vec<Person>,
}

impl Household {
    pub fn person(&self, person_id: u32) -> Option<&Person> {
        self.people.iter().find(|p| p.person_id == person_id)
    }
}

/// Plan-wide default assumptions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseAssumptions {
    /// Default annual growth rate for nest-egg assets, in percent
    pub default_growth_rate: Decimal,
    /// Annual inflation rate, in percent
    pub inflation_rate: Decimal,
    /// Annual retirement spending, applied only in scenario projections
    pub annual_retirement_spending: Decimal,
}

/// A time-bound growth rate, inclusive on both ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatePeriod {
    pub start_year: i32,
    pub end_year: i32,
    /// Annual growth rate in percent while the period applies
    pub rate: Decimal,
}

impl RatePeriod {
    pub fn contains(&self, year: i32) -> bool {
        self.start_year <= year && year <= self.end_year
    }

    pub fn overlaps(&self, other: &RatePeriod) -> bool {
        self.start_year <= other.end_year && other.start_year <= self.end_year
    }
}

/// How an asset's (or the nest-egg default's) annual growth rate is controlled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GrowthControl {
    /// Follow the nest-egg default rate
    Default,
    /// Constant rate, opting out of the nest-egg default
    Override(Decimal),
    /// Time-bound rates; years outside every period fall back to `base` when
    /// set, otherwise onward to the nest-egg default. Periods must not overlap.
    Stepwise {
        periods: Vec<RatePeriod>,
        base: Option<Decimal>,
    },
}

impl Default for GrowthControl {
    fn default() -> Self {
        GrowthControl::Default
    }
}

/// A valued holding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub asset_id: u32,
    pub name: String,
    pub value: Decimal,
    /// Whether this asset counts toward (and may be liquidated from) the nest egg
    pub include_in_nest_egg: bool,
    #[serde(default)]
    pub owner_ids: Vec<u32>,
    #[serde(default)]
    pub growth: GrowthControl,
}

/// A debt, serviced interest-only as a guaranteed outflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Liability {
    pub liability_id: u32,
    pub name: String,
    pub value: Decimal,
    /// Annual interest rate in percent
    pub interest_rate: Decimal,
    /// Whether the balance reduces the reported nest-egg position
    pub include_in_nest_egg: bool,
}

/// Direction of a scheduled cash event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowKind {
    Inflow,
    Outflow,
}

/// A scheduled cash event active over an inclusive year range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlow {
    pub flow_id: u32,
    pub name: String,
    pub kind: FlowKind,
    pub annual_amount: Decimal,
    pub start_year: i32,
    pub end_year: i32,
    /// Compound the amount with inflation from the flow's own start year
    pub apply_inflation: bool,
}

impl CashFlow {
    pub fn active_in(&self, year: i32) -> bool {
        self.start_year <= year && year <= self.end_year
    }
}

/// Age-triggered income tied to one household member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementIncome {
    pub income_id: u32,
    pub name: String,
    pub owner_id: u32,
    pub annual_income: Decimal,
    pub start_age: u8,
    /// Open-ended when absent
    pub end_age: Option<u8>,
    pub apply_inflation: bool,
}

impl RetirementIncome {
    pub fn active_at_age(&self, age: i32) -> bool {
        age >= self.start_age as i32 && self.end_age.map_or(true, |end| age <= end as i32)
    }
}

/// Container for one base financial picture and its scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub plan_id: u32,
    pub name: String,
    pub household: Household,
    /// Household member whose ages drive the projection timeline
    pub reference_person_id: u32,
    pub creation_date: NaiveDate,
    pub assumptions: BaseAssumptions,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub liabilities: Vec<Liability>,
    #[serde(default)]
    pub cash_flows: Vec<CashFlow>,
    #[serde(default)]
    pub retirement_incomes: Vec<RetirementIncome>,
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

impl Plan {
    pub fn creation_year(&self) -> i32 {
        self.creation_date.year()
    }

    pub fn reference_person(&self) -> Option<&Person> {
        self.household.person(self.reference_person_id)
    }

    pub fn scenario(&self, scenario_id: u32) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.scenario_id == scenario_id)
    }

    pub fn asset(&self, asset_id: u32) -> Option<&Asset> {
        self.assets.iter().find(|a| a.asset_id == asset_id)
    }

    pub fn liability(&self, liability_id: u32) -> Option<&Liability> {
        self.liabilities.iter().find(|l| l.liability_id == liability_id)
    }

    pub fn cash_flow(&self, flow_id: u32) -> Option<&CashFlow> {
        self.cash_flows.iter().find(|f| f.flow_id == flow_id)
    }

    pub fn retirement_income(&self, income_id: u32) -> Option<&RetirementIncome> {
        self.retirement_incomes.iter().find(|r| r.income_id == income_id)
    }
}
