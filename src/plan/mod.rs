//! Base plan data model and the JSON bundle loader

mod data;
mod loader;

pub use data::{
    rate_in_range, Asset, BaseAssumptions, CashFlow, FlowKind, GrowthControl, Household,
    Liability, Person, Plan, RatePeriod, RetirementIncome, MAX_RATE, MIN_RATE,
};
pub use loader::{load_plan, load_plan_from_reader};
