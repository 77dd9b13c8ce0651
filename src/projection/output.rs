//! Yearly output rows and the per-run outcome container

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ProjectionHalt;

/// One year's computed nest-egg position
///
/// Produced only by the engine; regenerable at will and never user-edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestEggYearlyValue {
    pub year: i32,
    /// Included grown assets + surplus − included liabilities at year end
    pub balance: Decimal,
    /// Amount liquidated (surplus then assets) to cover this year's deficit
    pub withdrawals: Decimal,
    /// Net-positive cash flow reinvested this year
    pub contributions: Decimal,
    /// Growth on included assets plus surplus growth
    pub investment_growth: Decimal,
    pub prior_year_surplus: Decimal,
    pub surplus_growth: Decimal,
    pub new_surplus: Decimal,
    /// Convenience copy of `balance`, set on the last row only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_year_balance: Option<Decimal>,
    /// Convenience copy of the surplus balance, set on the last row only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_year_surplus: Option<Decimal>,
}

/// The ordered yearly sequence one (plan, scenario) run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionOutcome {
    pub plan_id: u32,
    /// `None` for the base plan
    pub scenario_id: Option<u32>,
    pub years: Vec<NestEggYearlyValue>,
    /// Set when the run stopped early; years after `halt.year` are not produced
    pub halt: Option<ProjectionHalt>,
}

impl ProjectionOutcome {
    pub fn new(plan_id: u32, scenario_id: Option<u32>) -> Self {
        Self {
            plan_id,
            scenario_id,
            years: Vec::new(),
            halt: None,
        }
    }

    pub fn push(&mut self, row: NestEggYearlyValue) {
        self.years.push(row);
    }

    pub fn final_balance(&self) -> Decimal {
        self.years.last().map(|r| r.balance).unwrap_or(Decimal::ZERO)
    }

    /// Summary statistics over the projected years
    pub fn summary(&self) -> ProjectionSummary {
        ProjectionSummary {
            total_years: self.years.len() as u32,
            total_contributions: self.years.iter().map(|r| r.contributions).sum(),
            total_withdrawals: self.years.iter().map(|r| r.withdrawals).sum(),
            total_growth: self.years.iter().map(|r| r.investment_growth).sum(),
            final_balance: self.final_balance(),
            final_surplus: self
                .years
                .last()
                .and_then(|r| r.final_year_surplus)
                .unwrap_or(Decimal::ZERO),
            halted: self.halt.is_some(),
        }
    }
}

/// Summary statistics for a projection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_years: u32,
    pub total_contributions: Decimal,
    pub total_withdrawals: Decimal,
    pub total_growth: Decimal,
    pub final_balance: Decimal,
    pub final_surplus: Decimal,
    pub halted: bool,
}
