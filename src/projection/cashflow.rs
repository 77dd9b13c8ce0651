//! Per-year cash flow aggregation: scheduled flows, retirement income,
//! retirement spending, and liability interest

use rust_decimal::Decimal;

use crate::plan::FlowKind;
use crate::projection::timeline::Timeline;
use crate::scenario::EffectivePlan;

/// The cash totals for one projected year
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct YearCashFlow {
    pub scheduled_inflows: Decimal,
    pub retirement_income: Decimal,
    pub scheduled_outflows: Decimal,
    pub retirement_spending: Decimal,
    pub liability_interest: Decimal,
}

impl YearCashFlow {
    pub fn total_inflows(&self) -> Decimal {
        self.scheduled_inflows + self.retirement_income
    }

    pub fn total_outflows(&self) -> Decimal {
        self.scheduled_outflows + self.retirement_spending + self.liability_interest
    }

    pub fn net(&self) -> Decimal {
        self.total_inflows() - self.total_outflows()
    }
}

/// Sums every effective cash item active in a target year
#[derive(Debug, Clone, Copy)]
pub struct CashFlowAggregator<'a> {
    plan: &'a EffectivePlan,
    timeline: &'a Timeline,
}

impl<'a> CashFlowAggregator<'a> {
    pub fn new(plan: &'a EffectivePlan, timeline: &'a Timeline) -> Self {
        Self { plan, timeline }
    }

    /// Totals for `year`, against the liability balances carried into it
    ///
    /// Inflation-flagged items compound from their own start year within the
    /// projection; everything is scaled by the partial-year fraction in the
    /// creation year.
    pub fn aggregate(&self, year: i32, liability_balances: &[Decimal]) -> YearCashFlow {
        let fraction = self.timeline.fraction_for(year);
        let inflation = self.plan.assumptions.inflation_rate;
        let mut totals = YearCashFlow::default();

        for flow in &self.plan.cash_flows {
            if !flow.active_in(year) {
                continue;
            }
            let active_from = flow.start_year.max(self.timeline.start_year);
            let base = if flow.apply_inflation {
                compounded(flow.annual_amount, inflation, (year - active_from) as u32)
            } else {
                flow.annual_amount
            };
            let amount = base * fraction;
            match flow.kind {
                FlowKind::Inflow => totals.scheduled_inflows += amount,
                FlowKind::Outflow => totals.scheduled_outflows += amount,
            }
        }

        for income in &self.plan.retirement_incomes {
            let Some(age) = self.timeline.age_of(income.owner_id, year) else {
                continue;
            };
            if !income.active_at_age(age) {
                continue;
            }
            let start_year = self
                .timeline
                .year_at_age(income.owner_id, income.start_age)
                .unwrap_or(year)
                .max(self.timeline.start_year);
            let base = if income.apply_inflation {
                compounded(income.annual_income, inflation, (year - start_year) as u32)
            } else {
                income.annual_income
            };
            totals.retirement_income += base * fraction;
        }

        // Scenario runs only: the base plan projects no retirement spending
        if let Some(spending) = self.plan.assumptions.retirement_spending {
            if year >= self.timeline.retirement_year() {
                totals.retirement_spending = spending * fraction;
            }
        }

        // Interest-only servicing: the accrual is a guaranteed outflow and the
        // principal carries forward unchanged
        for (liability, balance) in self.plan.liabilities.iter().zip(liability_balances) {
            totals.liability_interest +=
                balance * (liability.interest_rate / Decimal::ONE_HUNDRED) * fraction;
        }

        totals
    }
}

/// `amount × (1 + rate/100)^years`, multiplied out so Decimal stays exact
pub fn compounded(amount: Decimal, rate: Decimal, years: u32) -> Decimal {
    let factor = Decimal::ONE + rate / Decimal::ONE_HUNDRED;
    let mut out = amount;
    for _ in 0..years {
        out *= factor;
    }
    out
}
