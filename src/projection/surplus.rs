//! Surplus ledger: reinvested net-positive cash flow tracked apart from
//! named assets
//!
//! The surplus behaves like a synthetic asset: it grows at the nest-egg
//! default rate (tiers 3/4 only, since it carries no asset-level control)
//! before any cash moves, and deficits draw it down before any named asset
//! is liquidated.

use rust_decimal::Decimal;

use crate::projection::growth::growth_amount;

/// The three surplus figures reported for one projected year
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurplusYear {
    /// Balance carried in from the prior year
    pub prior_year_surplus: Decimal,
    /// Growth earned on that carried balance this year
    pub surplus_growth: Decimal,
    /// This year's net-positive cash flow, reinvested
    pub new_surplus: Decimal,
}

/// Accumulated reinvested surplus, folded across years
#[derive(Debug, Clone, Default)]
pub struct SurplusLedger {
    balance: Decimal,
}

impl SurplusLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Growth step: grow the carried balance exactly like a named asset,
    /// before any cash flow is applied
    pub fn grow(&mut self, nest_egg_rate: Decimal, fraction: Decimal) -> SurplusYear {
        let prior = self.balance;
        let growth = growth_amount(prior, nest_egg_rate, fraction);
        self.balance += growth;
        SurplusYear {
            prior_year_surplus: prior,
            surplus_growth: growth,
            new_surplus: Decimal::ZERO,
        }
    }

    /// Reinvest the year's net-positive cash flow
    pub fn deposit(&mut self, year: &mut SurplusYear, net: Decimal) {
        year.new_surplus = net;
        self.balance += net;
    }

    /// Draw toward a deficit; returns the amount actually covered
    pub fn draw(&mut self, needed: Decimal) -> Decimal {
        let drawn = needed.min(self.balance).max(Decimal::ZERO);
        self.balance -= drawn;
        drawn
    }
}
