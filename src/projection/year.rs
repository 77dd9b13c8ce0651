//! The annual state machine: one fold step per projected year
//!
//! Every year runs the same fixed sequence, with no step skipped even when a
//! component contributes nothing:
//! 1. start from the prior year's ending balances,
//! 2. apply growth to every asset and to the carried surplus,
//! 3. sum inflows and retirement income,
//! 4. sum liability interest, scheduled outflows and retirement spending,
//! 5. net the two,
//! 6. settle: reinvest a surplus, or cover a deficit from the surplus ledger
//!    and then included assets in the configured liquidation order,
//! 7. finalize the year's output row, which seeds the next year.

use rust_decimal::Decimal;

use crate::error::{HaltCause, ProjectionHalt};
use crate::projection::cashflow::CashFlowAggregator;
use crate::projection::engine::{LiquidationOrder, NegativeBalancePolicy, ProjectionConfig};
use crate::projection::growth::{growth_amount, GrowthRateResolver};
use crate::projection::output::NestEggYearlyValue;
use crate::projection::surplus::SurplusLedger;
use crate::projection::timeline::Timeline;
use crate::scenario::EffectivePlan;

/// Balances carried between years: the fold state of the annual loop
#[derive(Debug, Clone)]
pub struct YearState {
    /// The year these balances are the start of
    pub year: i32,
    /// Parallel to the effective plan's asset list
    pub asset_balances: Vec<Decimal>,
    /// Parallel to the effective plan's liability list
    pub liability_balances: Vec<Decimal>,
    pub surplus: SurplusLedger,
}

/// Executes the 7-step sequence for single years of one scenario run
#[derive(Debug, Clone, Copy)]
pub struct YearProjector<'a> {
    plan: &'a EffectivePlan,
    timeline: &'a Timeline,
    rates: GrowthRateResolver<'a>,
    flows: CashFlowAggregator<'a>,
    config: &'a ProjectionConfig,
}

impl<'a> YearProjector<'a> {
    pub fn new(plan: &'a EffectivePlan, timeline: &'a Timeline, config: &'a ProjectionConfig) -> Self {
        Self {
            plan,
            timeline,
            rates: GrowthRateResolver::new(&plan.assumptions),
            flows: CashFlowAggregator::new(plan, timeline),
            config,
        }
    }

    /// Balances as of the plan creation date, before any year runs
    pub fn initial_state(&self) -> YearState {
        YearState {
            year: self.timeline.start_year,
            asset_balances: self.plan.assets.iter().map(|a| a.value).collect(),
            liability_balances: self.plan.liabilities.iter().map(|l| l.value).collect(),
            surplus: SurplusLedger::new(),
        }
    }

    /// One annual step: consumes the incoming state, returns the state for the
    /// next year and this year's output row, or the halt that stopped the run
    pub fn step(&self, mut state: YearState) -> Result<(YearState, NestEggYearlyValue), ProjectionHalt> {
        let year = state.year;
        let fraction = self.timeline.fraction_for(year);

        // Growth precedes any cash movement
        let mut growth_total = Decimal::ZERO;
        for (asset, balance) in self.plan.assets.iter().zip(state.asset_balances.iter_mut()) {
            let rate = self.rates.asset_rate(&asset.growth, year);
            let growth = growth_amount(*balance, rate, fraction);
            *balance += growth;
            if asset.include_in_nest_egg {
                growth_total += growth;
            }
        }
        let nest_egg_rate = self.rates.nest_egg_rate(year);
        let mut surplus_year = state.surplus.grow(nest_egg_rate, fraction);
        growth_total += surplus_year.surplus_growth;

        // Cash flows and net
        let flows = self.flows.aggregate(year, &state.liability_balances);
        let net = flows.net();

        // Settlement
        let mut withdrawals = Decimal::ZERO;
        let mut contributions = Decimal::ZERO;
        if net >= Decimal::ZERO {
            state.surplus.deposit(&mut surplus_year, net);
            contributions = net;
        } else {
            let deficit = -net;
            let mut shortfall = deficit - state.surplus.draw(deficit);
            if shortfall > Decimal::ZERO {
                shortfall = self.liquidate(&mut state, shortfall, year);
            }
            if shortfall > Decimal::ZERO {
                return Err(ProjectionHalt {
                    year,
                    cause: HaltCause::AssetsExhausted { shortfall },
                });
            }
            withdrawals = deficit;
        }

        // Finalize
        let asset_total: Decimal = self
            .plan
            .assets
            .iter()
            .zip(&state.asset_balances)
            .filter(|(a, _)| a.include_in_nest_egg)
            .map(|(_, b)| *b)
            .sum();
        let liability_total: Decimal = self
            .plan
            .liabilities
            .iter()
            .zip(&state.liability_balances)
            .filter(|(l, _)| l.include_in_nest_egg)
            .map(|(_, b)| *b)
            .sum();
        let balance = asset_total + state.surplus.balance() - liability_total;

        if balance < Decimal::ZERO && self.config.negative_balance == NegativeBalancePolicy::Halt {
            return Err(ProjectionHalt {
                year,
                cause: HaltCause::NegativeBalance { balance },
            });
        }

        let mut row = NestEggYearlyValue {
            year,
            balance,
            withdrawals,
            contributions,
            investment_growth: growth_total,
            prior_year_surplus: surplus_year.prior_year_surplus,
            surplus_growth: surplus_year.surplus_growth,
            new_surplus: surplus_year.new_surplus,
            final_year_balance: None,
            final_year_surplus: None,
        };
        if year == self.timeline.end_year {
            row.final_year_balance = Some(balance);
            row.final_year_surplus = Some(state.surplus.balance());
        }

        state.year = year + 1;
        Ok((state, row))
    }

    /// Liquidate included assets toward a shortfall; returns what remains
    /// uncovered. Ordering is an explicit policy, never insertion accident:
    /// ascending resolved growth rate keeps the fastest growers invested,
    /// with declared order as the deterministic tie-break.
    fn liquidate(&self, state: &mut YearState, mut shortfall: Decimal, year: i32) -> Decimal {
        let mut order: Vec<usize> = self
            .plan
            .assets
            .iter()
            .enumerate()
            .filter(|(i, a)| a.include_in_nest_egg && state.asset_balances[*i] > Decimal::ZERO)
            .map(|(i, _)| i)
            .collect();
        if self.config.liquidation == LiquidationOrder::AscendingGrowthRate {
            // Stable sort preserves declared order between equal rates
            order.sort_by_key(|&i| self.rates.asset_rate(&self.plan.assets[i].growth, year));
        }

        for i in order {
            let take = shortfall.min(state.asset_balances[i]);
            state.asset_balances[i] -= take;
            shortfall -= take;
            if shortfall <= Decimal::ZERO {
                break;
            }
        }
        shortfall
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{Asset, CashFlow, FlowKind, GrowthControl, Liability};
    use crate::scenario::{EffectiveAssumptions, EffectivePerson};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn test_plan() -> EffectivePlan {
        EffectivePlan {
            plan_id: 1,
            scenario_id: None,
            creation_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            assumptions: EffectiveAssumptions {
                nest_egg_growth: GrowthControl::Default,
                default_growth_rate: dec!(6),
                inflation_rate: Decimal::ZERO,
                retirement_spending: None,
            },
            reference: EffectivePerson {
                person_id: 10,
                birth_year: 1980,
                retirement_age: 60,
                final_age: 70,
            },
            people: vec![EffectivePerson {
                person_id: 10,
                birth_year: 1980,
                retirement_age: 60,
                final_age: 70,
            }],
            assets: Vec::new(),
            liabilities: Vec::new(),
            cash_flows: Vec::new(),
            retirement_incomes: Vec::new(),
        }
    }

    fn asset(id: u32, value: Decimal, growth: GrowthControl) -> Asset {
        Asset {
            asset_id: id,
            name: format!("asset {id}"),
            value,
            include_in_nest_egg: true,
            owner_ids: vec![10],
            growth,
        }
    }

    fn outflow(amount: Decimal) -> CashFlow {
        CashFlow {
            flow_id: 1,
            name: "spend".into(),
            kind: FlowKind::Outflow,
            annual_amount: amount,
            start_year: 2025,
            end_year: 2050,
            apply_inflation: false,
        }
    }

    #[test]
    fn test_growth_precedes_cash_movement() {
        let mut plan = test_plan();
        plan.assets.push(asset(1, dec!(100000), GrowthControl::Default));
        plan.cash_flows.push(outflow(dec!(106000)));
        let timeline = Timeline::resolve(&plan);
        let config = ProjectionConfig::default();
        let projector = YearProjector::new(&plan, &timeline, &config);

        // 100,000 grows to 106,000 before the outflow lands, so the year
        // settles to exactly zero instead of exhausting
        let (state, row) = projector.step(projector.initial_state()).unwrap();
        assert_eq!(row.balance, Decimal::ZERO);
        assert_eq!(row.withdrawals, dec!(106000));
        assert_eq!(state.asset_balances[0], Decimal::ZERO);
    }

    #[test]
    fn test_deficit_draws_surplus_before_assets() {
        let mut plan = test_plan();
        plan.assumptions.default_growth_rate = Decimal::ZERO;
        plan.assets.push(asset(1, dec!(50000), GrowthControl::Default));
        plan.cash_flows.push(CashFlow {
            flow_id: 2,
            name: "bonus".into(),
            kind: FlowKind::Inflow,
            annual_amount: dec!(10000),
            start_year: 2025,
            end_year: 2025,
            apply_inflation: false,
        });
        plan.cash_flows.push(CashFlow {
            flow_id: 3,
            name: "repair".into(),
            kind: FlowKind::Outflow,
            annual_amount: dec!(4000),
            start_year: 2026,
            end_year: 2026,
            apply_inflation: false,
        });
        let timeline = Timeline::resolve(&plan);
        let config = ProjectionConfig::default();
        let projector = YearProjector::new(&plan, &timeline, &config);

        let (state, first) = projector.step(projector.initial_state()).unwrap();
        assert_eq!(first.new_surplus, dec!(10000));

        let (state, second) = projector.step(state).unwrap();
        // The 4,000 deficit comes out of the 10,000 surplus, not the asset
        assert_eq!(state.asset_balances[0], dec!(50000));
        assert_eq!(state.surplus.balance(), dec!(6000));
        assert_eq!(second.withdrawals, dec!(4000));
        assert_eq!(second.new_surplus, Decimal::ZERO);
    }

    #[test]
    fn test_liquidation_sells_slowest_grower_first() {
        let mut plan = test_plan();
        plan.assets.push(asset(1, dec!(20000), GrowthControl::Override(dec!(8))));
        plan.assets.push(asset(2, dec!(20000), GrowthControl::Override(Decimal::ZERO)));
        plan.cash_flows.push(outflow(dec!(10000)));
        let timeline = Timeline::resolve(&plan);
        let config = ProjectionConfig::default();
        let projector = YearProjector::new(&plan, &timeline, &config);

        let (state, _row) = projector.step(projector.initial_state()).unwrap();
        // Asset 2 grows at 0% and is sold first; asset 1 keeps its grown balance
        assert_eq!(state.asset_balances[0], dec!(21600));
        assert_eq!(state.asset_balances[1], dec!(10000));
    }

    #[test]
    fn test_declared_order_liquidation() {
        let mut plan = test_plan();
        plan.assets.push(asset(1, dec!(20000), GrowthControl::Override(dec!(8))));
        plan.assets.push(asset(2, dec!(20000), GrowthControl::Override(Decimal::ZERO)));
        plan.cash_flows.push(outflow(dec!(10000)));
        let timeline = Timeline::resolve(&plan);
        let config = ProjectionConfig {
            liquidation: LiquidationOrder::DeclaredOrder,
            ..ProjectionConfig::default()
        };
        let projector = YearProjector::new(&plan, &timeline, &config);

        let (state, _row) = projector.step(projector.initial_state()).unwrap();
        assert_eq!(state.asset_balances[0], dec!(11600));
        assert_eq!(state.asset_balances[1], dec!(20000));
    }

    #[test]
    fn test_exhaustion_halts_at_failing_year() {
        let mut plan = test_plan();
        plan.assumptions.default_growth_rate = Decimal::ZERO;
        plan.assets.push(asset(1, dec!(3000), GrowthControl::Default));
        plan.cash_flows.push(outflow(dec!(5000)));
        let timeline = Timeline::resolve(&plan);
        let config = ProjectionConfig::default();
        let projector = YearProjector::new(&plan, &timeline, &config);

        let halt = projector.step(projector.initial_state()).unwrap_err();
        assert_eq!(halt.year, 2025);
        assert_eq!(
            halt.cause,
            HaltCause::AssetsExhausted {
                shortfall: dec!(2000)
            }
        );
    }

    #[test]
    fn test_negative_balance_policy() {
        // Inflows cover the interest, but the included liability dwarfs the
        // accumulated surplus, so the year ends under water
        let mut plan = test_plan();
        plan.liabilities.push(Liability {
            liability_id: 1,
            name: "mortgage".into(),
            value: dec!(10000),
            interest_rate: dec!(5),
            include_in_nest_egg: true,
        });
        plan.cash_flows.push(CashFlow {
            flow_id: 1,
            name: "salary".into(),
            kind: FlowKind::Inflow,
            annual_amount: dec!(1000),
            start_year: 2025,
            end_year: 2050,
            apply_inflation: false,
        });
        let timeline = Timeline::resolve(&plan);

        let halting = ProjectionConfig::default();
        let projector = YearProjector::new(&plan, &timeline, &halting);
        let halt = projector.step(projector.initial_state()).unwrap_err();
        assert_eq!(
            halt.cause,
            HaltCause::NegativeBalance {
                balance: dec!(-9500)
            }
        );

        let lenient = ProjectionConfig {
            negative_balance: NegativeBalancePolicy::Allow,
            ..ProjectionConfig::default()
        };
        let projector = YearProjector::new(&plan, &timeline, &lenient);
        let (_state, row) = projector.step(projector.initial_state()).unwrap();
        assert_eq!(row.balance, dec!(-9500));
        assert_eq!(row.new_surplus, dec!(500));
    }

    #[test]
    fn test_excluded_asset_never_liquidated() {
        let mut plan = test_plan();
        plan.assumptions.default_growth_rate = Decimal::ZERO;
        let mut keepout = asset(1, dec!(50000), GrowthControl::Default);
        keepout.include_in_nest_egg = false;
        plan.assets.push(keepout);
        plan.assets.push(asset(2, dec!(2000), GrowthControl::Default));
        plan.cash_flows.push(outflow(dec!(5000)));
        let timeline = Timeline::resolve(&plan);
        let config = ProjectionConfig::default();
        let projector = YearProjector::new(&plan, &timeline, &config);

        let halt = projector.step(projector.initial_state()).unwrap_err();
        assert_eq!(
            halt.cause,
            HaltCause::AssetsExhausted {
                shortfall: dec!(3000)
            }
        );
    }
}
