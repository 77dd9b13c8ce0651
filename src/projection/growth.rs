//! Growth rate resolution: the 4-tier precedence behind every rate lookup
//!
//! For an asset and a target year, the first applicable tier wins:
//! 1. a stepwise period on the asset containing the year,
//! 2. the asset's constant override rate,
//! 3. the scenario-level nest-egg rate (itself possibly stepwise),
//! 4. the plan's base default rate.
//! A gap between stepwise periods means tier 1 simply does not match for
//! those years; resolution falls through, never to a rate of zero.

use rust_decimal::Decimal;

use crate::plan::GrowthControl;
use crate::scenario::EffectiveAssumptions;

/// Resolves effective annual growth rates against one scenario's assumptions
#[derive(Debug, Clone, Copy)]
pub struct GrowthRateResolver<'a> {
    nest_egg: &'a GrowthControl,
    default_rate: Decimal,
}

impl<'a> GrowthRateResolver<'a> {
    pub fn new(assumptions: &'a EffectiveAssumptions) -> Self {
        Self {
            nest_egg: &assumptions.nest_egg_growth,
            default_rate: assumptions.default_growth_rate,
        }
    }

    /// Tiers 1-4: the rate applied to an asset's balance in `year`, in percent
    pub fn asset_rate(&self, growth: &GrowthControl, year: i32) -> Decimal {
        match growth {
            GrowthControl::Stepwise { periods, base } => periods
                .iter()
                .find(|p| p.contains(year))
                .map(|p| p.rate)
                .or(*base)
                .unwrap_or_else(|| self.nest_egg_rate(year)),
            GrowthControl::Override(rate) => *rate,
            GrowthControl::Default => self.nest_egg_rate(year),
        }
    }

    /// Tiers 3-4: the nest-egg default for `year`, used for surplus growth and
    /// any asset without a control of its own
    pub fn nest_egg_rate(&self, year: i32) -> Decimal {
        match self.nest_egg {
            GrowthControl::Stepwise { periods, base } => periods
                .iter()
                .find(|p| p.contains(year))
                .map(|p| p.rate)
                .or(*base)
                .unwrap_or(self.default_rate),
            GrowthControl::Override(rate) => *rate,
            GrowthControl::Default => self.default_rate,
        }
    }
}

/// Growth earned on `balance` at percent `rate`, scaled by the year fraction
pub fn growth_amount(balance: Decimal, rate: Decimal, fraction: Decimal) -> Decimal {
    balance * (rate / Decimal::ONE_HUNDRED) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::RatePeriod;
    use rust_decimal_macros::dec;

    fn assumptions(nest_egg: GrowthControl) -> EffectiveAssumptions {
        EffectiveAssumptions {
            nest_egg_growth: nest_egg,
            default_growth_rate: dec!(6),
            inflation_rate: dec!(3),
            retirement_spending: None,
        }
    }

    fn stepwise_with_base() -> GrowthControl {
        GrowthControl::Stepwise {
            periods: vec![RatePeriod {
                start_year: 2030,
                end_year: 2032,
                rate: dec!(-10),
            }],
            base: Some(dec!(8)),
        }
    }

    #[test]
    fn test_stepwise_beats_every_other_tier() {
        let a = assumptions(GrowthControl::Override(dec!(4)));
        let resolver = GrowthRateResolver::new(&a);
        let growth = stepwise_with_base();
        assert_eq!(resolver.asset_rate(&growth, 2030), dec!(-10));
        assert_eq!(resolver.asset_rate(&growth, 2032), dec!(-10));
    }

    #[test]
    fn test_outside_stepwise_falls_to_constant_override() {
        let a = assumptions(GrowthControl::Override(dec!(4)));
        let resolver = GrowthRateResolver::new(&a);
        let growth = stepwise_with_base();
        assert_eq!(resolver.asset_rate(&growth, 2029), dec!(8));
        assert_eq!(resolver.asset_rate(&growth, 2033), dec!(8));
    }

    #[test]
    fn test_stepwise_gap_falls_through_not_zero() {
        let a = assumptions(GrowthControl::Override(dec!(4)));
        let resolver = GrowthRateResolver::new(&a);
        let growth = GrowthControl::Stepwise {
            periods: vec![
                RatePeriod {
                    start_year: 2026,
                    end_year: 2027,
                    rate: dec!(1),
                },
                RatePeriod {
                    start_year: 2030,
                    end_year: 2031,
                    rate: dec!(2),
                },
            ],
            base: None,
        };
        // 2028 sits in the gap: tier 1 misses, tier 2 is absent, tier 3 applies
        assert_eq!(resolver.asset_rate(&growth, 2028), dec!(4));
    }

    #[test]
    fn test_constant_override_opts_out_of_scenario_rate() {
        let a = assumptions(GrowthControl::Override(dec!(4)));
        let resolver = GrowthRateResolver::new(&a);
        assert_eq!(resolver.asset_rate(&GrowthControl::Override(dec!(9)), 2030), dec!(9));
    }

    #[test]
    fn test_default_follows_scenario_then_plan() {
        let scenario = assumptions(GrowthControl::Override(dec!(4)));
        let resolver = GrowthRateResolver::new(&scenario);
        assert_eq!(resolver.asset_rate(&GrowthControl::Default, 2030), dec!(4));

        let base_only = assumptions(GrowthControl::Default);
        let resolver = GrowthRateResolver::new(&base_only);
        assert_eq!(resolver.asset_rate(&GrowthControl::Default, 2030), dec!(6));
    }

    #[test]
    fn test_scenario_stepwise_drives_nest_egg_rate() {
        let a = assumptions(stepwise_with_base());
        let resolver = GrowthRateResolver::new(&a);
        assert_eq!(resolver.nest_egg_rate(2031), dec!(-10));
        assert_eq!(resolver.nest_egg_rate(2029), dec!(8));

        let no_base = assumptions(GrowthControl::Stepwise {
            periods: vec![RatePeriod {
                start_year: 2030,
                end_year: 2032,
                rate: dec!(-10),
            }],
            base: None,
        });
        let resolver = GrowthRateResolver::new(&no_base);
        assert_eq!(resolver.nest_egg_rate(2029), dec!(6));
    }

    #[test]
    fn test_growth_amount_scales_by_fraction() {
        assert_eq!(
            growth_amount(dec!(100000), dec!(6), Decimal::ONE),
            dec!(6000)
        );
        assert_eq!(
            growth_amount(dec!(100000), dec!(6), dec!(0.5)),
            dec!(3000)
        );
    }
}
