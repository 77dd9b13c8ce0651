//! Calendar-year timeline: age-to-year mapping and first-year proration
//!
//! The projection runs from the plan creation year through the year the
//! reference person reaches their final age. Ages tick on January 1 of each
//! year regardless of birth month, a deliberate simplification retained from
//! the source design, so `age(person, year) = year - birth_year`. The first
//! year is partial: its fraction is the day count from the creation date
//! through December 31 (inclusive) over the days in that year, and it scales
//! every cash flow and growth application in that year only.

use std::collections::HashMap;
use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::scenario::EffectivePlan;

/// The absolute calendar-year frame every calculation is anchored to
#[derive(Debug, Clone)]
pub struct Timeline {
    pub start_year: i32,
    pub end_year: i32,
    first_year_fraction: Decimal,
    retirement_year: i32,
    birth_years: HashMap<u32, i32>,
}

impl Timeline {
    /// Build the timeline from an effective plan snapshot
    ///
    /// Scenario overrides of the reference person's retirement/final age have
    /// already been applied to the snapshot, so only the horizon moves; the
    /// year-to-age mapping rule itself never changes between scenarios.
    pub fn resolve(plan: &EffectivePlan) -> Self {
        let start_year = plan.creation_date.year();
        let reference = &plan.reference;
        Self {
            start_year,
            end_year: reference.birth_year + reference.final_age as i32,
            first_year_fraction: first_year_fraction(plan.creation_date),
            retirement_year: reference.birth_year + reference.retirement_age as i32,
            birth_years: plan
                .people
                .iter()
                .map(|p| (p.person_id, p.birth_year))
                .collect(),
        }
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.start_year..=self.end_year
    }

    pub fn year_count(&self) -> usize {
        (self.end_year - self.start_year + 1).max(0) as usize
    }

    /// Fraction of the year the plan is live: partial in the creation year,
    /// 1 everywhere else
    pub fn fraction_for(&self, year: i32) -> Decimal {
        if year == self.start_year {
            self.first_year_fraction
        } else {
            Decimal::ONE
        }
    }

    /// First year the reference person is retired
    pub fn retirement_year(&self) -> i32 {
        self.retirement_year
    }

    /// Age of a household member in a given year; `None` for unknown members
    pub fn age_of(&self, person_id: u32, year: i32) -> Option<i32> {
        self.birth_years.get(&person_id).map(|birth| year - birth)
    }

    /// Calendar year in which a member reaches the given age
    pub fn year_at_age(&self, person_id: u32, age: u8) -> Option<i32> {
        self.birth_years
            .get(&person_id)
            .map(|birth| birth + age as i32)
    }
}

/// Days from the creation date through Dec 31 inclusive, over days in the year
fn first_year_fraction(creation: NaiveDate) -> Decimal {
    let days_in_year: i64 = if is_leap_year(creation.year()) { 366 } else { 365 };
    let remaining = days_in_year - creation.ordinal() as i64 + 1;
    Decimal::from(remaining) / Decimal::from(days_in_year)
}

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{EffectiveAssumptions, EffectivePerson};
    use crate::plan::GrowthControl;
    use rust_decimal_macros::dec;

    fn test_plan(creation: NaiveDate) -> EffectivePlan {
        EffectivePlan {
            plan_id: 1,
            scenario_id: None,
            creation_date: creation,
            assumptions: EffectiveAssumptions {
                nest_egg_growth: GrowthControl::Default,
                default_growth_rate: dec!(6),
                inflation_rate: dec!(3),
                retirement_spending: None,
            },
            reference: EffectivePerson {
                person_id: 10,
                birth_year: 1980,
                retirement_age: 65,
                final_age: 90,
            },
            people: vec![
                EffectivePerson {
                    person_id: 10,
                    birth_year: 1980,
                    retirement_age: 65,
                    final_age: 90,
                },
                EffectivePerson {
                    person_id: 11,
                    birth_year: 1985,
                    retirement_age: 65,
                    final_age: 90,
                },
            ],
            assets: Vec::new(),
            liabilities: Vec::new(),
            cash_flows: Vec::new(),
            retirement_incomes: Vec::new(),
        }
    }

    #[test]
    fn test_horizon_runs_to_final_age() {
        let plan = test_plan(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let timeline = Timeline::resolve(&plan);
        assert_eq!(timeline.start_year, 2025);
        assert_eq!(timeline.end_year, 2070); // 1980 + 90
        assert_eq!(timeline.year_count(), 46);
        assert_eq!(timeline.retirement_year(), 2045);
    }

    #[test]
    fn test_jan_first_creation_is_full_year() {
        let plan = test_plan(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let timeline = Timeline::resolve(&plan);
        assert_eq!(timeline.fraction_for(2025), Decimal::ONE);
        assert_eq!(timeline.fraction_for(2026), Decimal::ONE);
    }

    #[test]
    fn test_mid_year_creation_prorates_first_year_only() {
        let plan = test_plan(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        let timeline = Timeline::resolve(&plan);
        // Jul 1 through Dec 31 is 184 days of a 365-day year
        let expected = Decimal::from(184) / Decimal::from(365);
        assert_eq!(timeline.fraction_for(2025), expected);
        assert_eq!(timeline.fraction_for(2026), Decimal::ONE);
    }

    #[test]
    fn test_leap_year_day_count() {
        let plan = test_plan(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        let timeline = Timeline::resolve(&plan);
        // 2024 is a leap year: Jul 1 through Dec 31 is 184 days of 366
        let expected = Decimal::from(184) / Decimal::from(366);
        assert_eq!(timeline.fraction_for(2024), expected);
    }

    #[test]
    fn test_ages_tick_on_january_first() {
        let plan = test_plan(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        let timeline = Timeline::resolve(&plan);
        assert_eq!(timeline.age_of(10, 2025), Some(45));
        assert_eq!(timeline.age_of(11, 2025), Some(40));
        assert_eq!(timeline.age_of(10, 2026), Some(46));
        assert_eq!(timeline.age_of(99, 2025), None);
        assert_eq!(timeline.year_at_age(11, 65), Some(2050));
    }
}
