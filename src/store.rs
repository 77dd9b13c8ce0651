//! In-memory store of projection outcomes
//!
//! Outcomes are derived data keyed by (plan, scenario) pair. The store only
//! ever replaces entries wholesale: a re-projection swaps the full yearly
//! sequence, so readers never observe a half-updated run. Dropping a scenario
//! drops its outcome with it.

use std::collections::HashMap;

use crate::projection::ProjectionOutcome;

type RunKey = (u32, Option<u32>);

/// Arena of projection outcomes, one per (plan, scenario) run
#[derive(Debug, Clone, Default)]
pub struct ProjectionStore {
    outcomes: HashMap<RunKey, ProjectionOutcome>,
}

impl ProjectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a run's outcome, replacing any previous outcome for the same pair
    pub fn replace(&mut self, outcome: ProjectionOutcome) {
        self.outcomes
            .insert((outcome.plan_id, outcome.scenario_id), outcome);
    }

    pub fn get(&self, plan_id: u32, scenario_id: Option<u32>) -> Option<&ProjectionOutcome> {
        self.outcomes.get(&(plan_id, scenario_id))
    }

    /// Drop the outcome of one scenario run
    pub fn remove_scenario(&mut self, plan_id: u32, scenario_id: u32) -> Option<ProjectionOutcome> {
        self.outcomes.remove(&(plan_id, Some(scenario_id)))
    }

    /// Drop every outcome belonging to a plan, base run included
    pub fn remove_plan(&mut self, plan_id: u32) {
        self.outcomes.retain(|(pid, _), _| *pid != plan_id);
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::NestEggYearlyValue;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn outcome(plan_id: u32, scenario_id: Option<u32>, balance: Decimal) -> ProjectionOutcome {
        let mut outcome = ProjectionOutcome::new(plan_id, scenario_id);
        outcome.push(NestEggYearlyValue {
            year: 2025,
            balance,
            withdrawals: Decimal::ZERO,
            contributions: Decimal::ZERO,
            investment_growth: Decimal::ZERO,
            prior_year_surplus: Decimal::ZERO,
            surplus_growth: Decimal::ZERO,
            new_surplus: Decimal::ZERO,
            final_year_balance: None,
            final_year_surplus: None,
        });
        outcome
    }

    #[test]
    fn test_replace_is_wholesale() {
        let mut store = ProjectionStore::new();
        store.replace(outcome(1, Some(2), dec!(100)));
        store.replace(outcome(1, Some(2), dec!(250)));

        assert_eq!(store.len(), 1);
        let stored = store.get(1, Some(2)).unwrap();
        assert_eq!(stored.final_balance(), dec!(250));
    }

    #[test]
    fn test_base_and_scenario_runs_are_distinct_entries() {
        let mut store = ProjectionStore::new();
        store.replace(outcome(1, None, dec!(100)));
        store.replace(outcome(1, Some(2), dec!(200)));

        assert_eq!(store.get(1, None).unwrap().final_balance(), dec!(100));
        assert_eq!(store.get(1, Some(2)).unwrap().final_balance(), dec!(200));
    }

    #[test]
    fn test_dropping_a_scenario_drops_only_its_outcome() {
        let mut store = ProjectionStore::new();
        store.replace(outcome(1, None, dec!(100)));
        store.replace(outcome(1, Some(2), dec!(200)));

        assert!(store.remove_scenario(1, 2).is_some());
        assert!(store.get(1, Some(2)).is_none());
        assert!(store.get(1, None).is_some());
    }

    #[test]
    fn test_dropping_a_plan_drops_all_its_runs() {
        let mut store = ProjectionStore::new();
        store.replace(outcome(1, None, dec!(100)));
        store.replace(outcome(1, Some(2), dec!(200)));
        store.replace(outcome(7, None, dec!(300)));

        store.remove_plan(1);
        assert_eq!(store.len(), 1);
        assert!(store.get(7, None).is_some());
    }
}
