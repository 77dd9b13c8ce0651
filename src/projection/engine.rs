//! The projection engine: validate, snapshot, fold years, report
//!
//! One call projects one (plan, scenario) pair. Validation runs eagerly and
//! collects every configuration error before refusing the run; a run that
//! starts either completes the full horizon or halts at a failing year and
//! returns the rows produced so far. The engine holds no mutable state, so
//! re-running unchanged inputs is bit-identical and scenario runs can go wide.

use log::{debug, warn};
use rayon::prelude::*;

use crate::error::ValidationReport;
use crate::plan::Plan;
use crate::projection::output::ProjectionOutcome;
use crate::projection::timeline::Timeline;
use crate::projection::year::YearProjector;
use crate::scenario;
use crate::validation;

/// Which included assets cover a deficit first once the surplus is exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiquidationOrder {
    /// Sell the slowest growers first; ties break by declared order
    AscendingGrowthRate,
    /// Sell in the order assets are declared on the plan
    DeclaredOrder,
}

/// What to do when a year ends with a negative nest-egg balance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegativeBalancePolicy {
    /// Stop the run at the failing year
    Halt,
    /// Keep projecting with the negative balance carried forward
    Allow,
}

/// Engine policy knobs; the defaults match the source design
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionConfig {
    pub liquidation: LiquidationOrder,
    pub negative_balance: NegativeBalancePolicy,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            liquidation: LiquidationOrder::AscendingGrowthRate,
            negative_balance: NegativeBalancePolicy::Halt,
        }
    }
}

/// Projects a plan's base run and its scenarios
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Project one run: the base plan when `scenario_id` is `None`, otherwise
    /// the named scenario layered over it
    ///
    /// Returns the full yearly sequence, or a partial one with `halt` set when
    /// the run stopped early. A plan that fails validation produces no rows.
    pub fn project(
        &self,
        plan: &Plan,
        scenario_id: Option<u32>,
    ) -> Result<ProjectionOutcome, ValidationReport> {
        if let Err(report) = validation::validate(plan, scenario_id) {
            warn!(
                "plan {} scenario {:?}: {} configuration error(s), refusing to project",
                plan.plan_id,
                scenario_id,
                report.errors.len()
            );
            return Err(report);
        }

        let scenario = scenario_id.and_then(|id| plan.scenario(id));
        let effective = scenario::resolve(plan, scenario);
        let timeline = Timeline::resolve(&effective);
        let projector = YearProjector::new(&effective, &timeline, &self.config);

        let mut outcome = ProjectionOutcome::new(plan.plan_id, scenario_id);
        let mut state = projector.initial_state();
        for _ in timeline.years() {
            match projector.step(state) {
                Ok((next, row)) => {
                    outcome.push(row);
                    state = next;
                }
                Err(halt) => {
                    debug!(
                        "plan {} scenario {:?}: halted in {}: {}",
                        plan.plan_id, scenario_id, halt.year, halt.cause
                    );
                    outcome.halt = Some(halt);
                    break;
                }
            }
        }

        debug!(
            "plan {} scenario {:?}: {} year(s), final balance {}",
            plan.plan_id,
            scenario_id,
            outcome.years.len(),
            outcome.final_balance()
        );
        Ok(outcome)
    }

    /// Project the base plan and every scenario in parallel
    ///
    /// Each run resolves its own effective snapshot, so runs share nothing
    /// mutable. The whole batch validates up front; one bad scenario refuses
    /// the batch with the full error list rather than a partial answer set.
    pub fn project_all(&self, plan: &Plan) -> Result<Vec<ProjectionOutcome>, ValidationReport> {
        validation::validate_all(plan)?;

        let mut runs: Vec<Option<u32>> = vec![None];
        runs.extend(plan.scenarios.iter().map(|s| Some(s.scenario_id)));

        runs.par_iter()
            .map(|&scenario_id| self.project(plan, scenario_id))
            .collect()
    }
}
