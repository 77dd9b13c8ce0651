//! The projection pipeline: timeline, rates, cash flows, surplus, years

mod cashflow;
mod engine;
mod growth;
mod output;
mod surplus;
mod timeline;
mod year;

pub use cashflow::{compounded, CashFlowAggregator, YearCashFlow};
pub use engine::{
    LiquidationOrder, NegativeBalancePolicy, ProjectionConfig, ProjectionEngine,
};
pub use growth::{growth_amount, GrowthRateResolver};
pub use output::{NestEggYearlyValue, ProjectionOutcome, ProjectionSummary};
pub use surplus::{SurplusLedger, SurplusYear};
pub use timeline::Timeline;
pub use year::{YearProjector, YearState};
