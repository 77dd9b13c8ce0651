//! Nest-egg projection engine for household financial plans
//!
//! This library provides:
//! - Deterministic year-by-year projection of a household's investable wealth
//! - Base plans plus scenarios layering field-level overrides on top
//! - 4-tier growth rate resolution with time-bound stepwise adjustments
//! - Surplus tracking, deficit liquidation, and runtime halt reporting
//! - Eager collect-all configuration validation

pub mod error;
pub mod plan;
pub mod projection;
pub mod scenario;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use error::{ConfigError, HaltCause, ProjectionHalt, ValidationReport};
pub use plan::Plan;
pub use projection::{NestEggYearlyValue, ProjectionEngine, ProjectionOutcome};
pub use scenario::Scenario;
pub use store::ProjectionStore;
