//! Error taxonomy: configuration errors found before projection, and halts
//! that stop a run at a failing year
//!
//! Configuration errors are collected eagerly into a `ValidationReport` so a
//! caller can fix every issue in one pass. Runtime halts carry the failing
//! year and cause alongside the partial yearly sequence. Nothing is retried:
//! the engine is pure, so re-running unchanged input cannot change anything.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A configuration problem detected before any year is projected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("plan {plan_id} has no scenario {scenario_id}")]
    UnknownScenario { plan_id: u32, scenario_id: u32 },

    #[error("reference person {person_id} is not a member of the household")]
    UnknownReferencePerson { person_id: u32 },

    #[error("{what}: unknown person {person_id}")]
    UnknownPerson { what: String, person_id: u32 },

    #[error("scenario {scenario_id}: override references unknown {entity} {entity_id}")]
    UnknownBaseEntity {
        scenario_id: u32,
        entity: &'static str,
        entity_id: u32,
    },

    #[error("scenario {scenario_id}: more than one override references {entity} {entity_id}")]
    DuplicateOverride {
        scenario_id: u32,
        entity: &'static str,
        entity_id: u32,
    },

    #[error(
        "person {person_id}: final age {final_age} must be greater than \
         retirement age {retirement_age}"
    )]
    FinalAgeNotAfterRetirement {
        person_id: u32,
        retirement_age: u8,
        final_age: u8,
    },

    #[error(
        "{holder}: growth periods {first_start}-{first_end} and \
         {second_start}-{second_end} overlap"
    )]
    OverlappingGrowthPeriods {
        holder: String,
        first_start: i32,
        first_end: i32,
        second_start: i32,
        second_end: i32,
    },

    #[error("{what}: rate {rate}% is outside the allowed [-200, 200] range")]
    RateOutOfRange { what: String, rate: Decimal },

    #[error("{what}: value {value} must not be negative")]
    NegativeValue { what: String, value: Decimal },

    #[error("{what}: start year {start_year} is after end year {end_year}")]
    InvalidYearRange {
        what: String,
        start_year: i32,
        end_year: i32,
    },

    #[error("{what}: start age {start_age} is after end age {end_age}")]
    InvalidAgeRange {
        what: String,
        start_age: u8,
        end_age: u8,
    },

    #[error("{what}: scenario-only record is missing required field `{field}`")]
    MissingField { what: String, field: &'static str },

    #[error(
        "projection horizon is empty: reference person reaches final age in \
         {final_year}, before plan creation year {creation_year}"
    )]
    EmptyHorizon {
        creation_year: i32,
        final_year: i32,
    },
}

/// Every configuration error found in one eager validation pass
///
/// Fatal for the affected run: no yearly output is produced.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("plan failed validation with {} configuration error(s)", .errors.len())]
pub struct ValidationReport {
    pub errors: Vec<ConfigError>,
}

impl ValidationReport {
    pub fn new(errors: Vec<ConfigError>) -> Self {
        Self { errors }
    }
}

/// Why a projection stopped at a given year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum HaltCause {
    /// Deficit settlement drained the surplus and every included asset
    #[error("included assets exhausted with {shortfall} of the deficit uncovered")]
    AssetsExhausted { shortfall: Decimal },

    /// Ending balance went negative under `NegativeBalancePolicy::Halt`
    #[error("nest egg balance fell to {balance}")]
    NegativeBalance { balance: Decimal },
}

/// A runtime stop: the partial sequence before `year` is still valid, but no
/// year at or after it is produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("projection halted in {year}: {cause}")]
pub struct ProjectionHalt {
    pub year: i32,
    pub cause: HaltCause,
}
